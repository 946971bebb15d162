// config.rs
use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            jwt_secret: String::new(),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:8000".to_string(),
            ],
            log_level: "debug".to_string(),
        }
    }
}

impl Config {
    pub fn init() -> anyhow::Result<Config> {
        let defaults = Config::default();

        let jwt_secret = std::env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET_KEY must not be empty");
        }

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().context("PORT must be a valid port number")?,
            Err(_) => defaults.port,
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_origins);

        let log_level = std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            port,
            jwt_secret,
            allowed_origins,
            log_level,
        })
    }
}
