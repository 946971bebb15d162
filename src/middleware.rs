use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::{ErrorMessage, HttpError},
    models::jobmodel::PrincipalId,
    utils::token,
    AppState,
};

/// The authenticated caller, as vouched for by the identity provider's token.
#[derive(Debug, Clone)]
pub struct JWTAuthMiddleware {
    pub principal: PrincipalId,
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let cookies = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        });

    let token = cookies.ok_or_else(|| {
        HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string())
    })?;

    let subject = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let principal = PrincipalId::parse(subject).ok_or_else(|| {
        HttpError::unauthorized(ErrorMessage::InvalidToken.to_string())
    })?;

    req.extensions_mut().insert(JWTAuthMiddleware { principal });

    Ok(next.run(req).await)
}
