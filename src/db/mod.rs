pub mod db;
pub mod jobdb;
