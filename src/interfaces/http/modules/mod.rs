pub mod auth;
pub mod documents;
pub mod health;
pub mod metrics;
pub mod profiles;
pub mod request_id;
