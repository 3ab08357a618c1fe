pub mod auth;
pub mod notifications;
pub mod ranking;
pub mod transcoding;
