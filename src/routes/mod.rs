pub mod auth;
pub mod feed;
pub mod films;
pub mod health_check;
pub mod reviews;
pub mod subscriptions;
pub mod transcoding;

pub use auth::{auth_source, authorizer_source};
pub use feed::feed_source;
pub use films::films_source;
pub use health_check::*;
pub use reviews::reviews_source;
pub use subscriptions::subscriptions_source;
pub use transcoding::transcoding_source;
