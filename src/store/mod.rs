//! Record and object storage behind narrow async traits.
//!
//! Handlers only see the traits; the PostgreSQL and S3 implementations live
//! next to them and are wired up in `main`.

mod downloads;
mod feed;
mod films;
mod objects;
mod reviews;
mod subscriptions;
mod users;

pub use downloads::*;
pub use feed::*;
pub use films::*;
pub use objects::*;
pub use reviews::*;
pub use subscriptions::*;
pub use users::*;
