mod download;
mod feed;
mod film;
mod review;
mod subscription;
mod user;

pub use download::*;
pub use feed::*;
pub use film::*;
pub use review::*;
pub use subscription::*;
pub use user::*;
