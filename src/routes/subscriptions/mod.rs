mod create_subscription;
mod delete_subscription;
mod get_subscriptions;
mod util;

use create_subscription::*;
use delete_subscription::*;
use get_subscriptions::*;
pub use util::*;
