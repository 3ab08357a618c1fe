mod authorizer;
mod create_group;
mod get_user_role;
mod login;
mod register;
mod util;

pub use authorizer::*;
use create_group::*;
use get_user_role::*;
use login::*;
use register::*;
pub use util::*;
