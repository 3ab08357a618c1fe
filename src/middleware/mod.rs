mod authorization;

pub use authorization::*;
