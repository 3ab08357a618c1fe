use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Genre,
    Director,
    Actor,
}

impl SubscriptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionType::Genre => "genre",
            SubscriptionType::Director => "director",
            SubscriptionType::Actor => "actor",
        }
    }
}

impl fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "genre" => Ok(SubscriptionType::Genre),
            "director" => Ok(SubscriptionType::Director),
            "actor" => Ok(SubscriptionType::Actor),
            other => Err(format!("unknown subscription type `{}`", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub user_id: String,
    pub subscription_type: SubscriptionType,
    pub subscription_value: String,
}
