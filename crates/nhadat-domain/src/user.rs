//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marketplace role chosen at registration.
///
/// Stored inside the user's `settings` blob as `userType`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Buyer,
    Partner,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buyer => "buyer",
            Self::Partner => "partner",
        })
    }
}

/// Account status. Only `active` accounts may log in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Banned,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        })
    }
}

/// Error returned when a string cannot be parsed as a user enum.
#[derive(Debug, Error)]
#[error("unknown user value: {0:?}")]
pub struct UnknownUserValue(pub String);

impl FromStr for UserType {
    type Err = UnknownUserValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "partner" => Ok(Self::Partner),
            other => Err(UnknownUserValue(other.to_owned())),
        }
    }
}

impl FromStr for UserStatus {
    type Err = UnknownUserValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "banned" => Ok(Self::Banned),
            other => Err(UnknownUserValue(other.to_owned())),
        }
    }
}
