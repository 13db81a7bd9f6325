//! Listing domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a listing.
///
/// Only `draft → pending` is driven by the listing owner; every other transition
/// belongs to moderation and is applied outside the listings service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
    Expired,
    Sold,
    Rented,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::Sold => "sold",
            Self::Rented => "rented",
        };
        f.write_str(s)
    }
}

/// Whether the property is offered for sale or for rent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Sell,
    Rent,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sell => "sell",
            Self::Rent => "rent",
        })
    }
}

/// Error returned when a string cannot be parsed as a listing enum.
#[derive(Debug, Error)]
#[error("unknown listing value: {0:?}")]
pub struct UnknownListingValue(pub String);

impl FromStr for ListingStatus {
    type Err = UnknownListingValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            "sold" => Ok(Self::Sold),
            "rented" => Ok(Self::Rented),
            other => Err(UnknownListingValue(other.to_owned())),
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownListingValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sell" => Ok(Self::Sell),
            "rent" => Ok(Self::Rent),
            other => Err(UnknownListingValue(other.to_owned())),
        }
    }
}

/// Sortable listing columns. Anything outside this list falls back to `CreatedAt`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ListingSortField {
    #[default]
    CreatedAt,
    Price,
    Views,
    QualityScore,
    PublishedAt,
}

impl ListingSortField {
    /// Parse the camelCase query value (`createdAt`, `price`, ...).
    /// Unknown names silently fall back to the default.
    pub fn from_param(s: &str) -> Self {
        match s {
            "price" => Self::Price,
            "views" => Self::Views,
            "qualityScore" => Self::QualityScore,
            "publishedAt" => Self::PublishedAt,
            _ => Self::CreatedAt,
        }
    }
}
