//! Listing completeness scoring.
//!
//! The score runs from 0 to 10 and is the sum of the points below. It drives
//! the publish gate ([`PUBLISH_MIN_SCORE`](super::types::PUBLISH_MIN_SCORE)).
//!
//! | Criterion                               | Points |
//! |-----------------------------------------|--------|
//! | title ≥ 20 chars                        | 1.0    |
//! | description ≥ 100 chars                 | 1.0    |
//! | price > 0                               | 0.5    |
//! | address and admin unit code             | 0.5    |
//! | land or floor area                      | 1.0    |
//! | bedrooms > 0                            | 0.5    |
//! | bathrooms > 0                           | 0.5    |
//! | direction                               | 0.5    |
//! | frontage                                | 0.5    |
//! | legal status                            | 1.0    |
//! | ownership type                          | 1.0    |
//! | ≥ 3 highlights                          | 1.0    |
//! | ≥ 3 amenities                           | 1.0    |
//!
//! Suggestions cover a subset of these criteria: there is no suggestion for a
//! missing price, address or frontage.

use super::types::{Listing, QualityCategory, QualityInfo};

const MIN_TITLE_CHARS: usize = 20;
const MIN_DESCRIPTION_CHARS: usize = 100;
const MIN_LIST_ITEMS: usize = 3;

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

fn has_amount(value: Option<f64>) -> bool {
    value.is_some_and(|v| v != 0.0)
}

fn has_count(value: Option<i32>) -> bool {
    value.is_some_and(|v| v > 0)
}

fn long_title(listing: &Listing) -> bool {
    listing.title.chars().count() >= MIN_TITLE_CHARS
}

fn long_description(listing: &Listing) -> bool {
    listing
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() >= MIN_DESCRIPTION_CHARS)
}

fn has_area(listing: &Listing) -> bool {
    has_amount(listing.area_land) || has_amount(listing.area_floor)
}

/// Completeness score in `0.0..=10.0`, rounded to two decimals.
pub fn calculate_score(listing: &Listing) -> f64 {
    let criteria = [
        (long_title(listing), 1.0),
        (long_description(listing), 1.0),
        (listing.price > 0, 0.5),
        (
            !listing.address.is_empty() && !listing.admin_unit_code.is_empty(),
            0.5,
        ),
        (has_area(listing), 1.0),
        (has_count(listing.bedrooms), 0.5),
        (has_count(listing.bathrooms), 0.5),
        (has_text(listing.direction.as_deref()), 0.5),
        (has_amount(listing.frontage), 0.5),
        (has_text(listing.legal_status.as_deref()), 1.0),
        (has_text(listing.ownership_type.as_deref()), 1.0),
        (listing.highlights.len() >= MIN_LIST_ITEMS, 1.0),
        (listing.amenities.len() >= MIN_LIST_ITEMS, 1.0),
    ];
    let score: f64 = criteria
        .iter()
        .filter(|(met, _)| *met)
        .map(|(_, points)| points)
        .sum();
    (score * 100.0).round() / 100.0
}

pub fn category(score: f64) -> QualityCategory {
    if score >= 8.0 {
        QualityCategory::Excellent
    } else if score >= 6.0 {
        QualityCategory::High
    } else if score >= 4.0 {
        QualityCategory::Medium
    } else {
        QualityCategory::Low
    }
}

/// One hint per unmet criterion the owner can act on.
pub fn suggestions(listing: &Listing) -> Vec<String> {
    let hints = [
        (
            long_title(listing),
            "Add a more detailed title (at least 20 characters)",
        ),
        (
            long_description(listing),
            "Add a detailed description (at least 100 characters)",
        ),
        (has_area(listing), "Add property area information"),
        (has_count(listing.bedrooms), "Add number of bedrooms"),
        (has_count(listing.bathrooms), "Add number of bathrooms"),
        (
            has_text(listing.direction.as_deref()),
            "Add property direction (facing)",
        ),
        (
            has_text(listing.legal_status.as_deref()),
            "Add legal status (e.g., pink book, red book)",
        ),
        (
            has_text(listing.ownership_type.as_deref()),
            "Add ownership type",
        ),
        (
            listing.highlights.len() >= MIN_LIST_ITEMS,
            "Add at least 3 property highlights",
        ),
        (
            listing.amenities.len() >= MIN_LIST_ITEMS,
            "Add at least 3 amenities",
        ),
    ];
    hints
        .into_iter()
        .filter(|(met, _)| !met)
        .map(|(_, hint)| hint.to_owned())
        .collect()
}

pub fn quality_info(listing: &Listing) -> QualityInfo {
    let score = calculate_score(listing);
    QualityInfo {
        score,
        category: category(score),
        suggestions: suggestions(listing),
    }
}
