use std::borrow::Cow;

use chrono::NaiveDate;

/// Short city tag for the five centrally-governed cities; any other admin unit
/// code is used as-is, left-padded with zeros to two characters.
pub fn city_code(admin_unit_code: &str) -> Cow<'_, str> {
    match admin_unit_code {
        "01" => Cow::Borrowed("HN"),
        "79" => Cow::Borrowed("HCM"),
        "48" => Cow::Borrowed("DN"),
        "31" => Cow::Borrowed("HP"),
        "92" => Cow::Borrowed("CT"),
        other if other.chars().count() < 2 => Cow::Owned(format!("{other:0>2}")),
        other => Cow::Borrowed(other),
    }
}

/// `BDS-{CITY}-{YYMMDD}{NNNNN}`, e.g. `BDS-HCM-25010100001`.
pub fn format_listing_code(admin_unit_code: &str, day: NaiveDate, sequence: u32) -> String {
    format!(
        "BDS-{}-{}{:05}",
        city_code(admin_unit_code),
        day.format("%y%m%d"),
        sequence
    )
}
