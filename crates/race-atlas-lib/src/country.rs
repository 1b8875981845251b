//! Country name normalization
//!
//! The circuits table uses short aliases for a handful of countries while the
//! boundary topology labels features with their full names.

/// Alias to canonical map name
const ALIASES: &[(&str, &str)] = &[
    ("UK", "United Kingdom"),
    ("USA", "United States of America"),
    ("UAE", "United Arab Emirates"),
    ("Korea", "South Korea"),
];

/// Map a raw country name to the name used by the boundary topology.
///
/// Names without an alias pass through unchanged.
pub fn normalize_country(name: &str) -> String {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| name.to_string())
}
