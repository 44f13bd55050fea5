//! Identity-only classification of flattened locale files

use crate::xml::PathValue;

/// Path fragment marking the identity subtree of an LDML file
pub const IDENTITY_MARKER: &str = "/identity";

/// What to do with a locale file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// At least one record lies outside the identity subtree
    Keep,
    /// Every record (possibly none) lies under the identity subtree
    Delete,
}

/// True when every record's path contains `marker`; vacuously true for no records
pub fn all_under<'a, I>(records: I, marker: &str) -> bool
where
    I: IntoIterator<Item = &'a PathValue>,
{
    records.into_iter().all(|record| record.path.contains(marker))
}

pub fn all_under_identity<'a, I>(records: I) -> bool
where
    I: IntoIterator<Item = &'a PathValue>,
{
    all_under(records, IDENTITY_MARKER)
}

/// Classify against a custom subtree marker
pub fn classify_with_marker<'a, I>(records: I, marker: &str) -> Verdict
where
    I: IntoIterator<Item = &'a PathValue>,
{
    if all_under(records, marker) {
        Verdict::Delete
    } else {
        Verdict::Keep
    }
}

/// Classify a flattened locale file
pub fn classify<'a, I>(records: I) -> Verdict
where
    I: IntoIterator<Item = &'a PathValue>,
{
    classify_with_marker(records, IDENTITY_MARKER)
}
