use std::collections::BTreeSet;

use super::model::{canonical_code, Seasonality};

// ---------------------------------------------------------------------------
// Code sets: which user codes are seasonal
// ---------------------------------------------------------------------------

/// Configured seasonal / non-seasonal user codes, in canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeSets {
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
}

impl CodeSets {
    pub fn new<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        CodeSets {
            positive: positive.into_iter().map(|c| canonical_code(c.as_ref())).collect(),
            negative: negative.into_iter().map(|c| canonical_code(c.as_ref())).collect(),
        }
    }

    /// Positive membership wins when a code appears in both sets.
    pub fn classify(&self, user_code: &str) -> Seasonality {
        if self.positive.contains(user_code) {
            Seasonality::Seasonal
        } else if self.negative.contains(user_code) {
            Seasonality::NonSeasonal
        } else {
            Seasonality::Unresolved
        }
    }
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// A row after repair, interpolation and labelling, as seen by the filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledRow<'a> {
    pub user_code: &'a str,
    pub value: Option<f64>,
    pub label: Seasonality,
}

/// Users with at least one measurement that is not exactly zero.
///
/// A missing value counts as non-zero. Rows with an empty code belong to no
/// group and never contribute.
pub fn non_degenerate_users<'a>(rows: &[LabeledRow<'a>]) -> BTreeSet<&'a str> {
    rows.iter()
        .filter(|r| !r.user_code.is_empty())
        .filter(|r| r.value.map_or(true, |v| v != 0.0))
        .map(|r| r.user_code)
        .collect()
}

/// Return indices of rows that survive cleaning, in input order.
///
/// A row passes when:
/// * its user has some non-zero measurement
/// * its label is resolved
/// * its measurement is present
pub fn filtered_indices(rows: &[LabeledRow<'_>]) -> Vec<usize> {
    let keep_users = non_degenerate_users(rows);
    rows.iter()
        .enumerate()
        .filter(|(_, r)| keep_users.contains(r.user_code))
        .filter(|(_, r)| r.label != Seasonality::Unresolved && r.value.is_some())
        .map(|(i, _)| i)
        .collect()
}
