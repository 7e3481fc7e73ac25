//! Collection point constants and input parsing.
//!
//! Parsing of the `items` filter lives here so that malformed input is
//! rejected before any query is built.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Image assigned to every newly registered point.
pub const DEFAULT_POINT_IMAGE: &str = "https://images.unsplash.com/photo-1542838132-92c53300491e?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60";

/// Parse a comma-separated list of item ids (`"1,2, 3"`).
///
/// Whitespace around tokens is ignored. Duplicates are collapsed and the
/// result is sorted. An empty list or any non-numeric token is a
/// validation error.
pub fn parse_item_ids(raw: &str) -> Result<Vec<DbId>, CoreError> {
    if raw.trim().is_empty() {
        return Err(CoreError::Validation(
            "items must contain at least one item id".into(),
        ));
    }

    let mut ids = BTreeSet::new();
    for token in raw.split(',') {
        let token = token.trim();
        let id: DbId = token.parse().map_err(|_| {
            CoreError::Validation(format!("items contains a non-numeric id: '{token}'"))
        })?;
        ids.insert(id);
    }

    Ok(ids.into_iter().collect())
}

/// Collapse duplicate item ids, preserving first-seen order.
pub fn dedup_item_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Join an uploads base URL and an image file name.
pub fn image_url(base_url: &str, image: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), image)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_item_ids_single() {
        assert_eq!(parse_item_ids("1").unwrap(), vec![1]);
    }

    #[test]
    fn parse_item_ids_trims_whitespace() {
        assert_eq!(parse_item_ids(" 3, 1 ,2 ").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn parse_item_ids_collapses_duplicates() {
        assert_eq!(parse_item_ids("2,2,1,2").unwrap(), vec![1, 2]);
    }

    #[test]
    fn parse_item_ids_empty_is_rejected() {
        assert_matches!(parse_item_ids(""), Err(CoreError::Validation(_)));
        assert_matches!(parse_item_ids("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_item_ids_non_numeric_is_rejected() {
        assert_matches!(parse_item_ids("1,abc"), Err(CoreError::Validation(msg)) if msg.contains("abc"));
    }

    #[test]
    fn parse_item_ids_blank_token_is_rejected() {
        assert_matches!(parse_item_ids("1,,2"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn dedup_item_ids_keeps_first_occurrence_order() {
        assert_eq!(dedup_item_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn image_url_strips_trailing_slash() {
        assert_eq!(
            image_url("http://localhost:3333/uploads/", "oleo.svg"),
            "http://localhost:3333/uploads/oleo.svg"
        );
        assert_eq!(
            image_url("http://localhost:3333/uploads", "oleo.svg"),
            "http://localhost:3333/uploads/oleo.svg"
        );
    }
}
