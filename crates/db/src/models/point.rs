//! Collection point models and DTOs.

use ecoleta_core::error::CoreError;
use ecoleta_core::point::parse_item_ids;
use ecoleta_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::item::ItemTitle;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `points` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Point {
    pub id: DbId,
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
}

/// A point together with the titles of the items it accepts.
#[derive(Debug, Clone, Serialize)]
pub struct PointDetail {
    pub point: Point,
    pub items: Vec<ItemTitle>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for registering a new point. The image is assigned server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePoint {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "whatsapp is required"))]
    pub whatsapp: String,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude out of range"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude out of range"))]
    pub longitude: f64,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(equal = 2, message = "uf must be a two-letter abbreviation"))]
    pub uf: String,
    /// Accepted item ids. Duplicates are collapsed on insert.
    #[validate(length(min = 1, message = "items must not be empty"))]
    pub items: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Query parameters for `GET /points`, as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointFilterParams {
    pub city: Option<String>,
    pub uf: Option<String>,
    /// Comma-separated item ids, e.g. `"1,2,3"`.
    pub items: Option<String>,
}

/// A validated point filter: location plus at least one item id.
#[derive(Debug, Clone, PartialEq)]
pub struct PointFilter {
    pub city: String,
    pub uf: String,
    pub item_ids: Vec<DbId>,
}

impl TryFrom<PointFilterParams> for PointFilter {
    type Error = CoreError;

    fn try_from(params: PointFilterParams) -> Result<Self, Self::Error> {
        let city = required(params.city, "city")?;
        let uf = required(params.uf, "uf")?;
        let items = params
            .items
            .ok_or_else(|| CoreError::Validation("items is required".into()))?;

        Ok(Self {
            city,
            uf,
            item_ids: parse_item_ids(&items)?,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, CoreError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(city: Option<&str>, uf: Option<&str>, items: Option<&str>) -> PointFilterParams {
        PointFilterParams {
            city: city.map(String::from),
            uf: uf.map(String::from),
            items: items.map(String::from),
        }
    }

    #[test]
    fn filter_from_complete_params() {
        let filter = PointFilter::try_from(params(Some("Recife"), Some("PE"), Some("2,1"))).unwrap();
        assert_eq!(filter.city, "Recife");
        assert_eq!(filter.uf, "PE");
        assert_eq!(filter.item_ids, vec![1, 2]);
    }

    #[test]
    fn filter_requires_location() {
        assert!(PointFilter::try_from(params(None, Some("PE"), Some("1"))).is_err());
        assert!(PointFilter::try_from(params(Some("Recife"), Some(" "), Some("1"))).is_err());
    }

    #[test]
    fn filter_rejects_missing_or_bad_items() {
        assert!(PointFilter::try_from(params(Some("Recife"), Some("PE"), None)).is_err());
        assert!(PointFilter::try_from(params(Some("Recife"), Some("PE"), Some(""))).is_err());
        assert!(PointFilter::try_from(params(Some("Recife"), Some("PE"), Some("x"))).is_err());
    }

    fn valid_point() -> CreatePoint {
        CreatePoint {
            name: "Mercado do Bairro".into(),
            email: "contato@mercado.com.br".into(),
            whatsapp: "81999990000".into(),
            latitude: -8.05,
            longitude: -34.9,
            city: "Recife".into(),
            uf: "PE".into(),
            items: vec![1, 2],
        }
    }

    #[test]
    fn create_point_valid_passes() {
        assert!(valid_point().validate().is_ok());
    }

    #[test]
    fn create_point_rejects_empty_items() {
        let input = CreatePoint {
            items: vec![],
            ..valid_point()
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn create_point_rejects_bad_email_and_uf() {
        let input = CreatePoint {
            email: "not-an-email".into(),
            uf: "Pernambuco".into(),
            ..valid_point()
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("uf"));
    }

    #[test]
    fn create_point_rejects_out_of_range_coordinates() {
        let input = CreatePoint {
            latitude: 91.0,
            longitude: -181.0,
            ..valid_point()
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("latitude"));
        assert!(fields.contains_key("longitude"));
    }
}
