//! Recyclable waste category models.

use ecoleta_core::point::image_url;
use ecoleta_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub image: String,
    pub title: String,
}

impl Item {
    /// Shape the row for clients, resolving `image` against the uploads base URL.
    pub fn into_view(self, uploads_base_url: &str) -> ItemView {
        ItemView {
            image_url: image_url(uploads_base_url, &self.image),
            id: self.id,
            title: self.title,
        }
    }
}

/// Item as served by `GET /items`.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: DbId,
    pub title: String,
    pub image_url: String,
}

/// Title-only projection used in point detail responses.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ItemTitle {
    pub title: String,
}
