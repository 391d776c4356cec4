//! Shapes returned by the external book catalog

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One search hit. Keys keep Open Library's snake_case names, except the work id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogBook {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i32>,
    /// Work identifier without the `/works/` prefix
    #[serde(rename = "openLibraryId")]
    pub open_library_id: String,
    pub cover_url: Option<String>,
}

/// Work metadata used to fill a personal book
#[derive(Debug, Clone, PartialEq)]
pub struct BookMetadata {
    pub title: String,
    /// Resolved author names joined with ", "
    pub authors: String,
    pub publish_year: Option<i32>,
    pub cover_url: Option<String>,
}
