//! Author catalog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author as returned right after creation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAuthor {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Author list entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorShort {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuthor {
    pub name: Option<String>,
    pub country: Option<String>,
}
