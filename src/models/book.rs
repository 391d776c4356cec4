//! Personal library book model and installment records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;

/// Installment status. Plans are always created with every entry pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Overdue,
}

/// One dated payment of an installment plan (stored as JSON on the book)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// 1-based sequence number
    pub number: u32,
    pub amount: f64,
    pub status: InstallmentStatus,
    pub due_date: DateTime<Utc>,
}

/// Full personal book row
#[derive(Debug, Clone, FromRow)]
pub struct PersonalBook {
    pub id: i32,
    pub user_id: i32,
    pub open_library_id: String,
    pub title: String,
    pub author: Option<String>,
    pub publish_year: Option<i32>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub cover_url: Option<String>,
    pub number_of_installments: Option<i32>,
    pub installment_amount: Option<f64>,
    pub installments: Option<Json<Vec<Installment>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data persisted when a book is added to a library
#[derive(Debug, Clone, PartialEq)]
pub struct NewPersonalBook {
    pub user_id: i32,
    pub open_library_id: String,
    pub title: String,
    pub author: Option<String>,
    pub publish_year: Option<i32>,
    pub price: f64,
    pub notes: Option<String>,
    pub cover_url: Option<String>,
}

/// Book as returned right after it was added
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub id: i32,
    pub open_library_id: String,
    pub title: String,
    pub author: Option<String>,
    pub publish_year: Option<i32>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Library list entry (no price, notes or update timestamp)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookShort {
    pub id: i32,
    pub open_library_id: String,
    pub title: String,
    pub author: Option<String>,
    pub publish_year: Option<i32>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full book projection
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub id: i32,
    pub open_library_id: String,
    pub title: String,
    pub author: Option<String>,
    pub publish_year: Option<i32>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of a notes update
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookNotes {
    pub id: i32,
    pub title: String,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Installment plan view of a book
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub id: i32,
    pub title: String,
    pub price: Option<f64>,
    pub number_of_installments: Option<i32>,
    pub installment_amount: Option<f64>,
    pub installments: Vec<Installment>,
}

impl From<PersonalBook> for InstallmentPlan {
    fn from(book: PersonalBook) -> Self {
        Self {
            id: book.id,
            title: book.title,
            price: book.price,
            number_of_installments: book.number_of_installments,
            installment_amount: book.installment_amount,
            installments: book.installments.map(|Json(list)| list).unwrap_or_default(),
        }
    }
}

/// Add book request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddBookRequest {
    pub open_library_id: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

/// Update notes request. Kept loosely typed so a non-string value is a 400, not a decode failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNotesRequest {
    #[schema(value_type = Option<String>)]
    pub notes: Option<serde_json::Value>,
}

/// Create installment plan request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallmentsRequest {
    pub number_of_installments: Option<i64>,
}
