//! Data models for the personal library

pub mod author;
pub mod book;
pub mod catalog;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorShort, CreatedAuthor};
pub use book::{BookDetails, BookShort, Installment, InstallmentPlan, InstallmentStatus, PersonalBook};
pub use catalog::{BookMetadata, CatalogBook};
pub use user::{User, UserClaims, UserInfo};
