//! Installment planner: splits a book price into dated payments

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::{AppError, AppResult},
    models::book::{Installment, InstallmentPlan, InstallmentStatus},
    repository::BooksRepository,
};

pub const BOOK_NOT_FOUND: &str = "Book not found in your library";
pub const MIN_INSTALLMENTS: &str = "Number of installments must be at least 1";
const DAYS_BETWEEN_INSTALLMENTS: i64 = 30;
/// Upper bound keeping every due date and the stored JSON list small
pub const MAX_INSTALLMENTS: u32 = 1200;

/// Split `price` into `count` installments due every 30 days from `now`.
///
/// Returns the unrounded per-installment amount together with the schedule.
/// Each scheduled amount is rounded to cents on its own, so the sum may
/// differ from `price` by a few cents.
pub fn build_schedule(price: f64, count: u32, now: DateTime<Utc>) -> (f64, Vec<Installment>) {
    let installment_amount = price / f64::from(count);
    let rounded = round_to_cents(installment_amount);

    let installments = (1..=count)
        .map(|number| Installment {
            number,
            amount: rounded,
            status: InstallmentStatus::Pending,
            due_date: now + Duration::days(DAYS_BETWEEN_INSTALLMENTS * i64::from(number)),
        })
        .collect();

    (installment_amount, installments)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Clone)]
pub struct InstallmentsService {
    books: Arc<dyn BooksRepository>,
}

impl InstallmentsService {
    pub fn new(books: Arc<dyn BooksRepository>) -> Self {
        Self { books }
    }

    /// Create (or overwrite) the plan of a book owned by `user_id`
    pub async fn create_plan(&self, book_id: i32, user_id: i32, count: i64) -> AppResult<InstallmentPlan> {
        let book = self
            .books
            .books_get(user_id, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;

        let price = book
            .price
            .filter(|price| *price != 0.0)
            .ok_or_else(|| AppError::Validation("Book price is not set".to_string()))?;

        let count = u32::try_from(count)
            .ok()
            .filter(|count| *count >= 1)
            .ok_or_else(|| AppError::Validation(MIN_INSTALLMENTS.to_string()))?;
        if count > MAX_INSTALLMENTS {
            return Err(AppError::Validation(format!(
                "Number of installments cannot exceed {}",
                MAX_INSTALLMENTS
            )));
        }

        let (installment_amount, installments) = build_schedule(price, count, Utc::now());

        let updated = self
            .books
            .books_save_installment_plan(user_id, book_id, count as i32, installment_amount, installments)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;

        tracing::info!("Created {} installment plan for book id={} user id={}", count, book_id, user_id);
        Ok(updated.into())
    }

    pub async fn get_plan(&self, book_id: i32, user_id: i32) -> AppResult<InstallmentPlan> {
        let book = self
            .books
            .books_get(user_id, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))?;

        if book.number_of_installments.unwrap_or(0) == 0 {
            return Err(AppError::Validation(
                "Installment plan not created for this book".to_string(),
            ));
        }

        Ok(book.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::book::PersonalBook, repository::MockBooksRepository};
    use mockall::predicate::eq;
    use sqlx::types::Json;

    fn book(price: Option<f64>) -> PersonalBook {
        let now = Utc::now();
        PersonalBook {
            id: 4,
            user_id: 1,
            open_library_id: "OL893415W".to_string(),
            title: "Dune".to_string(),
            author: Some("Frank Herbert".to_string()),
            publish_year: Some(1965),
            price,
            notes: None,
            cover_url: None,
            number_of_installments: None,
            installment_amount: None,
            installments: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_schedule_for_100_in_3() {
        let now = Utc::now();
        let (amount, installments) = build_schedule(100.0, 3, now);

        assert!((amount - 100.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(installments.len(), 3);
        for (i, installment) in installments.iter().enumerate() {
            let number = i as u32 + 1;
            assert_eq!(installment.number, number);
            assert_eq!(installment.amount, 33.33);
            assert_eq!(installment.status, InstallmentStatus::Pending);
            assert_eq!(installment.due_date, now + Duration::days(30 * i64::from(number)));
        }

        let total: f64 = installments.iter().map(|i| i.amount).sum();
        assert!((total - 99.99).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_single_installment_keeps_price() {
        let (amount, installments) = build_schedule(19.99, 1, Utc::now());
        assert_eq!(amount, 19.99);
        assert_eq!(installments.len(), 1);
        assert_eq!(installments[0].amount, 19.99);
    }

    #[tokio::test]
    async fn test_create_plan_persists_schedule() {
        let mut books = MockBooksRepository::new();
        books
            .expect_books_get()
            .with(eq(1), eq(4))
            .returning(|_, _| Ok(Some(book(Some(100.0)))));
        books
            .expect_books_save_installment_plan()
            .times(1)
            .returning(|_, _, count, amount, installments| {
                let mut saved = book(Some(100.0));
                saved.number_of_installments = Some(count);
                saved.installment_amount = Some(amount);
                saved.installments = Some(Json(installments));
                Ok(Some(saved))
            });

        let service = InstallmentsService::new(Arc::new(books));
        let plan = service.create_plan(4, 1, 3).await.unwrap();

        assert_eq!(plan.number_of_installments, Some(3));
        assert_eq!(plan.installments.len(), 3);
        assert_eq!(
            plan.installments.iter().map(|i| i.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn test_create_plan_rejects_zero_installments_without_writing() {
        let mut books = MockBooksRepository::new();
        books.expect_books_get().returning(|_, _| Ok(Some(book(Some(100.0)))));
        books.expect_books_save_installment_plan().times(0);

        let service = InstallmentsService::new(Arc::new(books));
        let result = service.create_plan(4, 1, 0).await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == MIN_INSTALLMENTS));
    }

    #[tokio::test]
    async fn test_create_plan_rejects_oversized_plans() {
        let mut books = MockBooksRepository::new();
        books.expect_books_get().returning(|_, _| Ok(Some(book(Some(100.0)))));
        books.expect_books_save_installment_plan().times(0);

        let service = InstallmentsService::new(Arc::new(books));
        let result = service.create_plan(4, 1, i64::from(MAX_INSTALLMENTS) + 1).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_plan_requires_price() {
        let mut books = MockBooksRepository::new();
        books.expect_books_get().returning(|_, _| Ok(Some(book(None))));
        books.expect_books_save_installment_plan().times(0);

        let service = InstallmentsService::new(Arc::new(books));
        let result = service.create_plan(4, 1, 3).await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Book price is not set"));
    }

    #[tokio::test]
    async fn test_plan_for_foreign_book_is_not_found() {
        let mut books = MockBooksRepository::new();
        books.expect_books_get().with(eq(2), eq(4)).returning(|_, _| Ok(None));

        let service = InstallmentsService::new(Arc::new(books));

        assert!(matches!(service.create_plan(4, 2, 3).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.get_plan(4, 2).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_plan_before_creation() {
        let mut books = MockBooksRepository::new();
        books.expect_books_get().returning(|_, _| Ok(Some(book(Some(50.0)))));

        let service = InstallmentsService::new(Arc::new(books));
        let result = service.get_plan(4, 1).await;

        assert!(
            matches!(result, Err(AppError::Validation(msg)) if msg == "Installment plan not created for this book")
        );
    }
}
