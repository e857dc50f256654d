//! Purchase operations
//!
//! `add_purchase` is the only write that spans two tables. The stock
//! check, the purchase insert and the stock decrement share one
//! transaction, and the album row is locked with `FOR UPDATE` so two
//! buyers of the same album are serialized: the second one blocks until
//! the first commits, then reads the post-decrement stock.

use rust_decimal::Decimal;

use crate::domain::{NewPurchase, Purchase, PurchaseDetail, UserPurchaseSummary};

use super::{Repository, RepositoryError, RepositoryResult};

impl Repository {
    /// All purchases, ascending by id
    pub async fn list_purchases(&self) -> RepositoryResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            "SELECT id, user_id, album_id, quantity FROM purchases ORDER BY id",
        )
        .fetch_all(self.store.pool())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to query purchases"))?;

        Ok(purchases)
    }

    /// Purchases made by one user, ascending by id
    pub async fn purchases_by_user(&self, user_id: i64) -> RepositoryResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            "SELECT id, user_id, album_id, quantity FROM purchases WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(self.store.pool())
        .await
        .inspect_err(|e| tracing::error!(user_id, error = %e, "Failed to query purchases by user"))?;

        Ok(purchases)
    }

    // =========================================================================
    // add_purchase: stock check + insert + decrement in one transaction
    // =========================================================================

    /// Record a purchase and reserve its quantity from stock.
    ///
    /// Either both the purchase row and the decrement are committed, or
    /// neither is. Returns the new purchase id.
    ///
    /// # Errors
    /// - `RepositoryError::NotFound` if the album does not exist
    /// - `RepositoryError::InsufficientStock` if `quantity` exceeds stock
    /// - `RepositoryError::Database` for any store failure, including a
    ///   foreign-key violation for an unknown user
    pub async fn add_purchase(&self, purchase: &NewPurchase) -> RepositoryResult<i64> {
        let NewPurchase {
            user_id,
            album_id,
            quantity,
        } = *purchase;

        tracing::debug!(user_id, album_id, quantity, "Starting purchase transaction");

        // Dropping `tx` without commit rolls back.
        let mut tx = self
            .store
            .begin()
            .await
            .inspect_err(|e| tracing::error!(user_id, album_id, error = %e, "Failed to begin transaction"))?;

        let stock: Option<i32> =
            sqlx::query_scalar("SELECT stock FROM albums WHERE id = $1 FOR UPDATE")
                .bind(album_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(stock) = stock else {
            tracing::warn!(album_id, "Album not found");
            return Err(RepositoryError::album_not_found(album_id));
        };

        tracing::debug!(album_id, current_stock = stock, requested_quantity = quantity, "Checked stock");

        if stock < quantity {
            tracing::warn!(
                album_id,
                available_stock = stock,
                requested_quantity = quantity,
                "Insufficient stock"
            );
            // A failed rollback still releases the lock when the connection drops.
            if let Err(e) = tx.rollback().await {
                tracing::error!(album_id, error = %e, "Failed to roll back purchase");
            }
            return Err(RepositoryError::InsufficientStock {
                album_id,
                have: stock,
                want: quantity,
            });
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO purchases (user_id, album_id, quantity) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id)
        .bind(album_id)
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await
        .inspect_err(|e| tracing::error!(user_id, album_id, error = %e, "Failed to insert purchase"))?;

        sqlx::query("UPDATE albums SET stock = stock - $2 WHERE id = $1")
            .bind(album_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await
            .inspect_err(|e| tracing::error!(album_id, decrement = quantity, error = %e, "Failed to update stock"))?;

        tracing::debug!(album_id, old_stock = stock, new_stock = stock - quantity, "Stock decremented");

        tx.commit()
            .await
            .inspect_err(|e| tracing::error!(purchase_id = id, error = %e, "Failed to commit transaction"))?;

        tracing::info!(purchase_id = id, user_id, album_id, quantity, "Purchase committed");
        Ok(id)
    }

    // =========================================================================
    // Purchase summaries
    // =========================================================================

    /// A user's purchases joined with album details, plus the total spend
    pub async fn user_purchase_summary(&self, user_id: i64) -> RepositoryResult<UserPurchaseSummary> {
        let user = self.user_by_id(user_id).await?;

        let rows: Vec<(i64, i64, String, String, Decimal, i32)> = sqlx::query_as(
            r#"
            SELECT p.id, p.album_id, a.title, a.artist, a.price, p.quantity
            FROM purchases p
            JOIN albums a ON p.album_id = a.id
            WHERE p.user_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.store.pool())
        .await
        .inspect_err(|e| tracing::error!(user_id, error = %e, "Failed to query purchases for summary"))?;

        let purchases = rows
            .into_iter()
            .map(|(id, album_id, title, artist, price, quantity)| {
                PurchaseDetail::new(id, album_id, title, artist, price, quantity)
            })
            .collect();

        Ok(UserPurchaseSummary::new(user, purchases))
    }

    /// One summary per user, ascending by user id. The first failure aborts.
    pub async fn all_user_purchase_summaries(&self) -> RepositoryResult<Vec<UserPurchaseSummary>> {
        let user_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM users ORDER BY id")
            .fetch_all(self.store.pool())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to query users for summary"))?;

        let mut summaries = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            summaries.push(self.user_purchase_summary(user_id).await?);
        }

        Ok(summaries)
    }
}
