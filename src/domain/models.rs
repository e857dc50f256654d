//! Catalog, account and purchase records
//!
//! Row types map 1:1 to the `albums`, `users` and `purchases` tables.
//! The `New*` types carry validated input for inserts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Price;

/// Album record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub price: Decimal,
    pub stock: i32,
}

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Purchase record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Purchase {
    pub id: i64,
    pub user_id: i64,
    pub album_id: i64,
    pub quantity: i32,
}

/// Validated album to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: Price,
    pub stock: i32,
}

/// Validated user to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// Validated purchase request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewPurchase {
    pub user_id: i64,
    pub album_id: i64,
    pub quantity: i32,
}

/// Purchase joined with the album it bought
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDetail {
    pub id: i64,
    pub album_id: i64,
    pub album_title: String,
    pub artist: String,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

impl PurchaseDetail {
    /// Build a detail row, computing `subtotal = price × quantity`.
    pub fn new(
        id: i64,
        album_id: i64,
        album_title: String,
        artist: String,
        price: Decimal,
        quantity: i32,
    ) -> Self {
        Self {
            id,
            album_id,
            album_title,
            artist,
            price,
            quantity,
            subtotal: price * Decimal::from(quantity),
        }
    }
}

/// A user with their purchase history and total spend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPurchaseSummary {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub purchases: Vec<PurchaseDetail>,
    pub total_cost: Decimal,
}

impl UserPurchaseSummary {
    /// Summarize `purchases` for `user`. `total_cost` is the sum of subtotals.
    pub fn new(user: User, purchases: Vec<PurchaseDetail>) -> Self {
        let total_cost = purchases.iter().map(|p| p.subtotal).sum();
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            purchases,
            total_cost,
        }
    }
}
