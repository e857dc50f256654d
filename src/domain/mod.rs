//! Domain module
//!
//! Catalog, account and purchase types plus the validated price primitive.

pub mod context;
pub mod models;
pub mod price;

pub use context::RequestContext;
pub use models::{
    Album, NewAlbum, NewPurchase, NewUser, Purchase, PurchaseDetail, User, UserPurchaseSummary,
};
pub use price::{Price, PriceError};
