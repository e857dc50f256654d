//! record_shop Library
//!
//! Re-exports modules for integration testing and the binaries.

pub mod config;
pub mod db;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod repository;
pub mod server;

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use domain::{Album, Price, PriceError, Purchase, RequestContext, User, UserPurchaseSummary};
pub use error::{AppError, AppResult};
pub use repository::{Repository, RepositoryError};
