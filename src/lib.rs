//! Vitrine: storefront state core
//!
//! A single versioned, immutable state tree holding every storefront and console
//! collection, mutated through one operation protocol and published to subscribers.
//! Around it: the shopping cart aggregate, memoized derived views, a one-way
//! presentation projection and a fragment router.

pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod logging;
pub mod projection;
pub mod provider;
pub mod records;
pub mod router;
pub mod runtime;
pub mod store;
pub mod tree;
pub mod types;
pub mod views;

pub use error::{ApiError, SnapshotError, StoreError};
pub use runtime::{App, AppHandle, Command, Shell};
pub use store::{Operation, Published, Store};
pub use tree::StateTree;
