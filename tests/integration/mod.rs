//! Integration tests for the Vitrine storefront state core

mod cart_flow;
mod config_integration;
mod derived_views;
mod projection_flow;
mod runtime_generation;
mod snapshot_load;
mod store_ops;
mod test_utils;
