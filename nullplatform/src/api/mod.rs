//! nullplatform REST API client

pub mod application;
pub mod client;
pub mod common;
pub mod error;
pub mod parameter;

pub use client::Client;
pub use error::ApiError;
