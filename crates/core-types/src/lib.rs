//! # Marketpulse Core Types
//!
//! The shared vocabulary of the platform: the five entity structs that map
//! one-to-one onto database tables, and the request payloads used to create
//! and partially update them.
//!
//! This crate is deliberately free of I/O. It only carries `serde` derives
//! (for the JSON API and the CSV loader) and `sqlx::FromRow` derives (so the
//! database crate can fetch rows straight into these structs).

pub mod entities;
pub mod payloads;

// Re-export the core types to provide a clean public API.
pub use entities::{AbTest, Customer, LandingPage, Product, TestResult};
pub use payloads::{
    AbTestCreate, AbTestUpdate, CustomerCreate, CustomerUpdate, LandingPageCreate,
    LandingPageUpdate, ProductCreate, ProductUpdate, TestResultCreate, TestResultUpdate,
};
