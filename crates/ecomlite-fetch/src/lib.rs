//! # ecomlite-fetch: Remote Catalog Access
//!
//! Reads the product catalog over HTTP and tracks each request as a
//! [`FetchResource`]: a data / loading / error triple that views render
//! directly.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CLI (products, product <id>, admin ...)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ecomlite-fetch (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ProductCatalog ──► FetchResource<Vec<Product>>                │   │
//! │  │        │                  │                                     │   │
//! │  │        │ product(id)      │ trigger() / replace()               │   │
//! │  │        ▼                  ▼                                     │   │
//! │  │   FetchResource<Product>  Fetcher (trait) ◄── HttpFetcher       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GET https://fakestoreapi.com/products[/{id}]                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - The `Fetcher` seam and its reqwest implementation
//! - [`resource`] - `FetchResource<T>` with the request-generation counter
//! - [`products`] - `ProductCatalog`, the list plus local admin edits
//! - [`error`] - Fetch error types and their user-facing messages

pub mod client;
pub mod error;
pub mod products;
pub mod resource;

pub use client::{ClientConfig, Fetcher, HttpFetcher};
pub use error::{FetchError, FetchResult};
pub use products::ProductCatalog;
pub use resource::{FetchMode, FetchResource, ResourceState};

/// Catalog API used when nothing is configured.
pub const DEFAULT_API_URL: &str = "https://fakestoreapi.com";

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to load data";
