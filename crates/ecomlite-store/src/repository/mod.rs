//! # Repository Module
//!
//! Typed documents stored in key-value slots.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartStore / MockSession                                               │
//! │       │                                                                 │
//! │       │  repository.save(&cart)                                        │
//! │       ▼                                                                 │
//! │  CartRepository / ProfileRepository                                    │
//! │  ├── load(&self)          typed value, fallbacks handled here          │
//! │  ├── save(&self, value)   serde_json document                          │
//! │  └── clear(&self)         removes the slot                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  KeyValueSlot (file, memory, write-behind)                             │
//! │                                                                         │
//! │  The traits let tests swap in a repository that fails on demand.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`cart::CartRepository`] - The persisted cart
//! - [`profile::ProfileRepository`] - The mock session's profile

pub mod cart;
pub mod profile;
