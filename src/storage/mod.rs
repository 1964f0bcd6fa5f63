// src/storage/mod.rs

//! Persisted job store.

mod db;

pub use db::{JobStore, StoreStats, UpsertStats};
