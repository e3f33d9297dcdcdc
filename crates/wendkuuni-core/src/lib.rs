//! Core types and operations for the Wend Kuuni water-point registry.
//!
//! This crate owns the water-point data model, the repository that persists
//! the collection through a [`store::KeyValueStore`], and the pure helpers
//! (distance, filters, display formatting) the presentation layer calls.
//! It is free of database and CLI dependencies.

pub mod clock;
pub mod display;
pub mod error;
pub mod filter;
pub mod geo;
pub mod location;
pub mod memory;
pub mod payload;
pub mod repository;
pub mod store;
pub mod water_point;

pub use error::{Error, Result};
pub use repository::WaterPointRepository;
