// src/filing/mod.rs
pub mod document;
pub mod models;

pub use document::{Element, FilingDocument};
pub use models::FilingPeriod;
