// src/extractors/mod.rs
pub mod fields;
pub mod gender;
pub mod people;
pub mod record;

// Re-export key extraction types for convenience
pub use gender::{GenderGuesser, NameGenderTable};
pub use record::{OrganizationRecord, RecordAssembler};
