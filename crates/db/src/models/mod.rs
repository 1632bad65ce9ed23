//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write operations that touch the table

pub mod alert;
pub mod challenge;
pub mod enrollment;
pub mod progress;
