//! Shared types for CAMT.054 consolidation.
//!
//! - **field**: the ordered field catalog and field labels
//! - **selection**: caller-chosen, catalog-ordered field subsets
//! - **record**: one flattened transaction detail
//! - **request**: run parameters and their precondition checks

pub mod error;
pub mod field;
pub mod record;
pub mod request;
pub mod selection;

pub use error::{ModelError, Result};
pub use field::{ChargePart, DEFAULT_CHARGE_SLOTS, Field, FieldCatalog};
pub use record::Record;
pub use request::ConsolidateRequest;
pub use selection::FieldSelection;
