//! CLI library components for the CAMT.054 consolidator.

pub mod logging;
pub mod pipeline;
