//! Advisory validation of consolidated record sets.
//!
//! Validation never changes the record set; callers decide whether to write
//! it after a failure.

mod presence;

pub use presence::{
    FieldPresence, FieldPresenceCount, PresenceReport, presence_report, validate,
};
