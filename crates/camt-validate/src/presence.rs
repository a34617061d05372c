//! Field presence checks.
//!
//! A selected field whose column is empty in every row usually means the
//! wrong field was selected or the source files never carry that data.

use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;
use tracing::{debug, warn};

use camt_model::{Field, FieldSelection};
use camt_transform::RecordSet;

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPresence {
    pub ok: bool,
    /// First field, in catalog order, without any value.
    pub failing_field: Option<Field>,
}

impl FieldPresence {
    fn passed() -> Self {
        Self {
            ok: true,
            failing_field: None,
        }
    }

    fn failed(field: Field) -> Self {
        Self {
            ok: false,
            failing_field: Some(field),
        }
    }

    /// User-facing failure message.
    pub fn message(&self) -> Option<String> {
        self.failing_field
            .map(|field| format!("All entries for the field '{field}' are missing"))
    }
}

/// Populated-row count of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPresenceCount {
    pub field: Field,
    pub populated: usize,
}

/// Populated counts of every selected field, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceReport {
    pub row_count: usize,
    pub fields: Vec<FieldPresenceCount>,
}

impl PresenceReport {
    /// Fields with no populated row, in catalog order.
    pub fn missing(&self) -> Vec<Field> {
        self.fields
            .iter()
            .filter(|count| count.populated == 0)
            .map(|count| count.field)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(|count| count.populated > 0)
    }
}

/// Check that every selected field has a value in at least one row.
///
/// Stops at the first failing field in catalog order. The record set is not
/// modified.
pub fn validate(record_set: &RecordSet, selection: &FieldSelection) -> FieldPresence {
    let df = record_set.data();
    for field in selection {
        if !has_collected_data(df, &field.label()) {
            warn!(field = %field, rows = df.height(), "field has no values");
            return FieldPresence::failed(field);
        }
    }
    debug!(field_count = selection.len(), "all selected fields present");
    FieldPresence::passed()
}

/// Count populated rows for every selected field.
pub fn presence_report(record_set: &RecordSet, selection: &FieldSelection) -> PresenceReport {
    let df = record_set.data();
    let fields = selection
        .iter()
        .map(|field| FieldPresenceCount {
            field,
            populated: populated_count(df, &field.label()),
        })
        .collect();
    PresenceReport {
        row_count: df.height(),
        fields,
    }
}

fn is_populated(value: &AnyValue<'_>) -> bool {
    !matches!(value, AnyValue::Null)
}

/// Whether any row holds a non-null value.
fn has_collected_data(df: &DataFrame, column: &str) -> bool {
    let Ok(series) = df.column(column) else {
        return false;
    };
    (0..df.height()).any(|idx| series.get(idx).is_ok_and(|value| is_populated(&value)))
}

fn populated_count(df: &DataFrame, column: &str) -> usize {
    let Ok(series) = df.column(column) else {
        return 0;
    };
    (0..df.height())
        .filter(|idx| series.get(*idx).is_ok_and(|value| is_populated(&value)))
        .count()
}
