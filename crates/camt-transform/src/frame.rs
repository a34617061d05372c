//! Record set representation.
//!
//! [`RecordSet`] wraps a Polars DataFrame whose columns are the selected
//! fields, labelled and ordered as in the field catalog. Every column is a
//! nullable string column; absent source data is null.

use polars::prelude::DataFrame;

use camt_model::Field;

/// Consolidated rows of one run.
#[derive(Debug, Clone)]
pub struct RecordSet {
    fields: Vec<Field>,
    data: DataFrame,
}

impl RecordSet {
    pub(crate) fn new(fields: Vec<Field>, data: DataFrame) -> Self {
        Self { fields, data }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Column fields in catalog order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Column labels in catalog order.
    pub fn column_labels(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.label().into_owned())
            .collect()
    }

    /// Value of `field` in row `row`; `None` for nulls, unknown columns and
    /// rows out of range.
    pub fn value(&self, row: usize, field: Field) -> Option<&str> {
        if row >= self.height() {
            return None;
        }
        let column = self.data.column(&field.label()).ok()?;
        column.str().ok()?.get(row)
    }

    /// Number of non-null values in the column of `field`.
    pub fn non_null_count(&self, field: Field) -> usize {
        self.data
            .column(&field.label())
            .map(|column| column.len() - column.null_count())
            .unwrap_or(0)
    }

    /// Values of `field` in row order.
    pub fn column_values(&self, field: Field) -> Vec<Option<&str>> {
        let Ok(column) = self.data.column(&field.label()) else {
            return Vec::new();
        };
        match column.str() {
            Ok(values) => values.into_iter().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// The underlying DataFrame.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }
}
