//! One flattened transaction detail.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::field::Field;
use crate::selection::FieldSelection;

/// Values for the selected fields of one transaction detail.
///
/// Every selected field is present as a key; absent source data is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<Field, Option<String>>,
}

impl Record {
    /// A record with every selected field set to `None`.
    #[must_use]
    pub fn blank(selection: &FieldSelection) -> Self {
        Self {
            values: selection.iter().map(|field| (field, None)).collect(),
        }
    }

    /// Store a value for a selected field.
    ///
    /// Returns false and leaves the record unchanged when `field` was not
    /// selected.
    pub fn set(&mut self, field: Field, value: Option<String>) -> bool {
        match self.values.get_mut(&field) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).and_then(|value| value.as_deref())
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.keys().copied()
    }

    /// Field/value pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
