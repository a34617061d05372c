//! Caller-chosen subsets of the field catalog.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::{Field, FieldCatalog};

/// A non-empty set of fields, iterated in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct FieldSelection {
    fields: BTreeSet<Field>,
}

impl FieldSelection {
    /// Resolve field labels against `catalog`.
    ///
    /// Duplicates collapse; the input order is irrelevant.
    pub fn parse<I, S>(catalog: &FieldCatalog, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = names
            .into_iter()
            .map(|name| catalog.resolve(name.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;
        Self::from_fields(fields)
    }

    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Result<Self> {
        let fields: BTreeSet<Field> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(ModelError::EmptySelection);
        }
        Ok(Self { fields })
    }

    /// Every field of the catalog.
    #[must_use]
    pub fn all(catalog: &FieldCatalog) -> Self {
        Self {
            fields: catalog.fields().into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column labels in catalog order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.iter().map(|field| field.label().into_owned()).collect()
    }

    /// Whether charge records need to be visited at all.
    #[must_use]
    pub fn wants_charges(&self) -> bool {
        self.iter().any(Field::is_charge_related)
    }
}

impl TryFrom<Vec<Field>> for FieldSelection {
    type Error = ModelError;

    fn try_from(fields: Vec<Field>) -> Result<Self> {
        Self::from_fields(fields)
    }
}

impl From<FieldSelection> for Vec<Field> {
    fn from(selection: FieldSelection) -> Self {
        selection.fields.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a FieldSelection {
    type Item = Field;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Field>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter().copied()
    }
}
