//! The field catalog.
//!
//! A [`Field`] names one output column. The catalog order is the declaration
//! order of [`Field`], with charge fields last (ordered by index, then by
//! [`ChargePart`]), so sorting fields always yields output column order.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};

/// Number of charge records exposed by the default catalog.
pub const DEFAULT_CHARGE_SLOTS: u32 = 2;

/// The attribute read from a charge record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChargePart {
    Amount,
    Currency,
    Type,
}

impl ChargePart {
    pub const ALL: [ChargePart; 3] = [Self::Amount, Self::Currency, Self::Type];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Amount => "Amount",
            Self::Currency => "Currency",
            Self::Type => "Type",
        }
    }
}

/// One column of the consolidated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    BookingDate,
    ValueDate,
    TransactionAmount,
    TransactionCurrency,
    DebtorName,
    DebtorAddressLine1,
    DebtorAddressLine2,
    DebtorIban,
    UltimateDebtorName,
    AdditionalRemittanceInfo3,
    CreditorReferenceType,
    CreditorReference,
    TotalChargesAmount,
    /// A charge record attribute; `index` is 1-based.
    Charge { index: u32, part: ChargePart },
}

impl Field {
    /// Catalog entries that do not depend on the charge slot count.
    pub const FIXED: [Field; 13] = [
        Self::BookingDate,
        Self::ValueDate,
        Self::TransactionAmount,
        Self::TransactionCurrency,
        Self::DebtorName,
        Self::DebtorAddressLine1,
        Self::DebtorAddressLine2,
        Self::DebtorIban,
        Self::UltimateDebtorName,
        Self::AdditionalRemittanceInfo3,
        Self::CreditorReferenceType,
        Self::CreditorReference,
        Self::TotalChargesAmount,
    ];

    #[must_use]
    pub const fn charge(index: u32, part: ChargePart) -> Self {
        Self::Charge { index, part }
    }

    /// The column label, e.g. `"Debtor IBAN"` or `"Charge 2 Currency"`.
    #[must_use]
    pub fn label(self) -> Cow<'static, str> {
        let fixed = match self {
            Self::BookingDate => "Booking Date",
            Self::ValueDate => "Value Date",
            Self::TransactionAmount => "Transaction Amount",
            Self::TransactionCurrency => "Transaction Currency",
            Self::DebtorName => "Debtor Name",
            Self::DebtorAddressLine1 => "Debtor Address Line 1",
            Self::DebtorAddressLine2 => "Debtor Address Line 2",
            Self::DebtorIban => "Debtor IBAN",
            Self::UltimateDebtorName => "Ultimate Debtor Name",
            Self::AdditionalRemittanceInfo3 => "Additional Remittance Info 3",
            Self::CreditorReferenceType => "Creditor Reference Type",
            Self::CreditorReference => "Creditor Reference",
            Self::TotalChargesAmount => "Total Charges Amount",
            Self::Charge { index, part } => {
                return Cow::Owned(format!("Charge {index} {}", part.label()));
            }
        };
        Cow::Borrowed(fixed)
    }

    /// True for the total charges amount and every indexed charge field.
    #[must_use]
    pub const fn is_charge_related(self) -> bool {
        matches!(self, Self::TotalChargesAmount | Self::Charge { .. })
    }

    /// The 1-based charge record index, if this is a charge field.
    #[must_use]
    pub const fn charge_index(self) -> Option<u32> {
        match self {
            Self::Charge { index, .. } => Some(index),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Field {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self> {
        let name = raw.trim();
        if let Some(field) = Self::FIXED.iter().find(|field| field.label() == name) {
            return Ok(*field);
        }
        parse_charge(name).ok_or_else(|| ModelError::UnknownField {
            name: name.to_string(),
        })
    }
}

fn parse_charge(name: &str) -> Option<Field> {
    let rest = name.strip_prefix("Charge ")?;
    let (index, part) = rest.split_once(' ')?;
    let index: u32 = index.parse().ok()?;
    if index == 0 {
        return None;
    }
    let part = ChargePart::ALL
        .into_iter()
        .find(|candidate| candidate.label() == part)?;
    Some(Field::charge(index, part))
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The ordered set of fields a caller may select from.
///
/// The charge section is open-ended: `charge_slots` controls how many charge
/// records get `Amount`/`Currency`/`Type` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub charge_slots: u32,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            charge_slots: DEFAULT_CHARGE_SLOTS,
        }
    }
}

impl FieldCatalog {
    #[must_use]
    pub const fn with_charge_slots(charge_slots: u32) -> Self {
        Self { charge_slots }
    }

    /// All catalog fields in column order.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = Field::FIXED.to_vec();
        for index in 1..=self.charge_slots {
            fields.extend(
                ChargePart::ALL
                    .into_iter()
                    .map(|part| Field::charge(index, part)),
            );
        }
        fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        Field::FIXED.len() + 3 * self.charge_slots as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        match field.charge_index() {
            Some(index) => (1..=self.charge_slots).contains(&index),
            None => true,
        }
    }

    /// Resolve a field label against this catalog.
    pub fn resolve(&self, name: &str) -> Result<Field> {
        let field: Field = name.parse()?;
        if self.contains(field) {
            Ok(field)
        } else {
            Err(ModelError::UnknownField {
                name: name.trim().to_string(),
            })
        }
    }
}
