//! Flattening of notification entries into records.
//!
//! Each catalog field maps to a lookup scope and a pure function from the
//! scoped element to an optional value. Only the functions of selected fields
//! are evaluated, so absent optional structures behind unselected fields are
//! never touched.
//!
//! Traversal is `Ntry` → `NtryDtls` → `TxDtls`, each in document order, and
//! yields one record per `TxDtls`. An entry without transaction details yields
//! nothing, its dates included.

use std::path::Path;

use tracing::debug;

use camt_model::{ChargePart, Field, FieldSelection, Record};

use crate::document::{CamtDocument, Element};
use crate::error::Result;

/// Extracts a value from the element a field is scoped to.
pub type Lookup = fn(&Element) -> Option<String>;

/// The element a field's lookup is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The enclosing `Ntry`; the value is shared by all of its records.
    Entry,
    /// The `TxDtls` producing the record.
    Transaction,
    /// The charge record (`Chrgs/Rcrd`) at a 1-based index.
    Charge(u32),
}

const FIELD_LOOKUPS: &[(Field, Scope, Lookup)] = &[
    (Field::BookingDate, Scope::Entry, booking_date),
    (Field::ValueDate, Scope::Entry, value_date),
    (Field::TransactionAmount, Scope::Transaction, transaction_amount),
    (Field::TransactionCurrency, Scope::Transaction, transaction_currency),
    (Field::DebtorName, Scope::Transaction, debtor_name),
    (Field::DebtorAddressLine1, Scope::Transaction, debtor_address_line_1),
    (Field::DebtorAddressLine2, Scope::Transaction, debtor_address_line_2),
    (Field::DebtorIban, Scope::Transaction, debtor_iban),
    (Field::UltimateDebtorName, Scope::Transaction, ultimate_debtor_name),
    (Field::AdditionalRemittanceInfo3, Scope::Transaction, additional_remittance_info_3),
    (Field::CreditorReferenceType, Scope::Transaction, creditor_reference_type),
    (Field::CreditorReference, Scope::Transaction, creditor_reference),
    (Field::TotalChargesAmount, Scope::Transaction, total_charges_amount),
];

/// Scope and lookup function of a field.
#[must_use]
pub fn resolver(field: Field) -> Option<(Scope, Lookup)> {
    if let Field::Charge { index, part } = field {
        let lookup: Lookup = match part {
            ChargePart::Amount => charge_amount,
            ChargePart::Currency => charge_currency,
            ChargePart::Type => charge_type,
        };
        return Some((Scope::Charge(index), lookup));
    }
    FIELD_LOOKUPS
        .iter()
        .find(|(candidate, _, _)| *candidate == field)
        .map(|(_, scope, lookup)| (*scope, *lookup))
}

/// Extraction plan for one field selection, reusable across documents.
#[derive(Clone)]
pub struct EntryExtractor<'s> {
    selection: &'s FieldSelection,
    visit_charges: bool,
    entry_fields: Vec<(Field, Lookup)>,
    transaction_fields: Vec<(Field, Lookup)>,
    charge_fields: Vec<(Field, usize, Lookup)>,
}

impl<'s> EntryExtractor<'s> {
    #[must_use]
    pub fn new(selection: &'s FieldSelection) -> Self {
        let mut entry_fields = Vec::new();
        let mut transaction_fields = Vec::new();
        let mut charge_fields = Vec::new();
        for field in selection {
            let Some((scope, lookup)) = resolver(field) else {
                continue;
            };
            match scope {
                Scope::Entry => entry_fields.push((field, lookup)),
                Scope::Transaction => transaction_fields.push((field, lookup)),
                Scope::Charge(index) => {
                    if let Some(position) = (index as usize).checked_sub(1) {
                        charge_fields.push((field, position, lookup));
                    }
                }
            }
        }
        Self {
            selection,
            visit_charges: selection.wants_charges(),
            entry_fields,
            transaction_fields,
            charge_fields,
        }
    }

    /// One record per `TxDtls`, in traversal order.
    #[must_use]
    pub fn extract(&self, document: &CamtDocument) -> Vec<Record> {
        let mut records = Vec::new();
        let entries = document.entries();
        for entry in entries.iter().copied() {
            let shared: Vec<(Field, Option<String>)> = self
                .entry_fields
                .iter()
                .map(|(field, lookup)| (*field, lookup(entry)))
                .collect();
            for details in entry.find_all(&["NtryDtls"]) {
                for transaction in details.find_all(&["TxDtls"]) {
                    records.push(self.transaction_record(&shared, transaction));
                }
            }
        }
        debug!(
            entry_count = entries.len(),
            record_count = records.len(),
            "extracted notification entries"
        );
        records
    }

    fn transaction_record(
        &self,
        shared: &[(Field, Option<String>)],
        transaction: &Element,
    ) -> Record {
        let mut record = Record::blank(self.selection);
        for (field, value) in shared {
            record.set(*field, value.clone());
        }
        for (field, lookup) in &self.transaction_fields {
            record.set(*field, lookup(transaction));
        }
        if self.visit_charges
            && let Some(charges) = transaction.find(&["Chrgs"])
        {
            let charge_records = charges.find_all(&["Rcrd"]);
            for (field, position, lookup) in &self.charge_fields {
                if let Some(charge) = charge_records.get(*position).copied() {
                    record.set(*field, lookup(charge));
                }
            }
        }
        record
    }
}

/// Flatten one parsed document.
#[must_use]
pub fn extract(document: &CamtDocument, selection: &FieldSelection) -> Vec<Record> {
    EntryExtractor::new(selection).extract(document)
}

/// Read, parse and flatten one statement file.
pub fn extract_file(path: &Path, selection: &FieldSelection) -> Result<Vec<Record>> {
    let document = CamtDocument::from_path(path)?;
    Ok(extract(&document, selection))
}

// === Entry scope ===

fn booking_date(entry: &Element) -> Option<String> {
    entry.find_text(&["BookgDt", "Dt"])
}

fn value_date(entry: &Element) -> Option<String> {
    entry.find_text(&["ValDt", "Dt"])
}

// === Transaction scope ===

fn transaction_amount(tx: &Element) -> Option<String> {
    tx.find_text(&["Amt"])
}

fn transaction_currency(tx: &Element) -> Option<String> {
    currency_of(tx.find(&["Amt"])?)
}

fn debtor(tx: &Element) -> Option<&Element> {
    tx.find(&["RltdPties", "Dbtr"])
}

fn debtor_name(tx: &Element) -> Option<String> {
    debtor(tx)?.find_text(&["Nm"])
}

fn debtor_address_line(tx: &Element, position: usize) -> Option<String> {
    debtor(tx)?
        .find(&["PstlAdr"])?
        .find_positional("AdrLine", position)?
        .text()
        .map(str::to_string)
}

fn debtor_address_line_1(tx: &Element) -> Option<String> {
    debtor_address_line(tx, 1)
}

fn debtor_address_line_2(tx: &Element) -> Option<String> {
    debtor_address_line(tx, 2)
}

fn debtor_iban(tx: &Element) -> Option<String> {
    tx.find_text(&["RltdPties", "DbtrAcct", "Id", "IBAN"])
}

fn ultimate_debtor_name(tx: &Element) -> Option<String> {
    tx.find_text(&["RltdPties", "UltmtDbtr", "Nm"])
}

fn additional_remittance_info_3(tx: &Element) -> Option<String> {
    tx.find_all(&["RmtInf", "Strd", "AddtlRmtInf"])
        .get(2)?
        .text()
        .map(str::to_string)
}

fn creditor_reference_type(tx: &Element) -> Option<String> {
    tx.find_text(&["RmtInf", "Strd", "CdtrRefInf", "Tp", "CdOrPrtry", "Prtry"])
}

fn creditor_reference(tx: &Element) -> Option<String> {
    tx.find_text(&["RmtInf", "Strd", "CdtrRefInf", "Ref"])
}

fn total_charges_amount(tx: &Element) -> Option<String> {
    tx.find(&["Chrgs"])?.find_text(&["TtlChrgsAndTaxAmt"])
}

// === Charge record scope ===

fn charge_amount(charge: &Element) -> Option<String> {
    charge.find_text(&["Amt"])
}

fn charge_currency(charge: &Element) -> Option<String> {
    currency_of(charge.find(&["Amt"])?)
}

fn charge_type(charge: &Element) -> Option<String> {
    charge.find_text(&["Tp", "Prtry", "Id"])
}

fn currency_of(amount: &Element) -> Option<String> {
    amount.attr("Ccy").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camt_model::FieldCatalog;

    #[test]
    fn every_catalog_field_has_a_resolver() {
        for field in FieldCatalog::with_charge_slots(3).fields() {
            let (scope, _) = resolver(field).expect("catalog field resolves");
            match field {
                Field::BookingDate | Field::ValueDate => assert_eq!(scope, Scope::Entry),
                Field::Charge { index, .. } => assert_eq!(scope, Scope::Charge(index)),
                _ => assert_eq!(scope, Scope::Transaction),
            }
        }
    }

    #[test]
    fn plan_splits_fields_by_scope() {
        let selection = FieldSelection::from_fields([
            Field::ValueDate,
            Field::DebtorIban,
            Field::charge(2, ChargePart::Amount),
        ])
        .unwrap();
        let extractor = EntryExtractor::new(&selection);
        assert_eq!(extractor.entry_fields.len(), 1);
        assert_eq!(extractor.transaction_fields.len(), 1);
        assert_eq!(extractor.charge_fields.len(), 1);
        assert_eq!(extractor.charge_fields[0].1, 1);
    }
}
