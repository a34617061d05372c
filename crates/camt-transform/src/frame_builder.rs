//! Assembly of record sets from extracted records.

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use camt_model::{FieldSelection, Record};

use crate::error::Result;
use crate::frame::RecordSet;

/// Build a [`RecordSet`] with one column per selected field, in catalog
/// order, and one row per record.
///
/// Fields missing from a record are null in its row.
pub fn build_record_set(selection: &FieldSelection, records: &[Record]) -> Result<RecordSet> {
    let mut columns: Vec<Column> = Vec::with_capacity(selection.len());
    for field in selection {
        let mut values: Vec<Option<String>> = Vec::with_capacity(records.len());
        for record in records {
            values.push(record.get(field).map(str::to_string));
        }
        let label = field.label();
        columns.push(Series::new((&*label).into(), values).into());
    }
    let data = DataFrame::new(columns)?;
    Ok(RecordSet::new(selection.iter().collect(), data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camt_model::Field;

    fn record(selection: &FieldSelection, values: &[(Field, Option<&str>)]) -> Record {
        let mut record = Record::blank(selection);
        for (field, value) in values {
            record.set(*field, value.map(str::to_string));
        }
        record
    }

    #[test]
    fn columns_follow_catalog_order() {
        let selection =
            FieldSelection::from_fields([Field::DebtorName, Field::BookingDate]).unwrap();
        let set = build_record_set(&selection, &[]).unwrap();

        assert_eq!(set.column_labels(), vec!["Booking Date", "Debtor Name"]);
        assert_eq!(set.height(), 0);
        assert_eq!(set.width(), 2);
    }

    #[test]
    fn nulls_are_preserved() {
        let selection =
            FieldSelection::from_fields([Field::BookingDate, Field::ValueDate]).unwrap();
        let records = vec![
            record(
                &selection,
                &[(Field::BookingDate, Some("2024-05-02")), (Field::ValueDate, None)],
            ),
            record(&selection, &[(Field::BookingDate, Some("2024-05-06"))]),
        ];
        let set = build_record_set(&selection, &records).unwrap();

        assert_eq!(set.height(), 2);
        assert_eq!(set.value(1, Field::BookingDate), Some("2024-05-06"));
        assert_eq!(set.value(0, Field::ValueDate), None);
        assert_eq!(set.non_null_count(Field::BookingDate), 2);
        assert_eq!(set.non_null_count(Field::ValueDate), 0);
        assert_eq!(set.value(5, Field::BookingDate), None);
        assert_eq!(set.value(0, Field::DebtorName), None);
    }
}
