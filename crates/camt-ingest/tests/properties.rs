//! Property tests for record shape.

use proptest::prelude::*;

use camt_ingest::{CAMT054_NAMESPACE, CamtDocument, extract};
use camt_model::{Field, FieldSelection};

/// Entries, each a list of `NtryDtls` groups holding a number of `TxDtls`.
fn layouts() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..4, 0..3), 0..5)
}

fn selections() -> impl Strategy<Value = Vec<Field>> {
    prop::sample::subsequence(Field::FIXED.to_vec(), 1..=Field::FIXED.len())
}

fn render(layout: &[Vec<usize>]) -> String {
    let mut xml = format!(
        r#"<Document xmlns="{CAMT054_NAMESPACE}"><BkToCstmrDbtCdtNtfctn><Ntfctn>"#
    );
    for (entry, groups) in layout.iter().enumerate() {
        xml.push_str(&format!("<Ntry><BookgDt><Dt>2024-01-{:02}</Dt></BookgDt>", entry + 1));
        for transactions in groups {
            xml.push_str("<NtryDtls>");
            for tx in 0..*transactions {
                xml.push_str(&format!(r#"<TxDtls><Amt Ccy="CHF">{tx}.00</Amt></TxDtls>"#));
            }
            xml.push_str("</NtryDtls>");
        }
        xml.push_str("</Ntry>");
    }
    xml.push_str("</Ntfctn></BkToCstmrDbtCdtNtfctn></Document>");
    xml
}

proptest! {
    #[test]
    fn record_count_matches_transaction_details(
        layout in layouts(),
        fields in selections(),
    ) {
        let selection = FieldSelection::from_fields(fields.iter().copied()).unwrap();
        let document = CamtDocument::parse(render(&layout).as_bytes()).unwrap();
        let records = extract(&document, &selection);

        let expected: usize = layout.iter().flatten().sum();
        prop_assert_eq!(records.len(), expected);
    }

    #[test]
    fn every_record_has_exactly_the_selected_keys(
        layout in layouts(),
        fields in selections(),
    ) {
        let selection = FieldSelection::from_fields(fields.iter().copied()).unwrap();
        let document = CamtDocument::parse(render(&layout).as_bytes()).unwrap();

        for record in extract(&document, &selection) {
            let keys: Vec<Field> = record.fields().collect();
            prop_assert_eq!(&keys, &fields);
        }
    }
}
