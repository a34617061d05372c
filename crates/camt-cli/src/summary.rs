use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use camt_cli::pipeline::RunOutcome;

pub fn print_summary(outcome: &RunOutcome) {
    let consolidation = &outcome.consolidation;
    match (&outcome.written, outcome.dry_run) {
        (Some(path), _) => println!("Output: {}", path.display()),
        (None, true) => println!("Output: dry run, nothing written"),
        (None, false) => println!("Output: not written"),
    }

    let mut totals = Table::new();
    totals.set_header(vec![
        header_cell("Files scanned"),
        header_cell("Files with rows"),
        header_cell("Skipped"),
        header_cell("Rows"),
    ]);
    apply_summary_table_style(&mut totals);
    for index in 0..4 {
        align_column(&mut totals, index, CellAlignment::Right);
    }
    totals.add_row(vec![
        Cell::new(consolidation.files_scanned),
        Cell::new(consolidation.success_count).add_attribute(Attribute::Bold),
        count_cell(consolidation.file_issues.len(), Color::Yellow),
        Cell::new(consolidation.record_set.height()).add_attribute(Attribute::Bold),
    ]);
    println!("{totals}");

    let mut fields = Table::new();
    fields.set_header(vec![
        header_cell("Field"),
        header_cell("Populated"),
        header_cell("Empty"),
    ]);
    apply_summary_table_style(&mut fields);
    align_column(&mut fields, 1, CellAlignment::Right);
    align_column(&mut fields, 2, CellAlignment::Right);
    let failing = outcome.presence.failing_field;
    for count in &outcome.report.fields {
        let empty = outcome.report.row_count - count.populated;
        let field_cell = if Some(count.field) == failing {
            Cell::new(count.field).fg(Color::Red).add_attribute(Attribute::Bold)
        } else {
            Cell::new(count.field)
        };
        let populated_cell = if count.populated == 0 {
            Cell::new(count.populated).fg(Color::Red)
        } else {
            Cell::new(count.populated)
        };
        fields.add_row(vec![field_cell, populated_cell, dim_cell(empty)]);
    }
    println!("{fields}");

    print_issue_table(outcome);
}

fn print_issue_table(outcome: &RunOutcome) {
    let issues = &outcome.consolidation.file_issues;
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Skipped file"), header_cell("Reason")]);
    apply_table_style(&mut table);
    for issue in issues {
        let name = issue
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| issue.path.display().to_string());
        table.add_row(vec![
            Cell::new(name).fg(Color::Yellow),
            Cell::new(&issue.message),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
