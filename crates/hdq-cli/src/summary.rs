use std::cmp::Ordering;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hdq_cli::types::CleanResult;
use hdq_model::{IssueSeverity, QualityScore, ValidationIssue};

pub fn print_summary(result: &CleanResult) {
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.quality_report {
        println!("Quality report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Records"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Score"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new("patients").fg(Color::Blue).add_attribute(Attribute::Bold),
        Cell::new(result.patient_count),
        count_cell(result.patient_report.error_count(), Color::Red),
        count_cell(result.patient_report.warning_count(), Color::Yellow),
        score_cell(&result.scores.patients),
    ]);
    table.add_row(vec![
        Cell::new("appointments").fg(Color::Blue).add_attribute(Attribute::Bold),
        Cell::new(result.appointment_count),
        count_cell(result.appointment_report.error_count(), Color::Red),
        count_cell(result.appointment_report.warning_count(), Color::Yellow),
        score_cell(&result.scores.appointments),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(result.patient_count + result.appointment_count).add_attribute(Attribute::Bold),
        count_cell(
            result.patient_report.error_count() + result.appointment_report.error_count(),
            Color::Red,
        )
        .add_attribute(Attribute::Bold),
        count_cell(
            result.patient_report.warning_count() + result.appointment_report.warning_count(),
            Color::Yellow,
        )
        .add_attribute(Attribute::Bold),
        score_cell(&result.scores.overall).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let normalization = &result.normalization;
    println!(
        "Dates: {} corrected order, {} inferred century, {} ambiguous, {} unparseable",
        normalization.format_swaps,
        normalization.year_inferences,
        normalization.ambiguous_dates,
        normalization.unparseable_dates,
    );
    println!(
        "Filled: {} ages, {} statuses, {} costs ({} -> {} empty fields)",
        normalization.ages_derived,
        normalization.statuses_defaulted,
        normalization.costs_filled,
        result.missing_before,
        result.missing_after,
    );
    print_issue_table(result);
}

fn print_issue_table(result: &CleanResult) {
    let mut issues: Vec<(&str, &ValidationIssue)> = Vec::new();
    issues.extend(
        result
            .patient_report
            .issues
            .iter()
            .map(|issue| ("patients", issue)),
    );
    issues.extend(
        result
            .appointment_report
            .issues
            .iter()
            .map(|issue| ("appointments", issue)),
    );
    if issues.is_empty() {
        return;
    }
    issues.sort_by(|a, b| {
        let severity = severity_rank(b.1.severity).cmp(&severity_rank(a.1.severity));
        if severity != Ordering::Equal {
            return severity;
        }
        let table = a.0.cmp(b.0);
        if table != Ordering::Equal {
            return table;
        }
        a.1.record_id.cmp(&b.1.record_id)
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Severity"),
        header_cell("Record"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Rows"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    for (source, issue) in issues {
        table.add_row(vec![
            Cell::new(source).fg(Color::Blue),
            severity_cell(issue.severity),
            Cell::new(issue.record_id.clone()),
            Cell::new(issue.field.clone().unwrap_or_else(|| "-".to_string())),
            Cell::new(format!("{:?}", issue.kind)),
            Cell::new(rows_label(&issue.rows)),
            Cell::new(issue.message.clone()),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn rows_label(rows: &[usize]) -> String {
    let labels: Vec<String> = rows.iter().map(|row| row.to_string()).collect();
    labels.join(", ")
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
        .set_width(100);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_rank(severity: IssueSeverity) -> u8 {
    match severity {
        IssueSeverity::Error => 2,
        IssueSeverity::Warning => 1,
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Error => Cell::new("ERROR").fg(Color::Red),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn score_cell(score: &QualityScore) -> Cell {
    let label = format!("{:.1}", score.composite);
    if score.composite >= 90.0 {
        Cell::new(label).fg(Color::Green)
    } else if score.composite >= 70.0 {
        Cell::new(label).fg(Color::Yellow)
    } else {
        Cell::new(label).fg(Color::Red)
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
