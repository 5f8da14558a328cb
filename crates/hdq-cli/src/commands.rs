use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, bail};
use comfy_table::Table;
use tracing::info_span;

use hdq_model::{CleaningOptions, FieldKind, QualityWeights, TableSchema, appointments_schema, patients_schema};

use crate::cli::CleanArgs;
use crate::summary::apply_table_style;
use hdq_cli::pipeline::{PipelineInput, run_pipeline};
use hdq_cli::types::CleanResult;

pub fn run_clean(args: &CleanArgs) -> Result<CleanResult> {
    let span = info_span!("clean", data_dir = %args.data_dir.display());
    let _guard = span.enter();
    let options = CleaningOptions {
        majority_threshold: args.majority_threshold,
        two_digit_year_pivot: args.year_pivot,
        future_horizon_days: args.future_horizon_days,
        weights: QualityWeights::default(),
        required_fields: parse_required_fields(&args.require)?,
    };
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.data_dir.join("output"));
    let mut input = PipelineInput::new(&args.data_dir, &output_dir, &options);
    input.dry_run = args.dry_run;
    run_pipeline(&input)
}

fn parse_required_fields(entries: &[String]) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let mut required: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in entries {
        let Some((table, field)) = entry.split_once('.') else {
            bail!("--require expects TABLE.FIELD, got {entry}");
        };
        required
            .entry(table.to_string())
            .or_default()
            .insert(field.to_string());
    }
    Ok(required)
}

pub fn run_schemas() -> Result<()> {
    for schema in [patients_schema(), appointments_schema()] {
        print_schema(&schema);
    }
    Ok(())
}

fn print_schema(schema: &TableSchema) {
    println!("{}:", schema.table);
    let mut table = Table::new();
    table.set_header(vec!["Field", "Type", "Required", "Constraints"]);
    apply_table_style(&mut table);
    for field in &schema.fields {
        let (kind, constraints) = match &field.kind {
            FieldKind::Text => ("text".to_string(), "-".to_string()),
            FieldKind::Integer => ("integer".to_string(), range_label(field.min, field.max)),
            FieldKind::Float => ("number".to_string(), range_label(field.min, field.max)),
            FieldKind::Date => ("date".to_string(), "ISO 8601 after correction".to_string()),
            FieldKind::Categorical(values) => ("categorical".to_string(), values.join(", ")),
        };
        table.add_row(vec![
            field.name.clone(),
            kind,
            if field.required { "yes" } else { "no" }.to_string(),
            constraints,
        ]);
    }
    println!("{table}");
    println!();
}

fn range_label(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("[{min}, {max}]"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("<= {max}"),
        (None, None) => "-".to_string(),
    }
}
