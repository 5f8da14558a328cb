//! The cleaning pipeline with explicit stages.
//!
//! Stages run in order, each taking the previous stage's output:
//! 1. **Ingest**: read both CSV tables into raw and typed form
//! 2. **Normalize**: correct dates, clean fields, fill derivable gaps
//! 3. **Validate**: schema checks, date ranges, referential integrity
//! 4. **Score**: quality components and composites
//! 5. **Output**: cleaned CSVs and the JSON quality report

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::{debug, info, info_span, trace, warn};

use hdq_ingest::Dataset;
use hdq_model::{
    Appointment, CleaningOptions, CorrectionKind, Patient, TableSchema, appointments_schema,
    patients_schema,
};
use hdq_normalize::normalize_dataset;
use hdq_report::{
    CLEANED_APPOINTMENTS_FILE, CLEANED_PATIENTS_FILE, QUALITY_REPORT_FILE, QualityReport,
    TableSection, write_cleaned_appointments, write_cleaned_patients, write_quality_report,
};
use hdq_score::score_dataset;
use hdq_validate::{validate_date_ranges, validate_integrity, validate_schema};

use crate::logging::redact_value;
use crate::types::CleanResult;

/// Inputs of a cleaning run.
pub struct PipelineInput<'a> {
    pub data_dir: &'a Path,
    pub output_dir: &'a Path,
    pub options: &'a CleaningOptions,
    pub dry_run: bool,
    /// Reference date for age derivation, status defaulting and horizon
    /// checks. Injected so runs are reproducible in tests.
    pub today: NaiveDate,
}

impl<'a> PipelineInput<'a> {
    pub fn new(data_dir: &'a Path, output_dir: &'a Path, options: &'a CleaningOptions) -> Self {
        Self {
            data_dir,
            output_dir,
            options,
            dry_run: false,
            today: Local::now().date_naive(),
        }
    }
}

/// Runs the full pipeline. Configuration is validated up front; all
/// data problems after that point are findings, not failures.
pub fn run_pipeline(input: &PipelineInput<'_>) -> Result<CleanResult> {
    input.options.validate().context("configuration")?;

    // Stage 1: ingest
    let ingest_span = info_span!("ingest");
    let mut dataset = {
        let _guard = ingest_span.enter();
        let started = Instant::now();
        let dataset = Dataset::load(input.data_dir)?;
        info!(
            patients = dataset.patients.len(),
            appointments = dataset.appointments.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "ingest complete"
        );
        dataset
    };

    let missing_before = missing_fields(&dataset.patients, &dataset.appointments, false);

    // Stage 2: normalize
    let normalize_span = info_span!("normalize");
    let normalization = {
        let _guard = normalize_span.enter();
        let started = Instant::now();
        let summary = normalize_dataset(
            &mut dataset.patients,
            &mut dataset.appointments,
            input.options,
            input.today,
        );
        for patient in &dataset.patients {
            if let Some(correction) = &patient.birth_date_correction
                && correction.kind == CorrectionKind::Unparseable
            {
                trace!(
                    patient_id = %patient.patient_id,
                    value = redact_value(&correction.original),
                    "unparseable birth date"
                );
            }
        }
        if summary.low_confidence_dates > 0 {
            warn!(
                count = summary.low_confidence_dates,
                "ambiguous dates resolved below the majority threshold"
            );
        }
        info!(
            format_swaps = summary.format_swaps,
            year_inferences = summary.year_inferences,
            ambiguous = summary.ambiguous_dates,
            unparseable = summary.unparseable_dates,
            duration_ms = started.elapsed().as_millis() as u64,
            "normalize complete"
        );
        summary
    };

    let missing_after = missing_fields(&dataset.patients, &dataset.appointments, true);
    debug!(missing_before, missing_after, "missing field counts");

    // Stage 3: validate
    let validate_span = info_span!("validate");
    let (patient_report, appointment_report) = {
        let _guard = validate_span.enter();
        let started = Instant::now();
        let mut patient_report = validate_schema(
            &dataset.patients_table,
            &table_schema(patients_schema(), input.options.required_fields.get("patients")),
        );
        let mut appointment_report = validate_schema(
            &dataset.appointments_table,
            &table_schema(
                appointments_schema(),
                input.options.required_fields.get("appointments"),
            ),
        );
        let (patient_dates, appointment_dates) = validate_date_ranges(
            &dataset.patients,
            &dataset.appointments,
            input.today,
            input.options.future_horizon_days,
        );
        patient_report.issues.extend(patient_dates);
        appointment_report.issues.extend(appointment_dates);
        let integrity = validate_integrity(&dataset.patients, &mut dataset.appointments);
        patient_report.issues.extend(integrity.patient_issues);
        appointment_report.issues.extend(integrity.appointment_issues);
        info!(
            patient_errors = patient_report.error_count(),
            patient_warnings = patient_report.warning_count(),
            appointment_errors = appointment_report.error_count(),
            appointment_warnings = appointment_report.warning_count(),
            orphans = integrity.orphan_count,
            duration_ms = started.elapsed().as_millis() as u64,
            "validate complete"
        );
        (patient_report, appointment_report)
    };

    // Stage 4: score
    let score_span = info_span!("score");
    let scores = {
        let _guard = score_span.enter();
        let scores = score_dataset(
            &dataset.patients,
            &dataset.appointments,
            &patient_report,
            &appointment_report,
            &input.options.weights,
        );
        info!(overall = scores.overall.composite, "score complete");
        scores
    };

    let has_errors = patient_report.has_errors() || appointment_report.has_errors();

    // Stage 5: output
    let mut result = CleanResult {
        output_dir: input.output_dir.to_path_buf(),
        patient_count: dataset.patients.len(),
        appointment_count: dataset.appointments.len(),
        missing_before,
        missing_after,
        normalization,
        patient_report,
        appointment_report,
        scores,
        cleaned_patients: None,
        cleaned_appointments: None,
        quality_report: None,
        has_errors,
    };
    if input.dry_run {
        info!("dry run, skipping output");
        return Ok(result);
    }

    let output_span = info_span!("output");
    {
        let _guard = output_span.enter();
        let started = Instant::now();
        std::fs::create_dir_all(input.output_dir)
            .with_context(|| format!("create {}", input.output_dir.display()))?;
        let patients_path = input.output_dir.join(CLEANED_PATIENTS_FILE);
        write_cleaned_patients(&patients_path, &dataset.patients)?;
        let appointments_path = input.output_dir.join(CLEANED_APPOINTMENTS_FILE);
        write_cleaned_appointments(&appointments_path, &dataset.appointments)?;
        let report_path = input.output_dir.join(QUALITY_REPORT_FILE);
        let report = QualityReport::new(
            result.normalization,
            TableSection::new(result.patient_count, result.patient_report.clone()),
            TableSection::new(result.appointment_count, result.appointment_report.clone()),
            result.scores.clone(),
        );
        write_quality_report(&report_path, &report)?;
        info!(
            output_dir = %input.output_dir.display(),
            duration_ms = started.elapsed().as_millis() as u64,
            "output complete"
        );
        result.cleaned_patients = Some(patients_path);
        result.cleaned_appointments = Some(appointments_path);
        result.quality_report = Some(report_path);
    }
    Ok(result)
}

fn table_schema(schema: TableSchema, required: Option<&BTreeSet<String>>) -> TableSchema {
    match required {
        Some(required) => schema.with_required(required),
        None => schema,
    }
}

/// Counts empty fields across both tables. Before normalization the raw
/// date text stands in for the not-yet-parsed date.
fn missing_fields(patients: &[Patient], appointments: &[Appointment], normalized: bool) -> usize {
    let mut missing = 0usize;
    for patient in patients {
        let date_present = if normalized {
            patient.birth_date.is_some()
        } else {
            patient.birth_date_raw.is_some()
        };
        missing += [
            patient.name.is_none(),
            !date_present,
            patient.age.is_none(),
            patient.sex.is_none(),
            patient.email.is_none(),
            patient.phone.is_none(),
            patient.city.is_none(),
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count();
    }
    for appointment in appointments {
        let date_present = if normalized {
            appointment.date.is_some()
        } else {
            appointment.date_raw.is_some()
        };
        missing += [
            !date_present,
            appointment.specialty.is_none(),
            appointment.physician.is_none(),
            appointment.cost.is_none(),
            appointment.status.is_none(),
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count();
    }
    missing
}
