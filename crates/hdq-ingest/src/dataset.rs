use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use hdq_model::{Appointment, Patient};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::records::{appointments_from_table, patients_from_table};

pub const PATIENTS_FILE: &str = "patients.csv";
pub const APPOINTMENTS_FILE: &str = "appointments.csv";

/// Both source tables of a dataset, raw and typed. Raw tables are kept
/// alongside the records because schema validation reports against the
/// original cell text.
#[derive(Debug)]
pub struct Dataset {
    pub patients_table: CsvTable,
    pub appointments_table: CsvTable,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
}

fn locate(dir: &Path, file: &str) -> Result<PathBuf> {
    let path = dir.join(file);
    if !path.is_file() {
        bail!("expected {} in {}", file, dir.display());
    }
    Ok(path)
}

impl Dataset {
    /// Loads `patients.csv` and `appointments.csv` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!("data directory not found: {}", dir.display());
        }
        let patients_path = locate(dir, PATIENTS_FILE)?;
        let appointments_path = locate(dir, APPOINTMENTS_FILE)?;
        let patients_table = read_csv_table(&patients_path)
            .with_context(|| format!("load {}", patients_path.display()))?;
        let appointments_table = read_csv_table(&appointments_path)
            .with_context(|| format!("load {}", appointments_path.display()))?;
        let patients = patients_from_table(&patients_table);
        let appointments = appointments_from_table(&appointments_table);
        debug!(
            patients = patients.len(),
            appointments = appointments.len(),
            "dataset loaded"
        );
        Ok(Self {
            patients_table,
            appointments_table,
            patients,
            appointments,
        })
    }
}
