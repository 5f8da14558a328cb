//! Output generation for the cleaning pipeline: cleaned CSVs with the
//! correction audit columns, and the versioned JSON quality report.

pub mod csv_out;
pub mod quality_json;

pub use csv_out::{
    CLEANED_APPOINTMENTS_FILE, CLEANED_PATIENTS_FILE, write_cleaned_appointments,
    write_cleaned_patients,
};
pub use quality_json::{
    QUALITY_REPORT_FILE, QUALITY_REPORT_VERSION, QualityReport, TableSection,
    write_quality_report,
};
