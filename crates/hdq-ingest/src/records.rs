use hdq_model::{Appointment, Patient};

use crate::csv_table::{CsvTable, present};

fn parse_number(value: &str) -> Option<f64> {
    // Tolerates currency-style noise ("$420.50", "1,5"); hard failures are
    // left for the schema validator to report against the raw cell.
    let cleaned: String = value
        .trim()
        .trim_start_matches('$')
        .replace(',', ".")
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Builds typed patient records from a raw table. One record per row,
/// in row order; no row is ever dropped here.
pub fn patients_from_table(table: &CsvTable) -> Vec<Patient> {
    table
        .rows
        .iter()
        .map(|row| Patient {
            patient_id: table.cell(row, "patient_id").trim().to_string(),
            name: present(table.cell(row, "name")),
            birth_date_raw: present(table.cell(row, "birth_date")),
            birth_date: None,
            birth_date_correction: None,
            age: present(table.cell(row, "age")).as_deref().and_then(parse_number),
            sex: present(table.cell(row, "sex")),
            email: present(table.cell(row, "email")),
            phone: present(table.cell(row, "phone")),
            city: present(table.cell(row, "city")),
        })
        .collect()
}

/// Builds typed appointment records from a raw table.
pub fn appointments_from_table(table: &CsvTable) -> Vec<Appointment> {
    table
        .rows
        .iter()
        .map(|row| Appointment {
            appointment_id: table.cell(row, "appointment_id").trim().to_string(),
            patient_id: table.cell(row, "patient_id").trim().to_string(),
            date_raw: present(table.cell(row, "date")),
            date: None,
            date_correction: None,
            specialty: present(table.cell(row, "specialty")),
            physician: present(table.cell(row, "physician")),
            cost: present(table.cell(row, "cost")).as_deref().and_then(parse_number),
            status: present(table.cell(row, "status")),
            patient_ref_valid: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn builds_patients_with_missing_fields() {
        let table = table(
            &["patient_id", "name", "birth_date", "age", "sex"],
            &[&["P001", "Ana Garcia", "1985-03-12", "39", "F"], &["P002", "N/A", "", "abc", ""]],
        );
        let patients = patients_from_table(&table);
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].age, Some(39.0));
        assert!(patients[1].name.is_none());
        assert!(patients[1].birth_date_raw.is_none());
        assert!(patients[1].age.is_none());
    }

    #[test]
    fn parses_currency_style_cost() {
        let table = table(
            &["appointment_id", "patient_id", "cost"],
            &[&["A001", "P001", "$420.50"], &["A002", "P001", "free"]],
        );
        let appointments = appointments_from_table(&table);
        assert_eq!(appointments[0].cost, Some(420.50));
        assert!(appointments[1].cost.is_none());
        assert!(appointments[0].patient_ref_valid);
    }
}
