//! Files written by tests.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

/// Per-process path under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rdf_coordination_{}_{name}", std::process::id()))
}

/// Write one worksheet per entry: header row, unit row, then (r, g) rows.
pub fn write_workbook(path: &Path, sheets: &[(&str, &[(f64, f64)])]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        sheet.write_string(0, 0, "r").unwrap();
        sheet.write_string(0, 1, "g(r)").unwrap();
        sheet.write_string(1, 0, "Angstrom").unwrap();
        sheet.write_string(1, 1, "-").unwrap();
        for (i, (r, g)) in rows.iter().enumerate() {
            let row = i as u32 + 2;
            sheet.write_number(row, 0, *r).unwrap();
            sheet.write_number(row, 1, *g).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

/// g(r) = 1 sampled at r = 0.0, 0.1, …, 3.0.
pub fn flat_rdf_rows() -> Vec<(f64, f64)> {
    (0..=30).map(|i| (i as f64 / 10.0, 1.0)).collect()
}
