use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use calamine::{Data, Range, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::RdfTable;
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Where the two numeric columns live inside the file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Worksheet to read; `None` picks the first sheet.
    pub sheet: Option<String>,
    /// Rows discarded after the header row (spreadsheet and CSV only).
    pub skip_rows: usize,
    /// Zero-based column holding r.
    pub r_column: usize,
    /// Zero-based column holding g(r).
    pub g_column: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            skip_rows: 1,
            r_column: 0,
            g_column: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an (r, g(r)) table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – header row, unit row(s), data
/// * `.csv`     – same layout as a worksheet
/// * `.json`    – `{ "r": [...], "g": [...] }` or `[{ "r": .., "g": .. }, ...]`
/// * `.parquet` – numeric columns selected by position
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<RdfTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_spreadsheet(path, options),
        "csv" => load_csv(path, options),
        "json" => load_json(path, options),
        "parquet" | "pq" => load_parquet(path, options),
        other => bail!(AnalysisError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path, options: &LoadOptions) -> Result<RdfTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let available = workbook.sheet_names();

    let sheet = match &options.sheet {
        Some(name) => {
            if !available.iter().any(|s| s == name) {
                bail!(AnalysisError::SheetNotFound {
                    sheet: name.clone(),
                    available,
                });
            }
            name.clone()
        }
        None => available.first().cloned().ok_or(AnalysisError::EmptySheet)?,
    };
    log::debug!("Reading sheet '{sheet}' of {}", path.display());

    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading sheet '{sheet}'"))?;
    Ok(table_from_range(&range, options)?)
}

/// Convert a worksheet range into a table.
///
/// The first used row is the header; `skip_rows` further rows are dropped.
/// Error rows are 1-based sheet rows, error columns zero-based.
pub fn table_from_range(range: &Range<Data>, options: &LoadOptions) -> Result<RdfTable, AnalysisError> {
    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return Ok(RdfTable::default());
    };

    let mut table = RdfTable::default();
    let data_start = first_row as usize + 1 + options.skip_rows;
    for row in data_start..=last_row as usize {
        let r = cell_to_f64(range, row, options.r_column)?;
        let g = cell_to_f64(range, row, options.g_column)?;
        table.push(r, g);
    }
    Ok(table)
}

fn cell_to_f64(range: &Range<Data>, row: usize, column: usize) -> Result<f64, AnalysisError> {
    let sheet_row = row + 1;
    let non_numeric = |value: String| AnalysisError::NonNumericCell {
        row: sheet_row,
        column,
        value,
    };

    match range.get_value((row as u32, column as u32)) {
        Some(Data::Float(v)) => Ok(*v),
        Some(Data::Int(i)) => Ok(*i as f64),
        Some(Data::String(s)) => parse_number(s).ok_or_else(|| non_numeric(s.clone())),
        Some(Data::Empty) => Err(non_numeric(String::new())),
        Some(other) => Err(non_numeric(other.to_string())),
        None => Err(AnalysisError::MissingColumn {
            column,
            row: sheet_row,
        }),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

fn warn_sheet_ignored(path: &Path, options: &LoadOptions) {
    if let Some(sheet) = &options.sheet {
        log::warn!("Ignoring sheet '{sheet}': {} is not a workbook", path.display());
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout mirrors a worksheet: header row, `skip_rows` unit rows, data.
fn load_csv(path: &Path, options: &LoadOptions) -> Result<RdfTable> {
    warn_sheet_ignored(path, options);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let mut table = RdfTable::default();
    for (i, result) in reader.records().enumerate().skip(options.skip_rows) {
        // Header is row 1.
        let sheet_row = i + 2;
        let record = result.with_context(|| format!("CSV row {sheet_row}"))?;

        let field = |column: usize| -> Result<f64, AnalysisError> {
            let text = record
                .get(column)
                .ok_or(AnalysisError::MissingColumn {
                    column,
                    row: sheet_row,
                })?;
            parse_number(text).ok_or_else(|| AnalysisError::NonNumericCell {
                row: sheet_row,
                column,
                value: text.to_string(),
            })
        };

        table.push(field(options.r_column)?, field(options.g_column)?);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepted shapes:
///
/// ```json
/// { "r": [0.0, 0.1, ...], "g": [0.0, 0.0, ...] }
/// ```
///
/// ```json
/// [ { "r": 0.0, "g": 0.0 }, { "r": 0.1, "g": 0.0 }, ... ]
/// ```
///
/// Error rows are 1-based positions in the array.
fn load_json(path: &Path, options: &LoadOptions) -> Result<RdfTable> {
    warn_sheet_ignored(path, options);
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    match &root {
        JsonValue::Object(obj) => {
            let r = json_column(obj.get("r"), 0, "r")?;
            let g = json_column(obj.get("g"), 1, "g")?;
            let (n_r, n_g) = (r.len(), g.len());
            RdfTable::new(r, g).with_context(|| format!("r has {n_r} values but g has {n_g}"))
        }
        JsonValue::Array(records) => {
            let mut table = RdfTable::default();
            for (i, rec) in records.iter().enumerate() {
                let obj = rec
                    .as_object()
                    .with_context(|| format!("Record {} is not a JSON object", i + 1))?;
                let r = json_number(obj.get("r"), i + 1, 0)?;
                let g = json_number(obj.get("g"), i + 1, 1)?;
                table.push(r, g);
            }
            Ok(table)
        }
        _ => bail!("Expected a JSON object of columns or an array of records"),
    }
}

fn json_column(val: Option<&JsonValue>, column: usize, name: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("missing or invalid '{name}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(i, v)| json_number(Some(v), i + 1, column))
        .collect()
}

fn json_number(val: Option<&JsonValue>, row: usize, column: usize) -> Result<f64> {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64().context("number out of range"),
        Some(JsonValue::String(s)) => parse_number(s).ok_or_else(|| {
            AnalysisError::NonNumericCell {
                row,
                column,
                value: s.clone(),
            }
            .into()
        }),
        Some(other) => bail!(AnalysisError::NonNumericCell {
            row,
            column,
            value: other.to_string(),
        }),
        None => bail!(AnalysisError::MissingColumn { column, row }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load r and g(r) from two numeric Parquet columns chosen by position.
///
/// Float64, Float32, Int64 and Int32 columns are accepted; nulls are errors.
/// Error rows are 1-based across all record batches.
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<RdfTable> {
    warn_sheet_ignored(path, options);
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut table = RdfTable::default();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let n_cols = batch.num_columns();
        for column in [options.r_column, options.g_column] {
            if column >= n_cols {
                bail!(AnalysisError::MissingColumn { column, row: offset + 1 });
            }
        }

        let r_col = batch.column(options.r_column);
        let g_col = batch.column(options.g_column);
        for row in 0..batch.num_rows() {
            let r = numeric_value(r_col, row, offset + row + 1, options.r_column)?;
            let g = numeric_value(g_col, row, offset + row + 1, options.g_column)?;
            table.push(r, g);
        }
        offset += batch.num_rows();
    }

    Ok(table)
}

/// Read one numeric cell from an Arrow column.
fn numeric_value(col: &Arc<dyn Array>, row: usize, file_row: usize, column: usize) -> Result<f64> {
    let non_numeric = |value: String| AnalysisError::NonNumericCell {
        row: file_row,
        column,
        value,
    };
    if col.is_null(row) {
        bail!(non_numeric("null".to_string()));
    }

    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        other => bail!(non_numeric(format!("{other:?}"))),
    };
    value.with_context(|| format!("column {column} does not match its declared type"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::data::fixtures::{flat_rdf_rows, temp_path, write_workbook};

    /// Header row, unit row, then `rows` of data in columns A and B.
    fn sheet(rows: &[(Data, Data)]) -> Range<Data> {
        let height = rows.len() as u32 + 2;
        let mut range = Range::new((0, 0), (height - 1, 1));
        range.set_value((0, 0), Data::String("r".into()));
        range.set_value((0, 1), Data::String("g(r)".into()));
        range.set_value((1, 0), Data::String("Å".into()));
        range.set_value((1, 1), Data::String("-".into()));
        for (i, (r, g)) in rows.iter().enumerate() {
            range.set_value((i as u32 + 2, 0), r.clone());
            range.set_value((i as u32 + 2, 1), g.clone());
        }
        range
    }

    fn analysis_error(err: &anyhow::Error) -> &AnalysisError {
        err.downcast_ref::<AnalysisError>()
            .unwrap_or_else(|| panic!("expected AnalysisError, got {err:#}"))
    }

    #[test]
    fn range_skips_header_and_unit_row() {
        let range = sheet(&[
            (Data::Float(0.5), Data::Float(0.0)),
            (Data::Int(1), Data::Float(1.25)),
            (Data::String(" 1.5 ".into()), Data::String("2".into())),
        ]);
        let table = table_from_range(&range, &LoadOptions::default()).unwrap();
        assert_eq!(table.r, vec![0.5, 1.0, 1.5]);
        assert_eq!(table.g, vec![0.0, 1.25, 2.0]);
    }

    #[test]
    fn range_with_text_in_data_region_fails() {
        let range = sheet(&[
            (Data::Float(0.5), Data::Float(0.0)),
            (Data::Float(1.0), Data::String("n/a".into())),
        ]);
        let err = table_from_range(&range, &LoadOptions::default()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NonNumericCell {
                row: 4,
                column: 1,
                value: "n/a".into()
            }
        );
    }

    #[test]
    fn range_with_empty_cell_fails() {
        let range = sheet(&[
            (Data::Float(0.5), Data::Float(0.0)),
            (Data::Empty, Data::Float(1.0)),
        ]);
        let err = table_from_range(&range, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::NonNumericCell { row: 4, column: 0, .. }));
    }

    #[test]
    fn range_with_column_outside_sheet_fails() {
        let range = sheet(&[(Data::Float(0.5), Data::Float(0.0))]);
        let options = LoadOptions {
            g_column: 3,
            ..LoadOptions::default()
        };
        let err = table_from_range(&range, &options).unwrap_err();
        assert_eq!(err, AnalysisError::MissingColumn { column: 3, row: 3 });
    }

    #[test]
    fn empty_range_gives_empty_table() {
        let range: Range<Data> = Range::empty();
        assert!(table_from_range(&range, &LoadOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn csv_with_unit_row() {
        let path = temp_path("unit_row.csv");
        std::fs::write(&path, "r,g(r)\nA,-\n0.0,0.0\n0.5,1.5\n1.0,1.0\n").unwrap();
        let table = load_file(&path, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table.r, vec![0.0, 0.5, 1.0]);
        assert_eq!(table.g, vec![0.0, 1.5, 1.0]);
    }

    #[test]
    fn csv_non_numeric_cell_fails() {
        let path = temp_path("bad_cell.csv");
        std::fs::write(&path, "r,g(r)\nA,-\n0.0,0.0\n0.5,oops\n").unwrap();
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(
            analysis_error(&err),
            &AnalysisError::NonNumericCell {
                row: 4,
                column: 1,
                value: "oops".into()
            }
        );
    }

    #[test]
    fn json_columns_and_records() {
        let cols = temp_path("columns.json");
        std::fs::write(&cols, r#"{ "r": [0.0, 1.0], "g": [0.5, "1.5"] }"#).unwrap();
        let recs = temp_path("records.json");
        std::fs::write(&recs, r#"[{ "r": 0.0, "g": 0.5 }, { "r": 1, "g": 1.5 }]"#).unwrap();

        let from_cols = load_file(&cols, &LoadOptions::default()).unwrap();
        let from_recs = load_file(&recs, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&cols).ok();
        std::fs::remove_file(&recs).ok();

        assert_eq!(from_cols, from_recs);
        assert_eq!(from_cols.g, vec![0.5, 1.5]);
    }

    #[test]
    fn json_columns_of_unequal_length_fail() {
        let path = temp_path("unequal.json");
        std::fs::write(&path, r#"{ "r": [0.0, 1.0, 2.0], "g": [0.5, 1.5] }"#).unwrap();
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.to_string(), "r has 3 values but g has 2");
    }

    #[test]
    fn json_null_value_fails() {
        let path = temp_path("null.json");
        std::fs::write(&path, r#"{ "r": [0.0, 1.0], "g": [0.5, null] }"#).unwrap();
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            analysis_error(&err),
            AnalysisError::NonNumericCell { row: 2, column: 1, .. }
        ));
    }

    #[test]
    fn parquet_float_columns() {
        let path = temp_path("rdf.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("r", DataType::Float64, false),
            Field::new("g", DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![0.0, 0.5, 1.0])),
                Arc::new(Float32Array::from(vec![0.0f32, 2.0, 1.0])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table.r, vec![0.0, 0.5, 1.0]);
        assert_eq!(table.g, vec![0.0, 2.0, 1.0]);
    }

    #[test]
    fn parquet_null_reports_one_based_row() {
        let path = temp_path("null.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("r", DataType::Float64, false),
            Field::new("g", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![0.0, 0.5, 1.0])),
                Arc::new(Float64Array::from(vec![Some(0.0), Some(1.0), None])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            analysis_error(&err),
            AnalysisError::NonNumericCell { row: 3, column: 1, .. }
        ));
    }

    #[test]
    fn workbook_named_sheet() {
        let path = temp_path("named_sheet.xlsx");
        let rows = flat_rdf_rows();
        write_workbook(&path, &[("S0_CASSCF", &rows[..])]);

        let options = LoadOptions {
            sheet: Some("S0_CASSCF".into()),
            ..LoadOptions::default()
        };
        let table = load_file(&path, &options).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), rows.len());
        assert_eq!(table.r.first(), Some(&0.0));
        assert_eq!(table.r.last(), Some(&3.0));
        assert!(table.g.iter().all(|&g| g == 1.0));
    }

    #[test]
    fn workbook_defaults_to_first_sheet() {
        let path = temp_path("first_sheet.xlsx");
        let first = [(1.0, 0.5), (2.0, 1.5)];
        let second = [(1.0, 9.0), (2.0, 9.0), (3.0, 9.0)];
        write_workbook(&path, &[("S0_CASSCF", &first[..]), ("T1", &second[..])]);

        let table = load_file(&path, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.r, vec![1.0, 2.0]);
        assert_eq!(table.g, vec![0.5, 1.5]);
    }

    #[test]
    fn workbook_missing_sheet_lists_available() {
        let path = temp_path("missing_sheet.xlsx");
        write_workbook(&path, &[("S0_CASSCF", &flat_rdf_rows()[..])]);

        let options = LoadOptions {
            sheet: Some("S1".into()),
            ..LoadOptions::default()
        };
        let err = load_file(&path, &options).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            analysis_error(&err),
            &AnalysisError::SheetNotFound {
                sheet: "S1".into(),
                available: vec!["S0_CASSCF".into()],
            }
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = temp_path("does_not_exist.xlsx");
        assert!(load_file(&path, &LoadOptions::default()).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("rdf.dat"), &LoadOptions::default()).unwrap_err();
        assert_eq!(
            analysis_error(&err),
            &AnalysisError::UnsupportedExtension("dat".into())
        );
    }
}
