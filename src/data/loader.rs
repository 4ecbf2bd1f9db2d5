use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::{DataType, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{RemoteRatio, SalaryDataset, SalaryRecord};

const JOB_TITLE: &[&str] = &["job_title"];
const EXPERIENCE_LEVEL: &[&str] = &["experience_level"];
const YEAR: &[&str] = &["year", "work_year"];
const SALARY_IN_USD: &[&str] = &["salary_in_usd"];
const REMOTE_RATIO: &[&str] = &["remote_ratio"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the salary table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the five required columns
/// * `.json`    – `[{ "job_title": ..., "year": ..., ... }, ...]`
/// * `.parquet` – one Arrow column per field
///
/// Any missing column, unparsable cell or empty table is an error.
pub fn load_file(path: &Path) -> Result<SalaryDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_csv(file)?
        }
        "json" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_json(file)?
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = SalaryDataset::from_records(records)
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "Loaded {} salary records from {}; top titles {:?}",
        dataset.len(),
        path.display(),
        dataset.top_titles().titles()
    );
    Ok(dataset)
}

/// Validate one row's raw values and build a record.
fn build_record(
    row: usize,
    job_title: &str,
    experience_level: &str,
    year: i64,
    salary_in_usd: f64,
    remote_ratio: i64,
) -> Result<SalaryRecord> {
    let job_title = job_title.trim();
    let experience_level = experience_level.trim();
    if job_title.is_empty() {
        bail!("Row {row}: empty job_title");
    }
    if experience_level.is_empty() {
        bail!("Row {row}: empty experience_level");
    }
    let year = i32::try_from(year).with_context(|| format!("Row {row}: year {year} out of range"))?;
    if !salary_in_usd.is_finite() || salary_in_usd < 0.0 {
        bail!("Row {row}: salary_in_usd must be a non-negative number, got {salary_in_usd}");
    }
    let remote_ratio =
        RemoteRatio::try_from(remote_ratio).with_context(|| format!("Row {row}"))?;

    Ok(SalaryRecord {
        job_title: job_title.to_string(),
        experience_level: experience_level.to_string(),
        year,
        salary_in_usd,
        remote_ratio,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Extra columns are ignored.
fn read_csv<R: Read>(input: R) -> Result<Vec<SalaryRecord>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |names: &[&str]| -> Result<usize> {
        headers
            .iter()
            .position(|h| names.contains(&h.as_str()))
            .with_context(|| format!("CSV missing '{}' column", names[0]))
    };
    let title_idx = column(JOB_TITLE)?;
    let level_idx = column(EXPERIENCE_LEVEL)?;
    let year_idx = column(YEAR)?;
    let salary_idx = column(SALARY_IN_USD)?;
    let remote_idx = column(REMOTE_RATIO)?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        records.push(build_record(
            row_no,
            cell(title_idx),
            cell(level_idx),
            parse_integer(cell(year_idx), row_no, "year")?,
            parse_float(cell(salary_idx), row_no, "salary_in_usd")?,
            parse_integer(cell(remote_idx), row_no, "remote_ratio")?,
        )?);
    }

    Ok(records)
}

/// Integers may be written as `2021` or, by some exporters, `2021.0`.
fn parse_integer(s: &str, row: usize, col: &str) -> Result<i64> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => bail!("Row {row}, {col}: '{s}' is not an integer"),
    }
}

fn parse_float(s: &str, row: usize, col: &str) -> Result<f64> {
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "job_title": "Data Engineer",
///     "experience_level": "SE",
///     "year": 2023,
///     "salary_in_usd": 165000,
///     "remote_ratio": 100
///   },
///   ...
/// ]
/// ```
#[derive(Debug, Deserialize)]
struct JsonRecord {
    job_title: String,
    experience_level: String,
    #[serde(alias = "work_year")]
    year: i64,
    salary_in_usd: f64,
    remote_ratio: i64,
}

fn read_json<R: Read>(input: R) -> Result<Vec<SalaryRecord>> {
    let rows: Vec<JsonRecord> = serde_json::from_reader(input).context("parsing JSON")?;
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            build_record(
                i,
                &r.job_title,
                &r.experience_level,
                r.year,
                r.salary_in_usd,
                r.remote_ratio,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas or Polars.
///
/// Expected schema:
/// - `job_title`, `experience_level`: Utf8 or LargeUtf8
/// - `year` (or `work_year`), `remote_ratio`: Int32 or Int64
/// - `salary_in_usd`: Float64, Float32, Int64 or Int32
fn read_parquet(path: &Path) -> Result<Vec<SalaryRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let title_col = batch.column(parquet_column(&schema, JOB_TITLE)?);
        let level_col = batch.column(parquet_column(&schema, EXPERIENCE_LEVEL)?);
        let year_col = batch.column(parquet_column(&schema, YEAR)?);
        let salary_col = batch.column(parquet_column(&schema, SALARY_IN_USD)?);
        let remote_col = batch.column(parquet_column(&schema, REMOTE_RATIO)?);

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            records.push(build_record(
                row_no,
                &extract_string(title_col, row).with_context(|| format!("Row {row_no}: job_title"))?,
                &extract_string(level_col, row)
                    .with_context(|| format!("Row {row_no}: experience_level"))?,
                extract_integer(year_col, row).with_context(|| format!("Row {row_no}: year"))?,
                extract_float(salary_col, row)
                    .with_context(|| format!("Row {row_no}: salary_in_usd"))?,
                extract_integer(remote_col, row)
                    .with_context(|| format!("Row {row_no}: remote_ratio"))?,
            )?);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn parquet_column(schema: &Schema, names: &[&str]) -> Result<usize> {
    names
        .iter()
        .find_map(|n| schema.index_of(n).ok())
        .with_context(|| format!("Parquet file missing '{}' column", names[0]))
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn extract_integer(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("expected an integer column, got {other:?}"),
    }
}

fn extract_float(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 | DataType::Int64 => Ok(extract_integer(col, row)? as f64),
        other => bail!("expected a numeric column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::StringArray;
    use arrow::datatypes::Field;
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const CSV: &str = "\
job_title,experience_level,year,salary_in_usd,remote_ratio,company_size
Data Engineer,SE,2023,165000,100,M
Data Scientist,MI,2022,120000.5,50,L
Data Engineer,EN,2021,80000,0,S
";

    #[test]
    fn test_parse_csv() {
        let records = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].job_title, "Data Engineer");
        assert_eq!(records[0].experience_level, "SE");
        assert_eq!(records[0].year, 2023);
        assert_eq!(records[1].salary_in_usd, 120000.5);
        assert_eq!(records[1].remote_ratio, RemoteRatio::Hybrid);
        assert_eq!(records[2].remote_ratio, RemoteRatio::OnSite);
    }

    #[test]
    fn test_csv_work_year_alias() {
        let csv = "work_year,job_title,experience_level,salary_in_usd,remote_ratio\n\
                   2020,Analyst,EN,50000,0\n";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].year, 2020);
    }

    #[test]
    fn test_csv_missing_column() {
        let csv = "job_title,experience_level,year,salary_in_usd\nAnalyst,EN,2020,50000\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("remote_ratio"), "{err:#}");
    }

    #[test]
    fn test_csv_bad_cells() {
        let header = "job_title,experience_level,year,salary_in_usd,remote_ratio\n";
        for row in [
            "Analyst,EN,twenty,50000,0",
            "Analyst,EN,2020,lots,0",
            "Analyst,EN,2020,-1,0",
            "Analyst,EN,2020,50000,75",
            ",EN,2020,50000,0",
        ] {
            let csv = format!("{header}{row}\n");
            assert!(read_csv(csv.as_bytes()).is_err(), "accepted {row}");
        }
    }

    #[test]
    fn test_parse_integer_accepts_whole_floats() {
        assert_eq!(parse_integer("2021.0", 0, "year").unwrap(), 2021);
        assert!(parse_integer("2021.5", 0, "year").is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[
            {"job_title": "ML Engineer", "experience_level": "MI", "work_year": 2022,
             "salary_in_usd": 150000, "remote_ratio": 100},
            {"job_title": "Analyst", "experience_level": "EN", "year": 2021,
             "salary_in_usd": 60000.0, "remote_ratio": 50, "extra": true}
        ]"#;
        let records = read_json(json.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, 2022);
        assert_eq!(records[0].salary_in_usd, 150000.0);
        assert_eq!(records[1].remote_ratio, RemoteRatio::Hybrid);
    }

    #[test]
    fn test_json_missing_field() {
        let json = r#"[{"job_title": "Analyst", "experience_level": "EN", "year": 2021}]"#;
        assert!(read_json(json.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_file(Path::new("/definitely/not/here/salaries.csv")).unwrap_err();
        assert!(err.to_string().contains("opening"), "{err:#}");
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(load_file(Path::new("salaries.xlsx")).is_err());
    }

    #[test]
    fn test_header_only_csv_is_empty_dataset() {
        let path = std::env::temp_dir().join("salary_dash_header_only.csv");
        std::fs::write(&path, "job_title,experience_level,year,salary_in_usd,remote_ratio\n")
            .unwrap();
        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("job_title", DataType::Utf8, false),
            Field::new("experience_level", DataType::Utf8, false),
            Field::new("work_year", DataType::Int64, false),
            Field::new("salary_in_usd", DataType::Float64, false),
            Field::new("remote_ratio", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Data Engineer", "Analyst"])),
                Arc::new(StringArray::from(vec!["SE", "EN"])),
                Arc::new(Int64Array::from(vec![2023, 2020])),
                Arc::new(Float64Array::from(vec![165000.0, 55000.0])),
                Arc::new(Int64Array::from(vec![100, 0])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join("salary_dash_loader_test.parquet");
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        let dataset = result.unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].year, 2023);
        assert_eq!(dataset.records()[1].remote_ratio, RemoteRatio::OnSite);
        assert_eq!(dataset.top_titles().titles(), &["Data Engineer", "Analyst"]);
    }
}
