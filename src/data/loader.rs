use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{CountryRef, Dataset, Observation};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Categorized loader failures; everything else is reported via `anyhow`
/// context strings.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load observations from a file and build a [`Dataset`] (with an empty
/// country reference table). Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat columns `year`, `iso3`, `country_or_area`,
///   `region_name`, `indicator_label`, `value` (recommended)
/// * `.json`    – records orientation, one object per observation
/// * `.csv`     – header row with the same column names
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

/// Load the country reference table:
/// `iso3,country_or_area,region_name,lat,lon` CSV.
pub fn load_country_reference(path: &Path) -> Result<Vec<CountryRef>> {
    let mut reader = csv::Reader::from_path(path).context("opening country reference CSV")?;
    let mut countries = Vec::new();
    for (row_no, result) in reader.deserialize::<RawCountryRef>().enumerate() {
        let raw = result.with_context(|| format!("country reference row {row_no}"))?;
        countries.push(CountryRef {
            iso3: raw.iso3,
            name: raw.country_or_area,
            region: raw.region_name,
            lat: raw.lat,
            lon: raw.lon,
        });
    }
    Ok(countries)
}

/// Convenience used by the host: observations plus optional reference table
/// combined into an indexed [`Dataset`].
pub fn load_dataset(observations: &Path, reference: Option<&Path>) -> Result<Dataset> {
    let obs = load_observations(observations)?;
    let countries = match reference {
        Some(p) => load_country_reference(p)?,
        None => Vec::new(),
    };
    Ok(Dataset::from_parts(obs, countries))
}

// ---------------------------------------------------------------------------
// Record shapes (CSV / JSON share one schema)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawObservation {
    year: i32,
    iso3: String,
    country_or_area: String,
    region_name: String,
    indicator_label: String,
    /// Absent / empty means missing, kept as `None`.
    value: Option<f64>,
}

impl From<RawObservation> for Observation {
    fn from(raw: RawObservation) -> Self {
        Observation {
            year: raw.year,
            iso3: raw.iso3,
            country: raw.country_or_area,
            region: raw.region_name,
            indicator_label: raw.indicator_label,
            value: raw.value.filter(|v| v.is_finite()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCountryRef {
    iso3: String,
    country_or_area: String,
    region_name: String,
    lat: f64,
    lon: f64,
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "year": 2019,
///     "iso3": "DEU",
///     "country_or_area": "Germany",
///     "region_name": "Europe",
///     "indicator_label": "GDP (current US$)",
///     "value": 3.86e12
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Observation>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<RawObservation> = serde_json::from_str(&text).context("parsing JSON")?;
    Ok(records.into_iter().map(Observation::from).collect())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row
/// `year,iso3,country_or_area,region_name,indicator_label,value` with an
/// empty `value` field for missing observations.
fn load_csv(path: &Path) -> Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut observations = Vec::new();
    for (row_no, result) in reader.deserialize::<RawObservation>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        observations.push(raw.into());
    }
    Ok(observations)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load observations from a Parquet file.
///
/// Expected schema: `year` Int32/Int64, the four label columns Utf8, and a
/// nullable Float64/Float32 `value`. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Observation>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut observations = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let year_col = column(&batch, "year")?;
        let iso3_col = column(&batch, "iso3")?;
        let country_col = column(&batch, "country_or_area")?;
        let region_col = column(&batch, "region_name")?;
        let label_col = column(&batch, "indicator_label")?;
        let value_col = column(&batch, "value")?;

        for row in 0..batch.num_rows() {
            observations.push(Observation {
                year: extract_i32(year_col, row)
                    .with_context(|| format!("row {row}: failed to read 'year'"))?,
                iso3: extract_string(iso3_col, row)
                    .with_context(|| format!("row {row}: failed to read 'iso3'"))?,
                country: extract_string(country_col, row)
                    .with_context(|| format!("row {row}: failed to read 'country_or_area'"))?,
                region: extract_string(region_col, row)
                    .with_context(|| format!("row {row}: failed to read 'region_name'"))?,
                indicator_label: extract_string(label_col, row)
                    .with_context(|| format!("row {row}: failed to read 'indicator_label'"))?,
                value: extract_opt_f64(value_col, row)
                    .with_context(|| format!("row {row}: failed to read 'value'"))?,
            });
        }
    }

    Ok(observations)
}

// -- Parquet / Arrow helpers --

fn column<'a>(
    batch: &'a arrow::record_batch::RecordBatch,
    name: &'static str,
) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        other => anyhow::bail!("expected Utf8 column, got {other:?}"),
    }
}

fn extract_i32(col: &Arc<dyn Array>, row: usize) -> Result<i32> {
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row) as i32)
        }
        other => anyhow::bail!("expected Int32 or Int64 column, got {other:?}"),
    }
}

fn extract_opt_f64(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let v = match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            arr.value(row)
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            arr.value(row) as f64
        }
        other => anyhow::bail!("expected Float64 or Float32 column, got {other:?}"),
    };
    Ok(Some(v).filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn csv_roundtrip_with_missing_value() {
        let mut tmp = std::env::temp_dir();
        tmp.push("govscope_loader_test.csv");
        let mut f = std::fs::File::create(&tmp).unwrap();
        writeln!(f, "year,iso3,country_or_area,region_name,indicator_label,value").unwrap();
        writeln!(f, "2019,DEU,Germany,Europe,GDP (current US$),3.86e12").unwrap();
        writeln!(f, "2020,DEU,Germany,Europe,GDP (current US$),").unwrap();
        drop(f);

        let obs = load_observations(&tmp).unwrap();
        std::fs::remove_file(&tmp).ok();

        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].value, Some(3.86e12));
        assert_eq!(obs[1].value, None);
        assert_eq!(obs[1].iso3, "DEU");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_observations(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains("unsupported file extension"));
    }
}
