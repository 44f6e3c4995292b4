use std::sync::Arc;

use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Sample countries: (iso3, name, region, lat, lon, economy scale factor)
const COUNTRIES: &[(&str, &str, &str, f64, f64, f64)] = &[
    ("KEN", "Kenya", "Africa", -0.02, 37.91, 1.0),
    ("GHA", "Ghana", "Africa", 7.95, -1.03, 0.7),
    ("NGA", "Nigeria", "Africa", 9.08, 8.68, 4.2),
    ("BGD", "Bangladesh", "Asia", 23.68, 90.35, 3.1),
    ("VNM", "Viet Nam", "Asia", 14.06, 108.28, 2.6),
    ("PER", "Peru", "South America", -9.19, -75.02, 2.0),
    ("COL", "Colombia", "South America", 4.57, -74.30, 2.8),
    ("MDA", "Moldova", "Europe", 47.41, 28.37, 0.1),
];

// Indicator families with real sample data: (label, base value, yearly growth).
// Families missing here (trade mispricing, corruption, taxpayer counts, ...)
// exercise the dashboard's placeholder path.
const INDICATORS: &[(&str, f64, f64)] = &[
    ("GDP (current US$)", 50.0e9, 0.04),
    ("Illicit Financial Flows (current US$)", 1.5e9, 0.07),
    ("Tax Revenue - % of GDP - value", 15.0, 0.01),
    ("Tax Revenue - % of GDP - Capacity", 21.0, 0.005),
    ("PEFA: Aggregate expenditure out-turn - Intended", 100.0, 0.0),
    ("PEFA: Aggregate expenditure out-turn - Actual", 93.0, 0.0),
];

const YEARS: std::ops::RangeInclusive<i32> = 2012..=2020;

fn main() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut years: Vec<i32> = Vec::new();
    let mut iso3s: Vec<&str> = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut regions: Vec<&str> = Vec::new();
    let mut labels: Vec<&str> = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();

    for &(iso3, name, region, _lat, _lon, scale) in COUNTRIES {
        for &(label, base, growth) in INDICATORS {
            // Only the US$ aggregates scale with economy size.
            let base = if label.contains("US$") { base * scale } else { base };
            for (i, year) in YEARS.enumerate() {
                let noise: f64 = rng.gen_range(-0.05..=0.05);
                let value = base * (1.0 + growth).powi(i as i32) * (1.0 + noise);
                // A few missing observations, like real collections have.
                let value = if rng.gen_bool(0.03) { None } else { Some(value) };

                years.push(year);
                iso3s.push(iso3);
                names.push(name);
                regions.push(region);
                labels.push(label);
                values.push(value);
            }
        }
    }

    write_observations_parquet(&years, &iso3s, &names, &regions, &labels, &values);
    write_country_reference_csv();

    println!(
        "Wrote {} observations ({} countries × {} indicators × {} years) \
         to sample_observations.parquet + country_reference.csv",
        years.len(),
        COUNTRIES.len(),
        INDICATORS.len(),
        YEARS.count()
    );
}

fn write_observations_parquet(
    years: &[i32],
    iso3s: &[&str],
    names: &[&str],
    regions: &[&str],
    labels: &[&str],
    values: &[Option<f64>],
) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int32, false),
        Field::new("iso3", DataType::Utf8, false),
        Field::new("country_or_area", DataType::Utf8, false),
        Field::new("region_name", DataType::Utf8, false),
        Field::new("indicator_label", DataType::Utf8, false),
        Field::new("value", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from(years.to_vec())),
            Arc::new(StringArray::from(iso3s.to_vec())),
            Arc::new(StringArray::from(names.to_vec())),
            Arc::new(StringArray::from(regions.to_vec())),
            Arc::new(StringArray::from(labels.to_vec())),
            Arc::new(Float64Array::from(values.to_vec())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let output_path = "sample_observations.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn write_country_reference_csv() {
    let mut writer =
        csv::Writer::from_path("country_reference.csv").expect("Failed to create reference CSV");
    writer
        .write_record(["iso3", "country_or_area", "region_name", "lat", "lon"])
        .expect("Failed to write header");
    for &(iso3, name, region, lat, lon, _scale) in COUNTRIES {
        let lat = lat.to_string();
        let lon = lon.to_string();
        writer
            .write_record([iso3, name, region, lat.as_str(), lon.as_str()])
            .expect("Failed to write reference row");
    }
    writer.flush().expect("Failed to flush reference CSV");
}
