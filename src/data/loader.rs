use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::format::Format;
use super::model::{MetadataValue, SpectralDataset, Spectrum};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a spectral dataset, dispatching on the file extension.
pub fn load_file(path: &Path) -> Result<SpectralDataset> {
    let spectra = match Format::from_path(path)? {
        Format::Parquet => read_parquet(path),
        Format::Json => read_json(path),
        Format::Csv => read_csv(path),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("loaded {} spectra from {}", spectra.len(), path.display());
    Ok(SpectralDataset::from_spectra(spectra))
}

fn check_lengths(x: &[f64], y: &[f64], row: usize) -> Result<()> {
    if x.len() != y.len() {
        bail!("Row {row}: x has {} values but y has {}", x.len(), y.len());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). `null` entries
/// in `x` / `y` stand for missing samples and read as NaN.
fn read_json(path: &Path) -> Result<Vec<Spectrum>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(row, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {row} is not a JSON object"))?;
            let x = json_floats(obj.get("x"), row, "x")?;
            let y = json_floats(obj.get("y"), row, "y")?;
            check_lengths(&x, &y, row)?;

            let metadata = obj
                .iter()
                .filter(|(key, _)| *key != "x" && *key != "y")
                .map(|(key, val)| (key.clone(), json_metadata(val)))
                .collect();
            Ok(Spectrum { x, y, metadata })
        })
        .collect()
}

fn json_floats(val: Option<&JsonValue>, row: usize, col: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("Row {row}: missing or invalid '{col}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| match v {
            JsonValue::Null => Ok(f64::NAN),
            v => v
                .as_f64()
                .with_context(|| format!("Row {row}, {col}[{j}]: not a number")),
        })
        .collect()
}

fn json_metadata(val: &JsonValue) -> MetadataValue {
    match val {
        JsonValue::String(s) => MetadataValue::String(s.clone()),
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => MetadataValue::Integer(i),
            (None, Some(f)) => MetadataValue::Float(f),
            _ => MetadataValue::String(n.to_string()),
        },
        JsonValue::Bool(b) => MetadataValue::Bool(*b),
        JsonValue::Null => MetadataValue::Null,
        other => MetadataValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<Spectrum>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let x_idx = headers
        .iter()
        .position(|h| h == "x")
        .context("CSV missing 'x' column")?;
    let y_idx = headers
        .iter()
        .position(|h| h == "y")
        .context("CSV missing 'y' column")?;

    let mut spectra = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("CSV row {row}"))?;

        let x = split_floats(record.get(x_idx).unwrap_or(""), row, "x")?;
        let y = split_floats(record.get(y_idx).unwrap_or(""), row, "y")?;
        check_lengths(&x, &y, row)?;

        let metadata = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(i, _)| *i != x_idx && *i != y_idx)
            .map(|(_, (name, cell))| (name.to_string(), guess_metadata(cell)))
            .collect();
        spectra.push(Spectrum { x, y, metadata });
    }
    Ok(spectra)
}

/// `"400.0;400.5;401.0"` → floats. An empty cell is an empty spectrum.
fn split_floats(cell: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }
    cell.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

fn guess_metadata(cell: &str) -> MetadataValue {
    if cell.is_empty() {
        MetadataValue::Null
    } else if let Ok(i) = cell.parse::<i64>() {
        MetadataValue::Integer(i)
    } else if let Ok(f) = cell.parse::<f64>() {
        MetadataValue::Float(f)
    } else if let Ok(b) = cell.parse::<bool>() {
        MetadataValue::Bool(b)
    } else {
        MetadataValue::String(cell.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// `x` / `y` are `List` or `LargeList` of Float64 or Float32; every other
/// column is metadata. Works with files from pandas and polars alike.
fn read_parquet(path: &Path) -> Result<Vec<Spectrum>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?
        .build()
        .context("building parquet reader")?;

    let mut spectra = Vec::new();
    for batch in reader {
        let batch = batch.context("reading parquet record batch")?;
        let schema = batch.schema();

        let x_idx = schema
            .index_of("x")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'x' column"))?;
        let y_idx = schema
            .index_of("y")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'y' column"))?;
        let meta_cols: Vec<(&String, &ArrayRef)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .enumerate()
            .filter(|(i, _)| *i != x_idx && *i != y_idx)
            .map(|(_, (field, col))| (field.name(), col))
            .collect();

        // Row numbers in messages count across batches.
        let offset = spectra.len();
        for i in 0..batch.num_rows() {
            let row = offset + i;
            let x = list_floats(batch.column(x_idx), i)
                .with_context(|| format!("Row {row}: failed to read 'x'"))?;
            let y = list_floats(batch.column(y_idx), i)
                .with_context(|| format!("Row {row}: failed to read 'y'"))?;
            check_lengths(&x, &y, row)?;

            let metadata: BTreeMap<String, MetadataValue> = meta_cols
                .iter()
                .map(|(name, col)| ((*name).clone(), arrow_metadata(col, i)))
                .collect();
            spectra.push(Spectrum { x, y, metadata });
        }
    }
    Ok(spectra)
}

fn list_floats(col: &ArrayRef, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }
    let values = match col.data_type() {
        DataType::List(_) => col.as_list::<i32>().value(row),
        DataType::LargeList(_) => col.as_list::<i64>().value(row),
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    if let Some(arr) = values.as_primitive_opt::<Float64Type>() {
        Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(arr) = values.as_primitive_opt::<Float32Type>() {
        Ok(arr.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values.data_type()
        )
    }
}

fn arrow_metadata(col: &ArrayRef, row: usize) -> MetadataValue {
    if col.is_null(row) {
        return MetadataValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => MetadataValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => {
            MetadataValue::String(col.as_string::<i64>().value(row).to_string())
        }
        DataType::Int32 => MetadataValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => MetadataValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            MetadataValue::Float(col.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => MetadataValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => MetadataValue::Bool(col.as_boolean().value(row)),
        other => MetadataValue::String(format!("{other:?}")),
    }
}
