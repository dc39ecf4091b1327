use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, ListBuilder, StringBuilder,
};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue};

use super::format::Format;
use super::model::{MetadataValue, SpectralDataset};

/// Write a dataset in the format implied by the file extension. The
/// output is readable by [`load_file`](super::loader::load_file).
pub fn write_file(dataset: &SpectralDataset, path: &Path) -> Result<()> {
    let format = Format::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let written = match format {
        Format::Parquet => write_parquet(dataset, path),
        Format::Json => write_json(dataset, path),
        Format::Csv => write_csv(dataset, path),
    };
    written.with_context(|| format!("writing {}", path.display()))?;

    log::info!("wrote {} spectra to {}", dataset.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn write_json(dataset: &SpectralDataset, path: &Path) -> Result<()> {
    // serde_json cannot encode NaN; it becomes null, which reads back as NaN.
    let floats = |v: &[f64]| -> JsonValue { v.iter().copied().map(JsonValue::from).collect() };

    let records: Vec<JsonValue> = dataset
        .spectra
        .iter()
        .map(|sp| {
            let mut obj = Map::new();
            obj.insert("x".into(), floats(&sp.x));
            obj.insert("y".into(), floats(&sp.y));
            for (col, val) in &sp.metadata {
                obj.insert(col.clone(), metadata_json(val));
            }
            JsonValue::Object(obj)
        })
        .collect();

    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer(std::io::BufWriter::new(file), &records).context("encoding JSON")?;
    Ok(())
}

fn metadata_json(val: &MetadataValue) -> JsonValue {
    match val {
        MetadataValue::String(s) => JsonValue::String(s.clone()),
        MetadataValue::Integer(i) => JsonValue::from(*i),
        MetadataValue::Float(f) => JsonValue::from(*f),
        MetadataValue::Bool(b) => JsonValue::Bool(*b),
        MetadataValue::Null => JsonValue::Null,
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn write_csv(dataset: &SpectralDataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;

    let mut header = vec!["x", "y"];
    header.extend(dataset.column_names.iter().map(String::as_str));
    writer.write_record(&header).context("writing CSV header")?;

    for sp in &dataset.spectra {
        let mut record = vec![join_floats(&sp.x), join_floats(&sp.y)];
        record.extend(dataset.column_names.iter().map(|col| {
            sp.metadata
                .get(col)
                .map(metadata_cell)
                .unwrap_or_default()
        }));
        writer.write_record(&record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// `{:?}` keeps full precision and a trailing `.0`, so integral floats
/// are not re-read as integers.
fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(";")
}

fn metadata_cell(val: &MetadataValue) -> String {
    match val {
        MetadataValue::Float(f) => format!("{f:?}"),
        MetadataValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Arrow type chosen for a metadata column from the values it holds.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

fn column_kind(dataset: &SpectralDataset, column: &str) -> ColumnKind {
    let mut kind = None;
    for val in dataset.spectra.iter().filter_map(|sp| sp.metadata.get(column)) {
        let this = match val {
            MetadataValue::Null => continue,
            MetadataValue::Integer(_) => ColumnKind::Int,
            MetadataValue::Float(_) => ColumnKind::Float,
            MetadataValue::Bool(_) => ColumnKind::Bool,
            MetadataValue::String(_) => ColumnKind::Text,
        };
        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(ColumnKind::Int | ColumnKind::Float), ColumnKind::Int | ColumnKind::Float) => {
                ColumnKind::Float
            }
            _ => ColumnKind::Text,
        });
    }
    kind.unwrap_or(ColumnKind::Text)
}

fn metadata_array(dataset: &SpectralDataset, column: &str) -> ArrayRef {
    let cells = dataset.spectra.iter().map(|sp| {
        sp.metadata
            .get(column)
            .filter(|v| !v.is_null())
    });

    match column_kind(dataset, column) {
        ColumnKind::Int => {
            let mut b = Int64Builder::new();
            for cell in cells {
                match cell {
                    Some(MetadataValue::Integer(i)) => b.append_value(*i),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        ColumnKind::Float => {
            let mut b = Float64Builder::new();
            for cell in cells {
                b.append_option(cell.and_then(MetadataValue::as_f64));
            }
            Arc::new(b.finish())
        }
        ColumnKind::Bool => {
            let mut b = BooleanBuilder::new();
            for cell in cells {
                match cell {
                    Some(MetadataValue::Bool(v)) => b.append_value(*v),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        ColumnKind::Text => {
            let mut b = StringBuilder::new();
            for cell in cells {
                b.append_option(cell.map(metadata_cell));
            }
            Arc::new(b.finish())
        }
    }
}

fn float_lists<'a>(rows: impl Iterator<Item = &'a [f64]>) -> ArrayRef {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn write_parquet(dataset: &SpectralDataset, path: &Path) -> Result<()> {
    let mut columns: Vec<(String, ArrayRef)> = vec![
        ("x".into(), float_lists(dataset.spectra.iter().map(|sp| sp.x.as_slice()))),
        ("y".into(), float_lists(dataset.spectra.iter().map(|sp| sp.y.as_slice()))),
    ];
    for col in &dataset.column_names {
        columns.push((col.clone(), metadata_array(dataset, col)));
    }

    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, arr)| Field::new(name, arr.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, arr)| arr).collect(),
    )
    .context("assembling record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("finishing parquet file")?;
    Ok(())
}
