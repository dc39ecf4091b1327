use std::path::Path;

use anyhow::{bail, Result};

/// On-disk layouts understood by the loader and the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `x` / `y` list columns plus metadata columns.
    Parquet,
    /// `[{ "x": [...], "y": [...], ...meta }, ...]`
    Json,
    /// Header row; `x` / `y` cells hold semicolon-separated floats.
    Csv,
}

impl Format {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "parquet" | "pq" => Ok(Format::Parquet),
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(Format::from_path(Path::new("a.PQ")).unwrap(), Format::Parquet);
        assert_eq!(Format::from_path(Path::new("dir/b.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("c.Csv")).unwrap(), Format::Csv);
        assert!(Format::from_path(Path::new("d.txt")).is_err());
        assert!(Format::from_path(Path::new("noext")).is_err());
    }
}
