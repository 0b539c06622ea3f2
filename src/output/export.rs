// File export for collected and analyzed reports.
//
// JSON is a pretty-printed array of the serialized records. CSV is a header
// row followed by one row per record, quoted per RFC 4180.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// Guess the format from a file extension, falling back to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

/// A record that can be written as one CSV row.
pub trait CsvRecord {
    fn headers() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line(fields: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    fields
        .into_iter()
        .map(|f| escape_csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render records as CSV text (header included, CRLF line endings).
pub fn to_csv<T: CsvRecord>(records: &[T]) -> String {
    let mut out = csv_line(T::headers());
    out.push_str("\r\n");
    for record in records {
        out.push_str(&csv_line(record.fields()));
        out.push_str("\r\n");
    }
    out
}

/// Write records to `path` in the given format, creating parent directories.
/// Returns the number of records written.
pub fn write_records<T: Serialize + CsvRecord>(
    path: &Path,
    format: ExportFormat,
    records: &[T],
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let body = match format {
        ExportFormat::Json => serde_json::to_string_pretty(records)?,
        ExportFormat::Csv => to_csv(records),
    };

    let mut file =
        fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(body.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        records = records.len(),
        format = ?format,
        "Exported records"
    );
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: String,
        note: String,
    }

    impl CsvRecord for Row {
        fn headers() -> &'static [&'static str] {
            &["name", "note"]
        }

        fn fields(&self) -> Vec<String> {
            vec![self.name.clone(), self.note.clone()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "pier".into(),
                note: "waves, \"big\" ones".into(),
            },
            Row {
                name: "bay".into(),
                note: "line one\nline two".into(),
            },
        ]
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(escape_csv_field("calm"), "calm");
    }

    #[test]
    fn special_fields_are_quoted() {
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_has_header_and_quoted_rows() {
        let csv = to_csv(&rows());
        let expected = "name,note\r\npier,\"waves, \"\"big\"\" ones\"\r\nbay,\"line one\nline two\"\r\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn writes_json_array_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rows.json");
        let written = write_records(&path, ExportFormat::Json, &rows()).unwrap();
        assert_eq!(written, 2);

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["name"], "bay");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("out.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Json);
    }
}
