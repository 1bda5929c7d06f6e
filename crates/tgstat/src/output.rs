//! Output formatting: plain, JSON, YAML, CSV, table.
//!
//! Renders stat records in the format selected by `--output`. Structured
//! formats go through serde and keep field order; plain, CSV and table
//! use the values' `Display` so whole floats keep their `.0`.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use tgstat_core::StatRecord;

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Renders a stream of records, emitting the CSV header at most once.
#[derive(Debug)]
pub struct RecordPrinter {
    format: OutputFormat,
    header: bool,
    quiet: bool,
    header_done: bool,
}

impl RecordPrinter {
    pub fn new(format: OutputFormat, header: bool, quiet: bool) -> Self {
        Self {
            format,
            header,
            quiet,
            header_done: false,
        }
    }

    /// Render one record without printing it.
    pub fn render(&mut self, record: &StatRecord) -> Result<String, CliError> {
        let out = match self.format {
            OutputFormat::Plain => render_plain(record),
            OutputFormat::Json => render_json_pretty(record),
            OutputFormat::JsonCompact => render_json_compact(record),
            OutputFormat::Yaml => render_yaml(record),
            OutputFormat::Table => render_table(record),
            OutputFormat::Csv => {
                let with_header = self.header && !self.header_done;
                self.header_done |= with_header;
                render_csv(record, with_header)?
            }
        };
        Ok(out)
    }

    pub fn print(&mut self, record: &StatRecord) -> Result<(), CliError> {
        let out = self.render(record)?;
        print_output(&out, self.quiet);
        Ok(())
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
    let _ = stdout.flush();
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_plain(record: &StatRecord) -> String {
    record
        .iter()
        .map(|(name, value)| format!("{name} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(record: &StatRecord) -> String {
    let rows: Vec<FieldRow> = record
        .iter()
        .map(|(name, value)| FieldRow {
            field: name.to_owned(),
            value: value.to_string(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_csv(record: &StatRecord, with_header: bool) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if with_header {
        writer.write_record(record.names())?;
    }
    writer.write_record(record.values().map(ToString::to_string))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).trim_end().to_owned())
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn record() -> StatRecord {
        let mut r = StatRecord::new();
        r.insert("datetime", "2026-10-19 12:00:00");
        r.insert("up_rate", 4850_i64);
        r.insert("up_transferred", 4096.0);
        r.insert("dsl_mode", "VDSL2");
        r
    }

    #[test]
    fn plain_is_name_value_lines() {
        let out = RecordPrinter::new(OutputFormat::Plain, false, false)
            .render(&record())
            .unwrap();
        assert_eq!(
            out,
            "datetime 2026-10-19 12:00:00\nup_rate 4850\nup_transferred 4096.0\ndsl_mode VDSL2"
        );
    }

    #[test]
    fn csv_header_only_once() {
        let mut printer = RecordPrinter::new(OutputFormat::Csv, true, false);
        let first = printer.render(&record()).unwrap();
        let second = printer.render(&record()).unwrap();
        assert_eq!(
            first,
            "datetime,up_rate,up_transferred,dsl_mode\n2026-10-19 12:00:00,4850,4096.0,VDSL2"
        );
        assert_eq!(second, "2026-10-19 12:00:00,4850,4096.0,VDSL2");
    }

    #[test]
    fn csv_without_header() {
        let out = RecordPrinter::new(OutputFormat::Csv, false, false)
            .render(&record())
            .unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn json_keeps_field_order() {
        let out = RecordPrinter::new(OutputFormat::JsonCompact, false, false)
            .render(&record())
            .unwrap();
        assert_eq!(
            out,
            r#"{"datetime":"2026-10-19 12:00:00","up_rate":4850,"up_transferred":4096.0,"dsl_mode":"VDSL2"}"#
        );
    }

    #[test]
    fn yaml_and_table_mention_every_field() {
        for format in [OutputFormat::Yaml, OutputFormat::Table] {
            let out = RecordPrinter::new(format, false, false)
                .render(&record())
                .unwrap();
            for name in ["datetime", "up_rate", "up_transferred", "dsl_mode"] {
                assert!(out.contains(name), "{format:?} output lacks {name}:\n{out}");
            }
        }
    }
}
