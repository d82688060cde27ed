//! Run report output in JSON or JSON Lines.
//!
//! JSON writes the whole [`RunReport`] as one document. JSON Lines writes one
//! [`FileOutcome`](crate::types::FileOutcome) per line, which streams well into
//! `jq` and friends.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::RunReport;

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Single pretty-printed JSON document
    #[default]
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// A writer that serializes run reports.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    items_written: usize,
}

impl OutputWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and wrap it in a writer.
    pub fn create(path: &Path, format: OutputFormat) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), format))
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            items_written: 0,
        }
    }

    /// Write a full run report and flush.
    pub fn write_report(&mut self, report: &RunReport) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(report)?,
            OutputFormat::JsonLines => {
                for outcome in &report.outcomes {
                    self.write_line(outcome)?;
                }
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_json<T: Serialize>(&mut self, item: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, item)?;
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    fn write_line<T: Serialize>(&mut self, item: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, item)?;
        writeln!(self.writer)?;
        self.items_written += 1;
        Ok(())
    }

    /// Number of JSON values written so far.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileOutcome, Outcome, SkipReason};
    use std::path::PathBuf;
    use std::time::Duration;

    fn report() -> RunReport {
        RunReport {
            outcomes: vec![
                FileOutcome {
                    source_path: PathBuf::from("/in/a.jpg"),
                    caption: Some("Mountain Lake!!".to_string()),
                    outcome: Outcome::Success {
                        destination: PathBuf::from("/in/Mountain_Lake.jpg"),
                    },
                },
                FileOutcome {
                    source_path: PathBuf::from("/in/b.jpg"),
                    caption: None,
                    outcome: Outcome::Skipped {
                        reason: SkipReason::Interrupted,
                    },
                },
            ],
            interrupted: true,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_json_report_is_one_document() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json);
        writer.write_report(&report()).unwrap();
        assert_eq!(writer.items_written(), 1);

        let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();
        assert_eq!(value["interrupted"], true);
        assert_eq!(value["elapsed"], 1.5);
        assert_eq!(value["outcomes"][0]["status"], "success");
        assert_eq!(value["outcomes"][0]["caption"], "Mountain Lake!!");
        assert_eq!(value["outcomes"][1]["reason"], "interrupted");
    }

    #[test]
    fn test_jsonl_report_has_one_line_per_file() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines);
        writer.write_report(&report()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["status"], "skipped");
        assert!(second.get("caption").is_none());
    }

    #[test]
    fn test_create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut writer = OutputWriter::create(&path, OutputFormat::Json).unwrap();
        writer.write_report(&report()).unwrap();
        drop(writer);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Mountain_Lake.jpg"));
    }
}
