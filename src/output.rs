use std::io::{self, Write};

use serde::Serialize;

use crate::pipeline::{PipelineReport, ProgressEvent, ProgressSink};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

/// Prints progress lines to stdout as they happen.
pub struct HumanOutput;

impl ProgressSink for HumanOutput {
    fn event(&self, event: ProgressEvent) {
        println!("{}", event.message);
    }
}

/// Stays quiet during the run and prints the final report as JSON.
pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &PipelineReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}
