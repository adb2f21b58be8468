//! Rendering of a result registry to an output sink.
//!
//! [`ConsoleReporter`] writes a fixed-width bordered table for humans;
//! [`JsonReporter`] writes a machine-readable top-level array. Both
//! implement the single-operation [`Reporter`] contract.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::metrics::BenchmarkResult;
use crate::registry::Registry;

pub trait Reporter {
    /// Emit `results` through this reporter's output channel.
    fn report(&mut self, results: &Registry) -> Result<()>;
}

const COL_WIDTHS: [usize; 5] = [28, 10, 10, 10, 12];
const HEADERS: [&str; 5] = ["Benchmark", "Mean(ms)", "Min(ms)", "Max(ms)", "Peak Mem"];

/// Writes a formatted summary table.
///
/// ```text
/// ┌──────────────────── Benchmark Results ─────────────────────┐
/// ├──────────────────┬──────────┬──────────┬──────────┬────────┤
/// │ Benchmark        │ Mean(ms) │ Min(ms)  │ Max(ms)  │ Peak.. │
/// ├──────────────────┼──────────┼──────────┼──────────┼────────┤
/// │ parse small ...  │    1.234 │    1.100 │    1.400 │ 256... │
/// └──────────────────┴──────────┴──────────┴──────────┴────────┘
/// ```
pub struct ConsoleReporter<W: Write> {
    writer: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn row(cells: [String; 5]) -> String {
        let mut line = String::from("│");
        for (cell, width) in cells.iter().zip(COL_WIDTHS) {
            line.push_str(&format!(" {cell:<width$} "));
            line.push('│');
        }
        line
    }

    fn separator(left: char, junction: char, right: char) -> String {
        let mut line = String::new();
        line.push(left);
        for (i, width) in COL_WIDTHS.iter().enumerate() {
            if i > 0 {
                line.push(junction);
            }
            line.extend(std::iter::repeat('─').take(width + 2));
        }
        line.push(right);
        line
    }

    fn title_border() -> String {
        let title = " Benchmark Results ";
        // Column content + cell padding + interior separators.
        let total = COL_WIDTHS.iter().sum::<usize>() + 2 * COL_WIDTHS.len() + COL_WIDTHS.len() - 1;
        let fill = total.saturating_sub(title.chars().count());
        let left = fill / 2;
        let right = fill - left;
        let mut line = String::from("┌");
        line.extend(std::iter::repeat('─').take(left));
        line.push_str(title);
        line.extend(std::iter::repeat('─').take(right));
        line.push('┐');
        line
    }

    fn format_row(result: &BenchmarkResult) -> [String; 5] {
        let mem = match result.peak_memory_bytes {
            Some(peak) => format!("{:.1} KB", peak as f64 / 1024.0),
            None => "N/A".to_string(),
        };
        let name: String = result.name.chars().take(COL_WIDTHS[0]).collect();
        [
            name,
            format!("{:.3}", result.mean().as_secs_f64() * 1000.0),
            format!("{:.3}", result.min().as_secs_f64() * 1000.0),
            format!("{:.3}", result.max().as_secs_f64() * 1000.0),
            mem,
        ]
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, results: &Registry) -> Result<()> {
        if results.is_empty() {
            writeln!(self.writer, "No benchmark results to report.")?;
            return Ok(());
        }

        let mid = Self::separator('├', '┼', '┤');
        writeln!(self.writer, "{}", Self::title_border())?;
        writeln!(self.writer, "{}", Self::separator('├', '┬', '┤'))?;
        writeln!(
            self.writer,
            "{}",
            Self::row(HEADERS.map(str::to_string))
        )?;
        writeln!(self.writer, "{mid}")?;
        for (_, result) in results.iter() {
            writeln!(self.writer, "{}", Self::row(Self::format_row(result)))?;
        }
        writeln!(self.writer, "{}", Self::separator('└', '┴', '┘'))?;
        Ok(())
    }
}

/// One element of the structured output document.
#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    name: &'a str,
    mean_ms: f64,
    min_ms: f64,
    max_ms: f64,
    runs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdev_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peak_memory_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<&'a Map<String, Value>>,
}

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0 * 1e6).round() / 1e6
}

impl<'a> From<&'a BenchmarkResult> for JsonEntry<'a> {
    fn from(result: &'a BenchmarkResult) -> Self {
        JsonEntry {
            name: &result.name,
            mean_ms: round_ms(result.mean().as_secs_f64()),
            min_ms: round_ms(result.min().as_secs_f64()),
            max_ms: round_ms(result.max().as_secs_f64()),
            runs: result.runs(),
            stdev_ms: result.stdev().map(|d| round_ms(d.as_secs_f64())),
            peak_memory_bytes: result.peak_memory_bytes,
            extra: (!result.extra.is_empty()).then_some(&result.extra),
        }
    }
}

/// Serializes the registry as a pretty-printed top-level JSON array.
pub struct JsonReporter<W: Write> {
    writer: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, results: &Registry) -> Result<()> {
        let entries: Vec<JsonEntry<'_>> = results.iter().map(|(_, r)| JsonEntry::from(r)).collect();
        serde_json::to_writer_pretty(&mut self.writer, &entries)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
