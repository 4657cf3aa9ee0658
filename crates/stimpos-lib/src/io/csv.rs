use crate::signal::StimulusTrace;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a time/voltage recording from a delimited file with a header row.
///
/// Column names are matched case-insensitively. The resulting trace is
/// validated, so out-of-order time stamps are reported here.
pub fn read_trace_csv(
    path: &Path,
    time_col: &str,
    volt_col: &str,
    delimiter: u8,
) -> Result<StimulusTrace> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_trace(file, time_col, volt_col, delimiter)
        .with_context(|| format!("in {}", path.display()))
}

/// Same as [`read_trace_csv`] for any reader.
pub fn read_trace<R: Read>(
    reader: R,
    time_col: &str,
    volt_col: &str,
    delimiter: u8,
) -> Result<StimulusTrace> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().context("reading header")?.clone();
    let time_idx = locate_column(&headers, time_col, "time")?;
    let volt_idx = locate_column(&headers, volt_col, "voltage")?;

    let mut time = Vec::new();
    let mut volt = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.context("reading record")?;
        time.push(parse_field(&record, time_idx, row, time_col)?);
        volt.push(parse_field(&record, volt_idx, row, volt_col)?);
    }
    if volt.is_empty() {
        anyhow::bail!("no samples found");
    }
    Ok(StimulusTrace::new(time, volt)?)
}

fn parse_field(record: &csv::StringRecord, idx: usize, row: usize, name: &str) -> Result<f64> {
    record
        .get(idx)
        .ok_or_else(|| anyhow::anyhow!("row {} is missing {}", row + 1, name))?
        .parse::<f64>()
        .with_context(|| format!("row {}: {} is not f64", row + 1, name))
}

fn locate_column(headers: &csv::StringRecord, requested: &str, hint: &str) -> Result<usize> {
    headers
        .iter()
        .position(|name| name.eq_ignore_ascii_case(requested))
        .ok_or_else(|| anyhow::anyhow!("missing {} column ({})", hint, requested))
}
