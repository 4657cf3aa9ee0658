use anyhow::{Context, Result};
use std::path::Path;

/// Parse newline-delimited voltage samples, ignoring blank/comment lines.
pub fn parse_f64_series(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let val: f64 = trimmed
            .parse()
            .with_context(|| format!("line {} is not f64: {}", idx + 1, trimmed))?;
        out.push(val);
    }
    if out.is_empty() {
        anyhow::bail!("no numeric samples found");
    }
    Ok(out)
}

/// Read a newline-delimited voltage series from disk.
pub fn read_f64_series(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_f64_series(&text)
}

/// Render a series back to newline-delimited text.
pub fn format_f64_series(values: &[f64]) -> String {
    let mut out = String::with_capacity(values.len() * 8);
    for v in values {
        out.push_str(&v.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let values = parse_f64_series("# volts\n0.5\n\n  1.25 \n-2\n").unwrap();
        assert_eq!(values, vec![0.5, 1.25, -2.0]);
    }

    #[test]
    fn reports_offending_line() {
        let err = parse_f64_series("1.0\nabc\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse_f64_series("# nothing\n").is_err());
    }

    #[test]
    fn format_parses_back() {
        let values = vec![0.1, 9.9, 10.0];
        assert_eq!(parse_f64_series(&format_f64_series(&values)).unwrap(), values);
    }
}
