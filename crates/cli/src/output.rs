//! Presentation of the structured report on a terminal.

use std::io::IsTerminal;

use colored::Colorize;

use northwind_reporting::{LineTag, Report, ReportLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Styled,
    Plain,
    Json,
}

impl OutputMode {
    /// Styled on a terminal, plain when stdout is redirected.
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            OutputMode::Styled
        } else {
            OutputMode::Plain
        }
    }
}

pub fn styled_line(line: &ReportLine) -> String {
    let text = line.text.as_str();
    match line.tag {
        LineTag::Heading => text.bold().cyan().to_string(),
        LineTag::Caption => text.bold().to_string(),
        LineTag::Warning => text.yellow().to_string(),
        LineTag::Chart => text.green().to_string(),
        LineTag::Text | LineTag::Item | LineTag::Blank => text.to_string(),
    }
}

/// Render `report` in `mode`, one trailing newline per line.
pub fn render(report: &Report, mode: OutputMode) -> anyhow::Result<String> {
    match mode {
        OutputMode::Json => {
            let mut json = serde_json::to_string_pretty(report)?;
            json.push('\n');
            Ok(json)
        }
        OutputMode::Plain => Ok(report.to_text()),
        OutputMode::Styled => {
            let mut out = String::new();
            for line in report.lines() {
                out.push_str(&styled_line(line));
                out.push('\n');
            }
            Ok(out)
        }
    }
}
