//! Interactive statistics menu.

use std::io::{BufRead, Write};

use colored::Colorize;

use northwind_infra::DataStore;
use northwind_reporting::{Section, Selection, StatisticsReport};

use crate::output::{OutputMode, render};

const RULE: &str = "========================================";
const THIN_RULE: &str = "----------------------------------------";

fn menu_lines() -> Vec<String> {
    let mut lines = vec![
        RULE.to_string(),
        "           Statistics Menu".to_string(),
        RULE.to_string(),
        " 0) Show all statistics".to_string(),
    ];
    for section in Section::ALL {
        lines.push(format!(" {}) {}", section.menu_number(), section.title()));
    }
    lines.push(" [Enter] to return".to_string());
    lines.push(THIN_RULE.to_string());
    lines
}

fn write_menu<W: Write>(out: &mut W, mode: OutputMode) -> std::io::Result<()> {
    for line in menu_lines() {
        if mode == OutputMode::Styled {
            writeln!(out, "{}", line.magenta())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()
}

/// Show the menu until the operator enters an empty line or input ends.
///
/// A failing section is reported and the menu is shown again; the error does
/// not end the session.
pub async fn run<S, R, W>(
    report: &StatisticsReport<S>,
    input: R,
    out: &mut W,
    mode: OutputMode,
) -> anyhow::Result<()>
where
    S: DataStore,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write_menu(out, mode)?;

        let choice = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        if choice.trim().is_empty() {
            return Ok(());
        }

        let Some(selection) = Selection::from_menu_choice(&choice) else {
            writeln!(out, "Invalid option. Please try again.")?;
            continue;
        };

        match report.run(selection).await {
            Ok(result) => write!(out, "{}", render(&result, mode)?)?,
            Err(e) => {
                tracing::error!(error = %e, ?selection, "statistics section failed");
                if mode == OutputMode::Styled {
                    writeln!(out, "{} {e}", "Error:".red().bold())?;
                } else {
                    writeln!(out, "Error: {e}")?;
                }
            }
        }
        writeln!(out)?;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::NaiveDate;
    use northwind_infra::{InMemoryStore, sample_dataset};
    use northwind_reporting::ReportOptions;

    use super::*;

    fn options() -> ReportOptions {
        ReportOptions::new(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
    }

    async fn session(store: InMemoryStore, keys: &str) -> String {
        let report = StatisticsReport::new(store, options());
        let mut out = Vec::new();
        run(&report, Cursor::new(keys.to_string()), &mut out, OutputMode::Plain)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn menu_runs_choices_until_enter() {
        let store = InMemoryStore::new(sample_dataset().unwrap());
        let out = session(store, "2\n9\n\n6\n").await;

        assert!(out.contains(" 6) Supplier Statistics"));
        assert!(out.contains("[Category Statistics]"));
        assert!(out.contains("Invalid option. Please try again."));
        // The empty line ends the menu before "6" is read.
        assert!(!out.contains("[Supplier Statistics]"));
        assert_eq!(out.matches("Statistics Menu").count(), 3);
    }

    #[tokio::test]
    async fn menu_ends_at_end_of_input() {
        let out = session(InMemoryStore::new(sample_dataset().unwrap()), "0\n").await;
        assert!(out.contains("[Product Statistics]"));
        assert!(out.contains("[Supplier Statistics]"));
    }

    #[tokio::test]
    async fn store_failures_are_shown_and_the_menu_continues() {
        let out = session(InMemoryStore::unavailable(), "1\n\n").await;
        assert!(out.contains("Error: data store unavailable"));
        assert_eq!(out.matches("Statistics Menu").count(), 2);
    }
}
