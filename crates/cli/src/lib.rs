//! The `northwind` statistics shell.

pub mod args;
pub mod menu;
pub mod output;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;

use northwind_infra::{DataStore, InMemoryStore, SqliteStore, StoreError, sample_dataset};
use northwind_reporting::StatisticsReport;

pub use args::{Cli, Commands};
pub use output::OutputMode;

/// Process exit code for an error returned by [`run`].
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<StoreError>() {
        Some(StoreError::Config(_)) => 2,
        Some(_) => 3,
        None => 1,
    }
}

async fn open_store(cli: &Cli) -> anyhow::Result<Arc<dyn DataStore>> {
    if cli.demo {
        tracing::debug!("using the built-in sample dataset");
        let dataset = sample_dataset().context("building the sample dataset")?;
        return Ok(Arc::new(InMemoryStore::new(dataset)));
    }

    let config = cli.store_config()?;
    let store = SqliteStore::connect(&config)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    Ok(Arc::new(store))
}

async fn seed(cli: &Cli) -> anyhow::Result<()> {
    anyhow::ensure!(!cli.demo, "seed writes to a database; drop --demo");

    let mut config = cli.store_config()?;
    config.create_if_missing = true;

    let store = SqliteStore::connect(&config)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    store.ensure_schema().await.context("creating tables")?;
    store
        .load_dataset(&sample_dataset()?)
        .await
        .context("loading the sample dataset")?;
    store.close().await;

    println!("Loaded the sample dataset into {}", config.database_url);
    Ok(())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = cli.output_mode();

    match cli.command {
        Commands::Seed => seed(&cli).await,
        Commands::Stats { section } => {
            let report = StatisticsReport::new(open_store(&cli).await?, cli.report_options());
            let result = report.run(section).await?;

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output::render(&result, mode)?.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Commands::Menu => {
            let report = StatisticsReport::new(open_store(&cli).await?, cli.report_options());
            let stdin = std::io::stdin().lock();
            let mut stdout = std::io::stdout();
            menu::run(&report, stdin, &mut stdout, mode).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_error_kind() {
        let config = anyhow::Error::new(StoreError::Config("bad".into()));
        assert_eq!(exit_code(&config), 2);

        let store = anyhow::Error::new(StoreError::unavailable("down")).context("opening db");
        assert_eq!(exit_code(&store), 3);

        assert_eq!(exit_code(&anyhow::anyhow!("something else")), 1);
    }

    #[tokio::test]
    async fn demo_flag_uses_the_sample_dataset() {
        let cli = <Cli as clap::Parser>::try_parse_from(["northwind", "--demo", "stats"]).unwrap();
        let store = open_store(&cli).await.unwrap();

        let mut session = store.session().await.unwrap();
        assert_eq!(session.products().await.unwrap().len(), 10);
    }
}
