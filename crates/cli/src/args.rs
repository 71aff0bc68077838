use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};

use northwind_infra::{StoreConfig, StoreResult};
use northwind_reporting::charts::{DEFAULT_BIN_COUNT, DEFAULT_MAX_BAR_WIDTH};
use northwind_reporting::report::DEFAULT_TOP_CUSTOMERS;
use northwind_reporting::{ReportOptions, Selection};

use crate::output::OutputMode;

const MAX_BAR_WIDTH: u64 = 500;
const MAX_BIN_COUNT: u64 = 1_000;

#[derive(Debug, Parser)]
#[command(
    name = "northwind",
    version,
    about = "Statistics and text charts over a Northwind database",
    long_about = "Reads the Northwind tables (categories, products, orders, customers, employees, \
                  suppliers) and prints per-section statistics with text bar charts and histograms."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL (defaults to $NORTHWIND_DATABASE_URL, then sqlite://northwind.db)
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Connection pool size (defaults to $NORTHWIND_MAX_CONNECTIONS, then 1)
    #[arg(long, global = true, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_connections: Option<u32>,

    /// Report on the built-in sample dataset instead of a database
    #[arg(long, global = true)]
    pub demo: bool,

    /// Width of the longest chart bar
    #[arg(
        long,
        global = true,
        value_name = "N",
        default_value_t = DEFAULT_MAX_BAR_WIDTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BAR_WIDTH)
    )]
    pub bar_width: usize,

    /// Number of histogram bins
    #[arg(
        long,
        global = true,
        value_name = "N",
        default_value_t = DEFAULT_BIN_COUNT,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BIN_COUNT)
    )]
    pub bins: usize,

    /// Length of the top customers list
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_TOP_CUSTOMERS)]
    pub top: usize,

    /// Reference date for employee tenure (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Print without colours
    #[arg(long, global = true, conflicts_with = "json")]
    pub plain: bool,

    /// Print the structured report as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print statistics for one section (product, category, order, customer,
    /// employee, supplier) or all of them
    Stats {
        #[arg(default_value = "all")]
        section: Selection,
    },

    /// Interactive statistics menu
    Menu,

    /// Create the tables in the database and load the sample dataset
    Seed,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn store_config(&self) -> StoreResult<StoreConfig> {
        let mut config = StoreConfig::from_env()?;
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        Ok(config)
    }

    pub fn report_options(&self) -> ReportOptions {
        let mut options = match self.as_of {
            Some(date) => ReportOptions::new(date),
            None => ReportOptions::default(),
        };
        options.max_bar_width = self.bar_width;
        options.bin_count = self.bins;
        options.top_customers = self.top;
        options
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.plain {
            OutputMode::Plain
        } else {
            OutputMode::detect()
        }
    }
}
