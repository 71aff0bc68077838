use clap::Parser;
use colored::Colorize;
use std::process;

use northwind_cli::{Cli, exit_code, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    northwind_observability::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {e:#}", "Error:".red().bold());
        process::exit(exit_code(&e));
    }
}
