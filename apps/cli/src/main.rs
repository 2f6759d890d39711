//! `compras` entry point.

use std::process::ExitCode;

use clap::Parser;

use compras_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    compras_cli::init_tracing();

    let cli = Cli::parse();

    match compras_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.code.exit_code())
        }
    }
}
