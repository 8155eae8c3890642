use std::process::ExitCode;

use clap::Parser;

use asciify::cli::{self, CliArgs};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    log::info!("startup: asciify {}", env!("CARGO_PKG_VERSION"));
    cli::run(args).await
}
