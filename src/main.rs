// src/main.rs

use std::process::ExitCode;

use treewatch::{cli, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("treewatch: {err:#}");
        return ExitCode::FAILURE;
    }

    match treewatch::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "treewatch stopped");
            eprintln!("treewatch: {err:#}");
            ExitCode::FAILURE
        }
    }
}
