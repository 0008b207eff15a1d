use clap::Parser;
use datalake_client::cli::Cli;
use datalake_client::progress::BarProgress;
use datalake_client::{QueryClient, Result, RunOutcome, ToExitCode, logging};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.logging()) {
        eprintln!("{e}");
        return ExitCode::from(e.exit_code());
    }

    match run(&cli).await {
        Ok(RunOutcome::Downloaded {
            path,
            bytes,
            attempts,
        }) => {
            info!(path = %path.display(), bytes, attempts, "query result downloaded");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::NoHandle) => {
            warn!("query was not accepted by the service, nothing downloaded");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, code = e.error_code(), "datalake client failed");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<RunOutcome> {
    // Both validations run before any request is sent
    let spec = cli.query_spec()?;
    let config = cli.client_config()?;

    let mut client = QueryClient::new(config)?;
    if !cli.no_progress {
        client = client.with_progress(Arc::new(BarProgress::new()));
    }

    client.run(&spec).await
}
