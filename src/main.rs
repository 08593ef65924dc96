use anyhow::Context;
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ssmcast::api::AwsCliApi;
use ssmcast::cli::{Cli, Commands};
use ssmcast::commands::ShellRunner;
use ssmcast::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.debug);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "[X]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Shell(args) => {
            let job = args.sources().resolve()?;

            let api = AwsCliApi::new(Some(cli.awsregion.clone()), cli.awsconf.clone());

            // Ctrl-C: 디스패치 전이면 중단, 이후면 폴링만 멈춘다 (원격 명령은 계속 실행됨)
            let cancel = CancellationToken::new();
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "failed to install Ctrl+C handler");
                    return;
                }
                interrupt.cancel();
            });

            let run = ShellRunner::new(&api)
                .with_max_wait(args.max_wait.map(Duration::from_secs))
                .run(&job, args.dry_run, &cancel)
                .await
                .context("shell command failed")?;

            Ok(run.succeeded())
        }
    }
}
