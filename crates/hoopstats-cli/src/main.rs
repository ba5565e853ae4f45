//! Basketball game analysis terminal frontend.

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hoopstats_cli::args::{self, CliArgs, Command};
use hoopstats_cli::{render_report, AnalysisSession, SessionOutcome};
use hoopstats_client::{ApiClient, ClientConfig, UploadOptions};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli_args = match args::parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", args::USAGE);
            return;
        }
        Ok(Command::Run(cli_args)) => cli_args,
        Err(err) => {
            eprintln!("error: {err}\n");
            eprintln!("{}", args::USAGE);
            std::process::exit(2);
        }
    };

    // Initialize tracing with colored output for dev, JSON for production.
    // Logs go to stderr; stdout carries the report.
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("hoopstats=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting hoopstats");

    std::process::exit(match run(cli_args).await {
        Ok(()) => 0,
        Err(err) => {
            error!("{err:#}");
            1
        }
    });
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(api) = &args.api {
        config = config.with_base_url(api);
    }
    info!("Gateway: {}", config.base_url);
    let client = ApiClient::new(config).context("creating API client")?;

    // Setup signal handler
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        cancel_tx.send(true).ok();
    });

    let options = UploadOptions {
        compress: args.compress,
        quality: args.quality,
        max_height: args.max_height,
    };

    let session = AnalysisSession::new(client, options)
        .with_cancel(cancel_rx)
        .with_progress(|progress| {
            eprintln!("[{:>3}%] {}", progress.progress, progress.message);
        });

    match session.run(&args.video).await {
        SessionOutcome::Completed(output) => {
            print!("{}", render_report(&output.game));

            if let Some(path) = &args.json {
                let json = serde_json::to_string_pretty(&output.game)?;
                tokio::fs::write(path, json)
                    .await
                    .with_context(|| format!("writing game data to {}", path.display()))?;
                info!("Wrote game data to {}", path.display());
            }

            if let Some(path) = &args.download {
                session
                    .client()
                    .save_processed(&output.job_id, path)
                    .await
                    .with_context(|| {
                        format!("downloading processed video to {}", path.display())
                    })?;
            }

            Ok(())
        }
        SessionOutcome::Failed { message } => anyhow::bail!(message),
        SessionOutcome::Cancelled => anyhow::bail!("analysis cancelled"),
    }
}
