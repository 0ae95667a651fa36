//! # Verifier CLI
//!
//! Runs the licence and credential presentation flows from a terminal
//! against the `vcservice` backend.

mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use credibil_verify::Verifier;
use credibil_verify::client::HttpBackend;
use credibil_verify::flow::FlowStatus;
use credibil_verify::poller::PollConfig;
use credibil_verify::provider::Backend;
use credibil_verify::redirect::extract_redirect_result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Base URL of the backend proxy.
    #[arg(long, default_value = "http://localhost:8080")]
    backend: String,

    /// Delay between presentation status checks.
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,

    /// Status checks before giving up on a presentation.
    #[arg(long, default_value_t = 300)]
    max_attempts: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the licence flow followed by the credential flow (default).
    Run,

    /// Exchange the response code in a wallet return address and print the
    /// raw licence result.
    Result {
        /// Address the wallet returned to, including `#response_code=...`.
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    let backend = HttpBackend::new(&cli.backend)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config = PollConfig {
                interval: Duration::from_millis(cli.poll_interval_ms),
                max_attempts: Some(cli.max_attempts),
            };
            run(Verifier::new(backend).with_poll_config(config)).await
        }
        Command::Result { url } => {
            let Some(code) = extract_redirect_result(&url) else {
                bail!("no response_code in {url}");
            };
            let result = backend.exchange_licence_code(&code).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

async fn run(page: Verifier<HttpBackend>) -> Result<()> {
    let page = Arc::new(page);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    page.start_licence_flow().await?;
    print!("{}", render::view(&page.view()));

    println!("Paste the address the wallet returned to:");
    let Some(returned) = lines.next_line().await? else {
        bail!("no address entered");
    };
    if !page.load(returned.trim()).await? {
        bail!("no response_code in {returned}");
    }
    print!("{}", render::view(&page.view()));

    // run the credential flow, showing the wallet link once it is ready
    tracing::info!("starting credential flow");
    let mut flow = {
        let page = Arc::clone(&page);
        tokio::spawn(async move { page.start_credential_flow().await })
    };
    let mut shown = false;
    let mut ticker = tokio::time::interval(Duration::from_millis(200));

    loop {
        tokio::select! {
            finished = &mut flow => {
                finished??;
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                page.reset();
                tracing::info!(status = ?page.status(), "flow reset on interrupt");
                println!("Reset");
                return Ok(());
            }
            _ = ticker.tick(), if !shown => {
                if page.status() == FlowStatus::CredentialWaiting {
                    print!("{}", render::view(&page.view()));
                    shown = true;
                }
            }
        }
    }

    print!("{}", render::view(&page.view()));
    Ok(())
}
