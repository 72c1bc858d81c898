use std::future::Future;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pickup_orders::api::ApiClient;
use pickup_orders::cli::{Cli, Command};
use pickup_orders::config::PickupConfig;
use pickup_orders::controller::{JobOrderSession, Outcome, available_jobs, driver_jobs};
use pickup_orders::session::SessionContext;
use pickup_orders::ui::{Spinner, Terminal};

/// Exit code when an action was refused by policy.
const EXIT_REJECTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let term = Terminal::new(cli.json);
    match run(cli, &term).await {
        Ok(code) => code,
        Err(e) => {
            term.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pickup_orders=debug,pickup=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, term: &Terminal) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => PickupConfig::load_from(path)?,
        None => PickupConfig::load()?,
    };
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let client = ApiClient::new(
        &config.api_base_url,
        config.connect_timeout(),
        config.request_timeout(),
    )?;
    let session = config.session();
    let degrade = config.degrade_on_server_rejection;

    match cli.command {
        Command::Jobs { available } => {
            let jobs = if available {
                spin("Fetching available jobs", available_jobs(&client, &session)).await?
            } else {
                spin("Fetching your jobs", driver_jobs(&client, &session)).await?
            };
            term.jobs(&jobs);
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { job_id } => {
            let job = open(&client, &session, &job_id, degrade).await?;
            term.record(job.record());
            Ok(ExitCode::SUCCESS)
        }
        Command::Accept { job_id } => {
            let mut job = open(&client, &session, &job_id, degrade).await?;
            let outcome = spin(&format!("Accepting {job_id}"), job.accept()).await?;
            Ok(report(term, &outcome))
        }
        Command::Continue { job_id } => {
            let job = open(&client, &session, &job_id, degrade).await?;
            Ok(report(term, &job.continue_job()))
        }
        Command::Arrive { job_id } => {
            let mut job = open(&client, &session, &job_id, degrade).await?;
            let outcome = spin(&format!("Reporting arrival at {job_id}"), job.arrive()).await?;
            Ok(report(term, &outcome))
        }
        Command::Proof { job_id, url } => {
            let mut job = open(&client, &session, &job_id, degrade).await?;
            let outcome = spin("Uploading proof photo", job.attach_proof(&url)).await?;
            Ok(report(term, &outcome))
        }
        Command::Complete { job_id, proof_url } => {
            let mut job = open(&client, &session, &job_id, degrade).await?;
            if let Some(url) = proof_url {
                let outcome = spin("Uploading proof photo", job.attach_proof(&url)).await?;
                if matches!(outcome, Outcome::Rejected(_)) {
                    return Ok(report(term, &outcome));
                }
            }
            let outcome = spin(&format!("Completing {job_id}"), job.complete()).await?;
            Ok(report(term, &outcome))
        }
        Command::Cancel { job_id } => {
            let mut job = open(&client, &session, &job_id, degrade).await?;
            let outcome = spin(&format!("Cancelling {job_id}"), job.cancel()).await?;
            Ok(report(term, &outcome))
        }
    }
}

async fn open<'a>(
    client: &'a ApiClient,
    session: &'a SessionContext,
    job_id: &str,
    degrade: bool,
) -> Result<JobOrderSession<'a, ApiClient>> {
    let job = spin(
        &format!("Loading {job_id}"),
        JobOrderSession::open(client, session, job_id),
    )
    .await?;
    Ok(job.degrade_on_server_rejection(degrade))
}

/// Run one request with a spinner on screen.
async fn spin<T>(message: &str, request: impl Future<Output = T>) -> T {
    let spinner = Spinner::start(message);
    let result = request.await;
    spinner.finish();
    result
}

fn report(term: &Terminal, outcome: &Outcome) -> ExitCode {
    term.outcome(outcome);
    match outcome {
        Outcome::Rejected(_) => ExitCode::from(EXIT_REJECTED),
        _ => ExitCode::SUCCESS,
    }
}
