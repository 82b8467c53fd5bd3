//! Flight-Booker main entry point
//!
//! This is the command-line interface for the Flight-Booker booking runner.

use anyhow::Context;
use clap::Parser;
use flight_booker::config::{load_config_with_hash, BookingConfig, PaymentConfig};
use flight_booker::page::{selectors, ChromiumDriver, DriverCall, ScriptedDriver};
use flight_booker::window::REFERENCE_TIMEZONE;
use flight_booker::{BookingError, TimeWindowMatcher, TripLeg, WorkflowSequencer, WorkflowStage};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Flight-Booker: an unattended round-trip booking runner
///
/// Flight-Booker opens the booking site, picks the outbound and return flights
/// departing within an hour of the expected times, and fills passenger,
/// contact and payment details. The payment is left for you to submit.
#[derive(Parser, Debug)]
#[command(name = "flight-booker")]
#[command(version = "1.0.0")]
#[command(about = "An unattended round-trip booking runner", long_about = None)]
struct Cli {
    /// Path to TOML booking file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the booking file and print the interactions without opening a browser
    #[arg(long)]
    dry_run: bool,

    /// Run the browser without a window (overrides the booking file)
    #[arg(long, conflicts_with = "dry_run")]
    headless: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!("Loading booking file from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Booking file loaded successfully (hash: {})", hash);

    if cli.headless {
        config.browser.headless = true;
    }

    if cli.dry_run {
        handle_dry_run(&config).await
    } else {
        handle_booking(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("flight_booker=info,warn"),
            1 => EnvFilter::new("flight_booker=debug,info"),
            2 => EnvFilter::new("flight_booker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: prints the plan and rehearses it against a scripted page
///
/// The rehearsal serves one listing on each results page at exactly the
/// expected time, so every stage runs and the full interaction list is shown.
async fn handle_dry_run(config: &BookingConfig) -> anyhow::Result<()> {
    let matcher = TimeWindowMatcher::new(&config.trip);

    println!("=== Flight-Booker Dry Run ===\n");

    println!("Gateway:");
    println!("  URL: {}", config.gateway.url);
    println!("  Origin: {}", config.gateway.origin);

    println!("\nTime windows ({}, exclusive):", REFERENCE_TIMEZONE);
    for leg in [TripLeg::Outbound, TripLeg::Return] {
        let window = matcher.window(leg);
        println!("  {:<9} {} .. {}", leg.label(), window.start(), window.end());
    }

    println!("\nPassengers ({}):", config.passengers.len());
    for p in &config.passengers {
        println!(
            "  [{}] {} {} ({}, born {})",
            p.index, p.surname, p.given_name, p.sex, p.birth_date
        );
    }

    println!("\nContact: {} / {}", config.contact.mobile, config.contact.email);
    if let Some(card) = config.payment.card_type() {
        println!(
            "Payment: {} {} exp {}/{}",
            card,
            config.payment.masked_number(),
            config.payment.expiry_month,
            config.payment.expiry_year
        );
    }

    let driver = ScriptedDriver::new()
        .with_listing([Some(config.trip.expected_departure.to_rfc3339())])
        .with_listing([Some(config.trip.expected_arrival.to_rfc3339())]);
    let report = WorkflowSequencer::new(config, &driver)
        .run()
        .await
        .context("Rehearsal failed")?;

    let calls = driver.calls();
    println!("\nInteractions ({}):", calls.len());
    for (i, call) in calls.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, redact(call, &config.payment));
    }

    println!("\n✓ Booking file is valid");
    println!("✓ Rehearsal completed {} stages", report.stages.len());

    Ok(())
}

/// Hides card number and CVV in printed interactions
fn redact(call: &DriverCall, payment: &PaymentConfig) -> String {
    match call {
        DriverCall::TypeText { selector, .. } if selector == selectors::CARD_NUMBER_INPUT => {
            DriverCall::TypeText {
                selector: selector.clone(),
                text: payment.masked_number(),
            }
            .to_string()
        }
        DriverCall::TypeText { selector, .. } if selector == selectors::CARD_CVV_INPUT => {
            DriverCall::TypeText {
                selector: selector.clone(),
                text: "***".to_string(),
            }
            .to_string()
        }
        other => other.to_string(),
    }
}

const SHUTDOWN_MESSAGE: &str = "Gracefully shutting down from SIGINT (Ctrl-C)";

/// Races `work` against `interrupt`
///
/// Whichever finishes first wins; an interrupt drops `work` at its current
/// await point and yields [`BookingError::Interrupted`].
async fn interruptible<T, E, W, I>(work: W, interrupt: I) -> flight_booker::Result<T>
where
    W: Future<Output = Result<T, E>>,
    E: Into<BookingError>,
    I: Future,
{
    tokio::select! {
        result = work => result.map_err(Into::into),
        _ = interrupt => Err(BookingError::Interrupted),
    }
}

/// Handles the booking run against a real browser
///
/// Ctrl-C stops the run immediately; partially filled pages are left as they
/// are. After a successful run a visible browser stays open until Ctrl-C so
/// the payment can be reviewed and submitted by hand.
async fn handle_booking(config: BookingConfig) -> anyhow::Result<()> {
    tracing::info!(
        "Booking {} passengers from {}",
        config.passengers.len(),
        config.gateway.origin
    );

    let driver = match interruptible(
        ChromiumDriver::launch(&config.browser),
        tokio::signal::ctrl_c(),
    )
    .await
    {
        Ok(driver) => driver,
        Err(BookingError::Interrupted) => {
            tracing::info!("{}", SHUTDOWN_MESSAGE);
            return Ok(());
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to start the browser")),
    };

    let outcome = {
        let sequencer = WorkflowSequencer::new(&config, &driver);
        interruptible(sequencer.run(), tokio::signal::ctrl_c()).await
    };

    match outcome {
        Ok(report) => {
            tracing::info!(
                "Completed {} stages; payment details are filled but not submitted",
                report.stages.len()
            );
            if !config.browser.headless {
                tracing::info!("Review and submit the payment in the browser, then press Ctrl-C to exit");
                tokio::signal::ctrl_c()
                    .await
                    .context("Failed to listen for Ctrl-C")?;
                tracing::info!("{}", SHUTDOWN_MESSAGE);
            }
            driver.close().await.context("Failed to close the browser")?;
            Ok(())
        }
        Err(BookingError::Interrupted) => {
            tracing::info!("{}", SHUTDOWN_MESSAGE);
            Ok(())
        }
        Err(e) => {
            if let Some(stage) = e.stage() {
                tracing::error!(
                    "Booking aborted at stage {} ({}/{})",
                    stage,
                    stage.ordinal(),
                    WorkflowStage::COUNT
                );
            }
            Err(e.into())
        }
    }
}
