use clap::Parser;
use portal_core::{AppIdentity, PortalBroker, Result, Role, TransferContext, TransferKey, config};
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    // Load environment variables from .env file (RUST_LOG, PORTAL_TEST_* overrides)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            debug!("Failure category: {:?}", e.category());
            ExitCode::FAILURE
        }
    }
}

/// Debug output goes to stdout like the key itself; warnings and errors to stderr
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,portal_core=debug,portal_app=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let identity = AppIdentity::load(&cli.info_path);
    debug!("I am {}", identity.app_id().unwrap_or("(unknown)"));

    // A receiver without a key fails before touching the bus
    let receiver_key = match identity.role() {
        Role::Sender => None,
        Role::Receiver => Some(cli.receiver_key()?),
    };

    let broker = PortalBroker::connect().await?;
    let data_dir = config::data_dir()?;
    let ctx = TransferContext::new(broker, cli.transfer_config(), data_dir);

    match receiver_key {
        None => run_sender(&ctx).await,
        Some(key) => run_receiver(&ctx, &key).await,
    }
}

async fn run_sender(ctx: &TransferContext<PortalBroker>) -> Result<()> {
    let pending = ctx.start_transfer().await?;
    println!("{}", pending.key());

    let key = pending.wait_closed().await?;
    debug!("Transfer {} closed", key);
    Ok(())
}

async fn run_receiver(ctx: &TransferContext<PortalBroker>, key: &TransferKey) -> Result<()> {
    ctx.receive(key).await?;
    Ok(())
}
