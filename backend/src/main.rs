//! `recky` entry-point: loads the snapshot store, runs one command as the
//! signed-in user, and persists the store when the command changed it.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recky::config::{LogFormat, ReckySettings};
use recky::domain::UserId;
use recky::inbound::cli::{CliArgs, CliState, execute};
use recky::outbound::memory::InMemoryDocumentStore;
use recky::outbound::snapshot_file::{load_snapshot, save_snapshot};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let settings = ReckySettings::load_from_iter([OsString::from("recky")])
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    init_tracing(&settings);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args, &settings))
}

fn init_tracing(settings: &ReckySettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter()));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = match settings.log_format() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

async fn run(args: CliArgs, settings: &ReckySettings) -> Result<()> {
    let store_path = args
        .store_path
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| settings.store_path());
    let acting_as = args
        .acting_as
        .as_deref()
        .map(UserId::new)
        .transpose()
        .wrap_err("invalid --as uid")?;

    let snapshot = load_snapshot(&store_path)?;
    let store = Arc::new(InMemoryDocumentStore::from_snapshot(snapshot));
    let state = CliState::from_store(Arc::clone(&store), Arc::new(DefaultClock));

    let report = execute(&state, acting_as.as_ref(), &args.command).await?;

    if report.mutated {
        let snapshot = store.snapshot()?;
        save_snapshot(&store_path, &snapshot)?;
        info!(path = %store_path, command = args.command.name(), "store saved");
    }
    for line in &report.lines {
        println!("{line}");
    }
    Ok(())
}
