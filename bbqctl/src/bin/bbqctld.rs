//! Smoker controller daemon.
//!
//! Runs the sampling loop against the simulated smoker and serves the
//! HTTP API until interrupted.

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use bbqctl::api::{self, SharedState};
use bbqctl::api_client::types::ControllerState;
use bbqctl::config::DaemonConfig;
use bbqctl::control::{Controller, SharedSettings};
use bbqctl::fan::LogFan;
use bbqctl::sampler::Sampler;
use bbqctl::source::SimulatedSmoker;
use bbqctl::tracing::{self as logging, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_journald_or_stdout();

    let config = DaemonConfig::from_env().context("reading BBQ_* configuration")?;
    let session_id = rand::random::<u32>();
    info!(
        session_id,
        api_addr = %config.api_addr,
        threshold_f = config.initial_settings.threshold_f,
        "Starting smoker controller"
    );

    let settings = SharedSettings::new(config.initial_settings);
    let controller: Controller = Controller::new(config.probe, settings.clone());
    let (state_tx, state_rx) = watch::channel(ControllerState::new(session_id));

    let source = SimulatedSmoker::new(config.probe, state_rx.clone());
    let sampler = Sampler::new(controller, source, LogFan::new(), config.timing, state_tx);

    let cancellation = CancellationToken::new();
    let sampler_task = tokio::spawn(sampler.run(cancellation.clone()));
    let mut server_task = tokio::spawn(api::serve(
        config.api_addr,
        SharedState { settings, state_rx },
        cancellation.clone(),
    ));

    let server_result = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("waiting for Ctrl-C")?;
            info!("Shutdown requested");
            None
        }
        result = &mut server_task => Some(result),
    };

    cancellation.cancel();
    let server_result = match server_result {
        Some(result) => result,
        None => server_task.await,
    };
    sampler_task.await.context("sampler task panicked")?;
    server_result
        .context("API server task panicked")?
        .context("API server failed")?;

    info!("Exiting");
    Ok(())
}
