//! AquaSense - Water-quality monitoring dashboard
//!
//! Polls a monitoring service for sensor readings, renders parameter status,
//! alerts, cartridge levels and a trend chart, and relays dispensing
//! approvals. Also ships a simulated monitoring service.

pub mod api;
pub mod chart;
pub mod config;
pub mod console;
pub mod error;
pub mod io;
pub mod notification;
pub mod relay;
pub mod render;
pub mod session;
pub mod simulator;
pub mod status;
pub mod view;

pub use config::{load_config, Config};
pub use error::{AquaSenseError, ErrorSink, Result, TracingErrorSink};
pub use session::{Session, SessionBuilder};

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::console::{ConsoleCommand, ConsoleView};
use crate::io::ReqwestHttpClient;
use crate::relay::ActionOutcome;
use crate::view::AlertList;

/// One-shot dispensing action issued from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Request { mineral: String, reason: String },
    Approve,
    Cancel,
}

/// Run the console dashboard until ctrl-c or `quit`
pub async fn run_watch(config: Config) -> Result<()> {
    let view = Arc::new(ConsoleView::new());
    let session = SessionBuilder::new(config)
        .with_http_client(Arc::new(ReqwestHttpClient::new()))
        .with_view(view.clone())
        .build()?;

    spawn_shutdown_handler(session.cancellation_token());
    session.start()?;
    tracing::info!(
        "Dashboard started; commands: approve, cancel, request <n>, dismiss, refresh, quit"
    );

    let cancel = session.cancellation_token();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match ConsoleCommand::parse(&line) {
                        Some(ConsoleCommand::Quit) => break,
                        Some(command) => handle_command(&session, &view, command).await,
                        None => tracing::warn!("Unknown command: {}", line.trim()),
                    }
                }
                Ok(None) => {
                    tracing::debug!("stdin closed; running until interrupted");
                    cancel.cancelled().await;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {}", e);
                    cancel.cancelled().await;
                    break;
                }
            },
            _ = cancel.cancelled() => break,
        }
    }

    session.stop().await;
    Ok(())
}

async fn handle_command(session: &Session, view: &ConsoleView, command: ConsoleCommand) {
    let relay = session.relay();
    // Failures and rejections are already logged by the relay
    match command {
        ConsoleCommand::Approve => {
            let _ = relay.approve_dispensing().await;
        }
        ConsoleCommand::Cancel => {
            let _ = relay.cancel_dispensing().await;
        }
        ConsoleCommand::Request(index) => {
            let action = match view.snapshot().alert_list {
                AlertList::Items(items) => items.get(index - 1).map(|item| item.action.clone()),
                AlertList::Empty { .. } => None,
            };
            match action {
                Some(action) => {
                    let _ = relay
                        .request_dispensing(&action.mineral, &action.reason)
                        .await;
                }
                None => tracing::warn!("No alert #{} on screen", index),
            }
        }
        ConsoleCommand::Dismiss => session.dismiss_alert_banner(),
        ConsoleCommand::Refresh => {
            let _ = session.fetch_current_data().await;
        }
        ConsoleCommand::Quit => {}
    }
}

/// Serve the simulated monitoring service until ctrl-c
pub async fn run_simulator(config: Config) -> Result<()> {
    let cancel = CancellationToken::new();
    spawn_shutdown_handler(cancel.clone());

    let handle = simulator::new_simulator_handle(config.simulator.seed);
    let listener = simulator::bind(config.simulator.port).await?;
    simulator::serve(listener, handle, cancel).await
}

/// Send one dispensing action and report the server's answer
pub async fn run_action(config: Config, action: Action) -> Result<ActionOutcome> {
    config.validate()?;
    let api = api::ApiClient::new(
        &config.server.base_url,
        Arc::new(ReqwestHttpClient::new()),
    );
    let response = match &action {
        Action::Request { mineral, reason } => {
            api.request_dispensing(&api::DispensingRequest {
                mineral: mineral.clone(),
                reason: reason.clone(),
            })
            .await?
        }
        Action::Approve => api.approve_dispensing().await?,
        Action::Cancel => api.cancel_dispensing().await?,
    };
    tracing::debug!("{:?} -> {:?}", action, response);
    Ok(ActionOutcome::from(response))
}

fn spawn_shutdown_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel.cancel();
    });
}
