//! Session: owns the poll timer, chart and sequencing for one dashboard

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::config::{Config, PollingConfig};
use crate::error::{ErrorSink, TracingErrorSink};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notification::NotificationCenter;
use crate::relay::DispensingRelay;
use crate::render::{CycleOutcome, Renderer};
use crate::view::{MemoryView, View};

/// Builder for a [`Session`] with injectable collaborators
pub struct SessionBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    view: Option<Arc<dyn View>>,
    sink: Option<Arc<dyn ErrorSink>>,
    cancel: Option<CancellationToken>,
}

impl SessionBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            view: None,
            sink: None,
            cancel: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_view(mut self, view: Arc<dyn View>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> crate::Result<Arc<Session>> {
        self.config.validate()?;

        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let view = self.view.unwrap_or_else(|| Arc::new(MemoryView::new()));
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingErrorSink));
        let cancel = self.cancel.unwrap_or_default();

        let api = ApiClient::new(&self.config.server.base_url, http);
        let renderer = Arc::new(Renderer::new(
            Arc::clone(&view),
            self.config.thresholds.clone(),
        ));
        let notifications = Arc::new(NotificationCenter::new(
            Arc::clone(&view),
            Duration::from_millis(self.config.notifications.display_ms),
            cancel.child_token(),
        ));
        let relay = DispensingRelay::new(api.clone(), view, notifications, Arc::clone(&sink));

        Ok(Arc::new(Session {
            api,
            renderer,
            relay,
            sink,
            polling: self.config.polling,
            sequence: AtomicU64::new(0),
            cancel,
            task: Mutex::new(None),
        }))
    }
}

/// One running dashboard.
///
/// `start` fetches once immediately and then on every poll interval until
/// `stop` is called. Every tick's fetch runs as its own task, so a hung
/// request only holds up its own cycle.
#[derive(Debug)]
pub struct Session {
    api: ApiClient,
    renderer: Arc<Renderer>,
    relay: DispensingRelay,
    sink: Arc<dyn ErrorSink>,
    polling: PollingConfig,
    sequence: AtomicU64,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub fn relay(&self) -> &DispensingRelay {
        &self.relay
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn view(&self) -> &Arc<dyn View> {
        self.renderer.view()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.lock_task().is_some() && !self.cancel.is_cancelled()
    }

    /// Spawn the poll loop
    pub fn start(self: &Arc<Self>) -> crate::Result<()> {
        if self.cancel.is_cancelled() {
            return Err(crate::AquaSenseError::Session(
                "session has been stopped".to_string(),
            ));
        }
        let mut task = self.lock_task();
        if task.is_some() {
            tracing::warn!("Session already started");
            return Ok(());
        }

        tracing::info!(
            "Polling {} every {}s",
            self.api.base_url(),
            self.polling.interval_seconds
        );
        let session = Arc::clone(self);
        *task = Some(tokio::spawn(async move { session.poll_loop().await }));
        Ok(())
    }

    /// Cancel polling, in-flight requests and pending notification removals
    pub async fn stop(&self) {
        self.cancel.cancel();
        let handle = self.lock_task().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        tracing::info!("Session stopped");
    }

    /// Wait until the cancellation token fires, then stop
    pub async fn run_until_cancelled(&self) {
        self.cancel.cancelled().await;
        self.stop().await;
    }

    /// Fetch current conditions and render them.
    ///
    /// Failures go to the error sink and leave the display untouched.
    pub async fn fetch_current_data(&self) -> crate::Result<CycleOutcome> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        match self.api.current_data().await {
            Ok(current) => Ok(self.renderer.apply_current(sequence, &current).await),
            Err(e) => {
                self.sink.report("fetching current data", &e);
                Err(e)
            }
        }
    }

    /// Fetch the history and replace the chart, returning the point count
    pub async fn fetch_historical_data(&self) -> crate::Result<usize> {
        match self.api.historical_data().await {
            Ok(points) => {
                self.renderer.replace_history(&points).await;
                Ok(points.len())
            }
            Err(e) => {
                self.sink.report("fetching historical data", &e);
                Err(e)
            }
        }
    }

    /// Hide the alert banner until the next critical alert
    pub fn dismiss_alert_banner(&self) {
        let view = self.view();
        view.hide_alert_banner();
        view.commit();
    }

    async fn poll_loop(self: Arc<Self>) {
        if self.polling.load_history_on_start {
            self.spawn_cancellable(|session| async move {
                let _ = session.fetch_historical_data().await;
            });
        }

        let mut ticker = tokio::time::interval(Duration::from_secs(self.polling.interval_seconds));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.spawn_cancellable(|session| async move {
                        let _ = session.fetch_current_data().await;
                    });
                }
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    fn spawn_cancellable<F, Fut>(self: &Arc<Self>, f: F)
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let work = f(Arc::clone(self));
        tokio::spawn(async move {
            tokio::select! {
                _ = work => {}
                _ = cancel.cancelled() => {}
            }
        });
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|e| e.into_inner())
    }
}
