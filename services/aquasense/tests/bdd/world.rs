//! BDD test world for the aquasense dashboard

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cucumber::World;
use tokio_util::sync::CancellationToken;

use aquasense::api::{ApiClient, CurrentData, Reading};
use aquasense::config::ThresholdConfig;
use aquasense::io::{HttpClient, HttpResponse};
use aquasense::notification::NotificationCenter;
use aquasense::relay::{ActionOutcome, DispensingRelay};
use aquasense::render::{CycleOutcome, Renderer};
use aquasense::status::{Band, CartridgeTier, Status};
use aquasense::view::MemoryView;
use aquasense::{AquaSenseError, ErrorSink};

/// HTTP client that answers every POST with a fixed body and records it
#[derive(Debug, Default)]
pub struct StubHttpClient {
    pub answer: Mutex<Option<String>>,
    pub posts: Mutex<Vec<(String, Option<String>)>>,
}

#[async_trait]
impl HttpClient for StubHttpClient {
    async fn get(&self, url: &str) -> aquasense::Result<HttpResponse> {
        Err(AquaSenseError::Http(format!("unexpected GET {}", url)))
    }

    async fn post_json(&self, url: &str, body: Option<String>) -> aquasense::Result<HttpResponse> {
        self.posts.lock().unwrap().push((url.to_string(), body));
        match self.answer.lock().unwrap().clone() {
            Some(body) => Ok(HttpResponse { status: 200, body }),
            None => Err(AquaSenseError::Http("connection refused".to_string())),
        }
    }
}

/// Error sink that keeps the operation name of every report
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub operations: Mutex<Vec<String>>,
}

impl ErrorSink for RecordingSink {
    fn report(&self, operation: &str, _error: &AquaSenseError) {
        self.operations.lock().unwrap().push(operation.to_string());
    }
}

#[derive(Debug, Default, World)]
pub struct AquaSenseWorld {
    // Classification
    pub band: Option<Band>,
    pub status: Option<Status>,
    pub tier: Option<CartridgeTier>,

    // Rendering
    pub view: Arc<MemoryView>,
    pub renderer: Option<Renderer>,
    pub current: Option<CurrentData>,
    pub cycle: Option<CycleOutcome>,

    // Dispensing
    pub http: Arc<StubHttpClient>,
    pub sink: Arc<RecordingSink>,
    pub action_result: Option<aquasense::Result<ActionOutcome>>,
}

impl AquaSenseWorld {
    /// Current-data body being assembled, starting from healthy readings
    pub fn current_mut(&mut self) -> &mut CurrentData {
        self.current.get_or_insert_with(|| CurrentData {
            data: Reading {
                ph: 7.2,
                dissolved_oxygen: 6.5,
                ammonia: 0.3,
                temperature: 24.5,
                mineral_content: 85.0,
            },
            alerts: Vec::new(),
            cartridges: BTreeMap::new(),
            pending_dispensing: None,
        })
    }

    pub fn renderer(&mut self) -> &Renderer {
        let view = Arc::clone(&self.view);
        self.renderer
            .get_or_insert_with(|| Renderer::new(view, ThresholdConfig::default()))
    }

    /// Render the assembled body as response number `sequence`
    pub async fn render(&mut self, sequence: u64) -> CycleOutcome {
        let current = self.current_mut().clone();
        let outcome = self.renderer().apply_current(sequence, &current).await;
        self.cycle = Some(outcome);
        outcome
    }

    pub fn relay(&self) -> DispensingRelay {
        let notifications = Arc::new(NotificationCenter::new(
            self.view.clone(),
            Duration::from_millis(3000),
            CancellationToken::new(),
        ));
        DispensingRelay::new(
            ApiClient::new("http://aquasense.test:5000", self.http.clone()),
            self.view.clone(),
            notifications,
            self.sink.clone(),
        )
    }
}
