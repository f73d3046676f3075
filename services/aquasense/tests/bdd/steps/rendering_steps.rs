//! BDD step definitions for dashboard rendering

use cucumber::{given, then, when};

use aquasense::api::{Alert, AlertType, CartridgeLevel, PendingDispensing};
use aquasense::render::CycleOutcome;
use aquasense::status::Parameter;
use aquasense::view::{AlertBanner, AlertList, View};

use crate::world::AquaSenseWorld;

fn parameter_by_label(label: &str) -> Parameter {
    Parameter::ALL
        .into_iter()
        .find(|p| p.label() == label)
        .unwrap_or_else(|| panic!("unknown parameter {:?}", label))
}

#[given("a dashboard with default thresholds")]
fn default_dashboard(world: &mut AquaSenseWorld) {
    world.renderer();
}

#[given(expr = "the service reports pH {float}")]
fn service_reports_ph(world: &mut AquaSenseWorld, ph: f64) {
    world.current_mut().data.ph = ph;
}

#[given(expr = "the service reports a {word} {string} alert {string} needing {string}")]
fn service_reports_alert(
    world: &mut AquaSenseWorld,
    severity: String,
    parameter: String,
    message: String,
    mineral: String,
) {
    let alert_type = match severity.as_str() {
        "critical" => AlertType::Critical,
        "warning" => AlertType::Warning,
        other => panic!("unknown alert type {:?}", other),
    };
    world.current_mut().alerts.push(Alert {
        alert_type,
        parameter,
        value: 6.2,
        message,
        recommendation: format!("Add {}", mineral),
        mineral_needed: mineral,
        timestamp: "10:15:00".to_string(),
    });
}

#[given(expr = "cartridge {string} at {float} percent")]
fn cartridge_at(world: &mut AquaSenseWorld, mineral: String, level: f64) {
    world.current_mut().cartridges.insert(
        mineral,
        CartridgeLevel {
            level,
            unit: Some("%".to_string()),
        },
    );
}

#[given(expr = "a pending dispensing of {string} because {string}")]
fn pending_dispensing(world: &mut AquaSenseWorld, mineral: String, reason: String) {
    world.current_mut().pending_dispensing = Some(PendingDispensing {
        mineral,
        reason,
        timestamp: "10:16:00".to_string(),
        amount: Some("50ml".to_string()),
    });
}

#[given(expr = "the alert banner shows {string}")]
fn banner_already_shown(world: &mut AquaSenseWorld, title: String) {
    world.view.show_alert_banner(&AlertBanner {
        title,
        message: "shown earlier".to_string(),
    });
}

#[when("the dashboard renders the current data")]
async fn render_current(world: &mut AquaSenseWorld) {
    let next = match world.cycle {
        Some(CycleOutcome::Applied { sequence }) => sequence + 1,
        Some(CycleOutcome::Stale { latest, .. }) => latest + 1,
        None => 1,
    };
    world.render(next).await;
}

#[when(expr = "response {int} is rendered")]
async fn render_response(world: &mut AquaSenseWorld, sequence: u64) {
    world.render(sequence).await;
}

#[when(expr = "the service now reports pH {float} and response {int} arrives late")]
async fn late_response(world: &mut AquaSenseWorld, ph: f64, sequence: u64) {
    world.current_mut().data.ph = ph;
    world.render(sequence).await;
}

#[when("the pending dispensing is resolved")]
fn pending_resolved(world: &mut AquaSenseWorld) {
    world.current_mut().pending_dispensing = None;
}

#[then(expr = "parameter {string} should show {string} as {string}")]
fn parameter_shows(world: &mut AquaSenseWorld, label: String, text: String, status: String) {
    let doc = world.view.snapshot();
    let display = &doc.parameters[&parameter_by_label(&label)];
    assert_eq!(display.text, text);
    assert_eq!(display.status.to_string(), status);
}

#[then(expr = "the alert banner should read {string} with {string}")]
fn banner_reads(world: &mut AquaSenseWorld, title: String, message: String) {
    let banner = world.view.snapshot().alert_banner.expect("no alert banner");
    assert_eq!(banner.title, title);
    assert_eq!(banner.message, message);
}

#[then(expr = "the alert banner title should be {string}")]
fn banner_title(world: &mut AquaSenseWorld, title: String) {
    let banner = world.view.snapshot().alert_banner.expect("no alert banner");
    assert_eq!(banner.title, title);
}

#[then("no alert banner should be shown")]
fn no_banner(world: &mut AquaSenseWorld) {
    assert!(world.view.snapshot().alert_banner.is_none());
}

#[then(expr = "the alert list should have {int} entries")]
fn alert_list_len(world: &mut AquaSenseWorld, count: usize) {
    match world.view.snapshot().alert_list {
        AlertList::Items(items) => assert_eq!(items.len(), count),
        AlertList::Empty { .. } => assert_eq!(count, 0),
    }
}

#[then(expr = "the alert list should say {string}")]
fn alert_list_message(world: &mut AquaSenseWorld, expected: String) {
    match world.view.snapshot().alert_list {
        AlertList::Empty { message } => assert_eq!(message, expected),
        AlertList::Items(items) => panic!("expected no alerts, got {}", items.len()),
    }
}

#[then(expr = "alert {int} should offer {string} for {string}")]
fn alert_offers(world: &mut AquaSenseWorld, index: usize, mineral: String, reason: String) {
    let AlertList::Items(items) = world.view.snapshot().alert_list else {
        panic!("alert list is empty");
    };
    let action = &items[index - 1].action;
    assert_eq!(action.mineral, mineral);
    assert_eq!(action.reason, reason);
}

#[then(expr = "cartridge {string} should be {string} wide with tier {string}")]
fn cartridge_shows(world: &mut AquaSenseWorld, mineral: String, width: String, tier: String) {
    let doc = world.view.snapshot();
    let bar = &doc.cartridges[&mineral];
    assert_eq!(bar.width, width);
    assert_eq!(format!("{:?}", bar.tier).to_lowercase(), tier);
}

#[then(expr = "the cartridge {string} should be labelled {string}")]
fn cartridge_label(world: &mut AquaSenseWorld, mineral: String, name: String) {
    assert_eq!(world.view.snapshot().cartridges[&mineral].name, name);
}

#[then(expr = "the dispensing prompt should show {string}")]
fn prompt_shows(world: &mut AquaSenseWorld, mineral: String) {
    let prompt = world
        .view
        .snapshot()
        .dispensing_prompt
        .expect("no dispensing prompt");
    assert_eq!(prompt.mineral, mineral);
}

#[then("no dispensing prompt should be shown")]
fn no_prompt(world: &mut AquaSenseWorld) {
    assert!(world.view.snapshot().dispensing_prompt.is_none());
}

#[then("the late response should be discarded")]
fn late_discarded(world: &mut AquaSenseWorld) {
    assert!(matches!(world.cycle, Some(CycleOutcome::Stale { .. })));
}

#[then("the last update time should be shown")]
fn last_updated_shown(world: &mut AquaSenseWorld) {
    let text = world.view.snapshot().last_updated.expect("no update time");
    assert!(text.starts_with("Last updated: "));
}
