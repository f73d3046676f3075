//! BDD step definitions for the dispensing relay

use cucumber::{given, then, when};

use aquasense::api::DispensingRequest;
use aquasense::notification::NotificationKind;
use aquasense::relay::ActionOutcome;
use aquasense::view::{DispensingPrompt, View};

use crate::world::AquaSenseWorld;

#[given(expr = "a dispensing prompt for {string} is on screen")]
fn prompt_on_screen(world: &mut AquaSenseWorld, mineral: String) {
    world.view.show_dispensing_prompt(&DispensingPrompt {
        mineral,
        reason: "pH too low - Risk of fish stress".to_string(),
        timestamp: "10:16:00".to_string(),
        amount: Some("50ml".to_string()),
    });
}

#[given(expr = "the service answers dispensing actions with {string}")]
fn service_answers(world: &mut AquaSenseWorld, status: String) {
    let body = format!(r#"{{"status": "{}", "message": "answered {}"}}"#, status, status);
    *world.http.answer.lock().unwrap() = Some(body);
}

#[given("the service is unreachable")]
fn service_unreachable(world: &mut AquaSenseWorld) {
    *world.http.answer.lock().unwrap() = None;
}

#[when("the user approves the dispensing")]
async fn approve(world: &mut AquaSenseWorld) {
    world.action_result = Some(world.relay().approve_dispensing().await);
}

#[when("the user cancels the dispensing")]
async fn cancel(world: &mut AquaSenseWorld) {
    world.action_result = Some(world.relay().cancel_dispensing().await);
}

#[when(expr = "the user requests {string} because {string}")]
async fn request(world: &mut AquaSenseWorld, mineral: String, reason: String) {
    world.action_result = Some(world.relay().request_dispensing(&mineral, &reason).await);
}

#[then("the action should complete")]
fn action_completes(world: &mut AquaSenseWorld) {
    match world.action_result.as_ref().expect("no action taken") {
        Ok(outcome) => assert!(outcome.is_completed(), "got {:?}", outcome),
        Err(e) => panic!("action failed: {}", e),
    }
}

#[then("the action should be rejected")]
fn action_rejected(world: &mut AquaSenseWorld) {
    match world.action_result.as_ref().expect("no action taken") {
        Ok(ActionOutcome::Rejected { status, .. }) => assert_eq!(status, "error"),
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[then("the action should fail")]
fn action_fails(world: &mut AquaSenseWorld) {
    assert!(world
        .action_result
        .as_ref()
        .expect("no action taken")
        .is_err());
}

#[then("the dispensing prompt should still be shown")]
fn prompt_still_shown(world: &mut AquaSenseWorld) {
    assert!(world.view.snapshot().dispensing_prompt.is_some());
}

#[then(expr = "a {string} notification should read {string}")]
fn notification_reads(world: &mut AquaSenseWorld, kind: String, message: String) {
    let notifications = world.view.snapshot().notifications;
    assert_eq!(notifications.len(), 1);
    let expected_kind = match kind.as_str() {
        "success" => NotificationKind::Success,
        "info" => NotificationKind::Info,
        other => panic!("unknown notification kind {:?}", other),
    };
    assert_eq!(notifications[0].kind, expected_kind);
    assert_eq!(notifications[0].message, message);
}

#[then("no notification should be shown")]
fn no_notification(world: &mut AquaSenseWorld) {
    assert!(world.view.snapshot().notifications.is_empty());
}

#[then("no error should be reported")]
fn no_error(world: &mut AquaSenseWorld) {
    assert!(world.sink.operations.lock().unwrap().is_empty());
}

#[then(expr = "an error should be reported while {string}")]
fn error_reported(world: &mut AquaSenseWorld, operation: String) {
    assert_eq!(*world.sink.operations.lock().unwrap(), vec![operation]);
}

#[then(expr = "the service should have received a request for {string} because {string}")]
fn request_received(world: &mut AquaSenseWorld, mineral: String, reason: String) {
    let posts = world.http.posts.lock().unwrap();
    assert_eq!(posts.len(), 1);
    let (url, body) = &posts[0];
    assert!(url.ends_with("/api/request-dispensing"), "posted to {}", url);
    let sent: DispensingRequest =
        serde_json::from_str(body.as_deref().expect("request without body")).unwrap();
    assert_eq!(sent, DispensingRequest { mineral, reason });
}
