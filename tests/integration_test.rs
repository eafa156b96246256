//! Integration tests against a mock switcher using wiremock.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use tokio::runtime::Handle;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

use switchpanel::app::{App, InputResult, handle_key};
use switchpanel::client::{ClientError, SwitcherClient};
use switchpanel::config::PanelConfig;
use switchpanel::controller::PanelController;
use switchpanel::dispatch::{Command, CommandDispatcher};
use switchpanel::layout::{RenderTarget, TargetRegistry};
use switchpanel::log_viewer::LogViewer;
use switchpanel::model::{AppView, AutoSwitchAction, PanelBody, PanelSource, SwitchRequest};

fn status_body(current: &str, paused: bool) -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "current_server": current,
            "error_count": 0,
            "auto_switch_paused": paused,
            "available_servers": ["A", "B"],
            "down_stats": {},
            "uptime": "5m 0s"
        }
    })
}

async fn mount_status(server: &MockServer, current: &str, paused: bool, times: u64) {
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body(current, paused)))
        .expect(times)
        .mount(server)
        .await;
}

fn controller_for(server: &MockServer) -> PanelController {
    let config = PanelConfig {
        base_url: server.uri(),
        ..PanelConfig::default()
    };
    let client = SwitcherClient::new(&config.base_url).unwrap();
    PanelController::new(client, Handle::current(), &config, TargetRegistry::full())
}

/// Poll `check` until it reports true or two seconds pass.
async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

// --- client ---

#[tokio::test]
async fn test_status_success() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", false, 1).await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    let snapshot = client.status().await.unwrap();

    assert_eq!(snapshot.current_server(), Some("A"));
    assert_eq!(snapshot.available_servers, vec!["A", "B"]);
    assert_eq!(snapshot.uptime.as_deref(), Some("5m 0s"));
}

#[tokio::test]
async fn test_status_reported_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "switcher not ready"
        })))
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    let err = client.status().await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(err.to_string(), "switcher not ready");
}

#[tokio::test]
async fn test_status_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    let err = client.status().await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_switch_sends_tagged_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/switch"))
        .and(body_json(json!({"type": "avoid", "avoid_server": "A"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/switch"))
        .and(body_json(json!({"type": "select", "target_server": "B"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "server B is down"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    client
        .switch(&SwitchRequest::Avoid { avoid_server: "A".into() })
        .await
        .unwrap();
    let err = client
        .switch(&SwitchRequest::Select { target_server: "B".into() })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "server B is down");
}

#[tokio::test]
async fn test_auto_switch_and_update() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auto-switch"))
        .and(body_json(json!({"action": "pause"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/update"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    client.set_auto_switch(AutoSwitchAction::Pause).await.unwrap();
    client.trigger_update().await.unwrap();
}

#[tokio::test]
async fn test_text_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first\nsecond\n"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    assert_eq!(client.logs().await.unwrap(), "first\nsecond\n");

    let err = client.ping_report().await.unwrap_err();
    assert!(matches!(err, ClientError::Status(s) if s.as_u16() == 503));
}

// --- dispatcher ---

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dispatcher_runs_one_command_at_a_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/update"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    let mut dispatcher = CommandDispatcher::new(client, Handle::current());

    assert!(dispatcher.dispatch(Command::CheckUpdates));
    assert!(!dispatcher.dispatch(Command::CheckUpdates));

    let mut completion = None;
    assert!(eventually(|| {
        completion = dispatcher.poll();
        completion.is_some()
    })
    .await);

    let completion = completion.unwrap();
    assert!(completion.succeeded());
    assert_eq!(
        completion.notice().as_deref(),
        Some("Update check started, see the logs for the result.")
    );
    assert!(!dispatcher.in_progress());
}

// --- log viewer ---

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_log_viewer_loads_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("line one\nline two"))
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    let mut viewer = LogViewer::new(client, Handle::current());
    viewer.open(PanelSource::Logs);
    assert_eq!(viewer.state().map(|s| &s.body), Some(&PanelBody::Loading));

    assert!(eventually(|| viewer.poll().is_some()).await);
    assert_eq!(
        viewer.state().map(|s| &s.body),
        Some(&PanelBody::Text(vec!["line one".into(), "line two".into()]))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_log_viewer_empty_and_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    let mut viewer = LogViewer::new(client, Handle::current());

    viewer.open(PanelSource::Logs);
    assert!(eventually(|| viewer.poll().is_some()).await);
    assert_eq!(viewer.state().map(|s| &s.body), Some(&PanelBody::Empty));

    viewer.open(PanelSource::Ping);
    let mut loaded = None;
    assert!(eventually(|| {
        loaded = viewer.poll();
        loaded.is_some()
    })
    .await);
    assert!(!loaded.unwrap().succeeded);
    match viewer.state().map(|s| &s.body) {
        Some(PanelBody::Failed(message)) => assert!(message.starts_with("Error pinging servers: ")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_log_viewer_drops_reply_after_close() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("late"))
        .mount(&mock_server)
        .await;

    let client = SwitcherClient::new(&mock_server.uri()).unwrap();
    let mut viewer = LogViewer::new(client, Handle::current());
    viewer.open(PanelSource::Logs);
    viewer.close();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(viewer.poll().is_none());
    assert!(!viewer.is_open());
}

// --- controller ---

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_countdown_fetches_once_per_cycle() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", false, 1).await;

    let mut controller = controller_for(&mock_server);

    for expected in [3, 2, 1] {
        controller.tick_second();
        assert_eq!(controller.countdown_display(), Some(expected));
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!controller.poll_status());
    assert!(controller.snapshot().is_none());

    controller.tick_second();
    assert_eq!(controller.countdown_display(), Some(0));
    assert!(eventually(|| controller.poll_status()).await);
    assert_eq!(controller.current_server(), Some("A"));

    controller.tick_second();
    assert_eq!(controller.countdown_display(), Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_selection_follows_snapshot() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", false, 1).await;

    let mut controller = controller_for(&mock_server);
    controller.start();
    assert!(eventually(|| controller.poll_status()).await);

    assert_eq!(controller.view().and_then(|v| v.switch_enabled), Some(false));
    assert!(!controller.select_server("A"));
    assert!(controller.select_server("B"));
    assert_eq!(controller.view().and_then(|v| v.switch_enabled), Some(true));
    assert_eq!(
        controller.switch_to_selected_command(),
        Some(Command::SwitchToSelected { target: "B".into() })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_toggle_success_resyncs_immediately() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", true, 2).await;

    Mock::given(method("POST"))
        .and(path("/api/auto-switch"))
        .and(body_json(json!({"action": "resume"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut controller = controller_for(&mock_server);
    controller.start();
    assert!(eventually(|| controller.poll_status()).await);
    assert!(controller.paused());

    let command = controller.toggle_auto_switch_command();
    assert_eq!(command, Command::ToggleAutoSwitch(AutoSwitchAction::Resume));
    assert!(controller.dispatch(command));

    let mut completion = None;
    assert!(eventually(|| {
        completion = controller.poll_commands(Instant::now());
        completion.is_some()
    })
    .await);
    assert!(completion.unwrap().succeeded());
    assert!(!controller.resync_pending());

    // The resync lands as a second status read.
    assert!(eventually(|| controller.poll_status()).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_toggle_failure_keeps_state_and_reports() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", true, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/auto-switch"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "Invalid action"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auto-switch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&mock_server)
        .await;

    let mut controller = controller_for(&mock_server);
    controller.start();
    assert!(eventually(|| controller.poll_status()).await);

    for expected in ["Error: Invalid action", "Error: unknown error"] {
        assert!(controller.dispatch(controller.toggle_auto_switch_command()));
        let mut completion = None;
        assert!(eventually(|| {
            completion = controller.poll_commands(Instant::now());
            completion.is_some()
        })
        .await);
        assert_eq!(completion.unwrap().notice().as_deref(), Some(expected));
        assert!(controller.paused());
        assert!(!controller.resync_pending());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_switch_success_schedules_delayed_resync() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", false, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/switch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;

    let mut controller = controller_for(&mock_server);
    controller.start();
    assert!(eventually(|| controller.poll_status()).await);

    assert!(controller.dispatch(controller.switch_to_best_command()));
    let mut completion = None;
    assert!(eventually(|| {
        completion = controller.poll_commands(Instant::now());
        completion.is_some()
    })
    .await);
    assert!(completion.unwrap().succeeded());
    assert!(controller.resync_pending());
    assert!(!controller.fire_due_resync(Instant::now()));
    controller.shutdown();
    assert!(!controller.resync_pending());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_compact_registry_skips_detail_targets() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", false, 1).await;

    let config = PanelConfig {
        base_url: mock_server.uri(),
        ..PanelConfig::default()
    };
    let client = SwitcherClient::new(&config.base_url).unwrap();
    let registry = TargetRegistry::with_only(&[RenderTarget::CurrentServer, RenderTarget::ErrorCount]);
    let mut controller = PanelController::new(client, Handle::current(), &config, registry);

    controller.start();
    assert!(eventually(|| controller.poll_status()).await);

    let view = controller.view().unwrap();
    assert_eq!(view.current_server.as_deref(), Some("A"));
    assert!(view.uptime.is_none());
    assert!(view.down_stats.is_none());
    assert!(!controller.open_panel(PanelSource::Logs));

    controller.tick_second();
    assert_eq!(controller.countdown_display(), None);
}

// --- app input ---

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_switch_to_best_needs_confirmation() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", false, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/switch"))
        .and(body_json(json!({"type": "avoid", "avoid_server": "A"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = PanelConfig {
        base_url: mock_server.uri(),
        ..PanelConfig::default()
    };
    let mut app = App::new(controller_for(&mock_server), &config);
    app.controller.start();
    assert!(eventually(|| app.controller.poll_status()).await);

    // Declined prompt sends nothing.
    assert!(matches!(handle_key(&mut app, key(KeyCode::Char('b'))), Some(InputResult::Consumed)));
    assert_eq!(
        app.pending_action.as_ref().map(|p| p.description.as_str()),
        Some("Switch to the best available server?")
    );
    handle_key(&mut app, key(KeyCode::Char('n')));
    assert!(app.pending_action.is_none());
    assert!(!app.controller.command_in_progress());

    handle_key(&mut app, key(KeyCode::Char('b')));
    handle_key(&mut app, key(KeyCode::Char('y')));
    assert!(app.controller.command_in_progress());

    assert!(eventually(|| {
        app.poll_background(Instant::now());
        app.notice.is_some()
    })
    .await);
    let notice = app.notice.clone().unwrap();
    assert_eq!(notice.message, "Switching to the best server...");
    assert!(!notice.is_error);

    // Any key dismisses the notice without acting on it.
    handle_key(&mut app, key(KeyCode::Char('q')));
    assert!(app.notice.is_none());
    assert!(matches!(handle_key(&mut app, key(KeyCode::Char('q'))), Some(InputResult::Quit)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_logs_panel_open_and_close() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    let config = PanelConfig {
        base_url: mock_server.uri(),
        ..PanelConfig::default()
    };
    let mut app = App::new(controller_for(&mock_server), &config);

    handle_key(&mut app, key(KeyCode::Char('l')));
    assert_eq!(app.app_view, AppView::Panel(PanelSource::Logs));
    assert!(eventually(|| app.controller.poll_panel()).await);

    // `r` reloads inside the panel rather than refreshing status.
    handle_key(&mut app, key(KeyCode::Char('r')));
    assert_eq!(
        app.controller.log_viewer.state().map(|s| &s.body),
        Some(&PanelBody::Loading)
    );

    handle_key(&mut app, key(KeyCode::Esc));
    assert_eq!(app.app_view, AppView::Dashboard);
    assert!(!app.controller.log_viewer.is_open());

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(matches!(handle_key(&mut app, ctrl_c), Some(InputResult::Quit)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_subscription_reload_asks_first() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "A", false, 1).await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pool: 2 servers"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = PanelConfig {
        base_url: mock_server.uri(),
        ..PanelConfig::default()
    };
    let mut app = App::new(controller_for(&mock_server), &config);

    handle_key(&mut app, key(KeyCode::Char('S')));
    assert_eq!(
        app.pending_action.as_ref().map(|p| p.description.as_str()),
        Some("Refresh the server subscription?")
    );
    handle_key(&mut app, key(KeyCode::Char('y')));
    assert_eq!(app.app_view, AppView::Panel(PanelSource::Subscription));
    assert!(eventually(|| app.controller.poll_panel()).await);

    // Reloading the report would refresh the pool again, so it prompts.
    handle_key(&mut app, key(KeyCode::Char('r')));
    assert_eq!(
        app.pending_action.as_ref().map(|p| p.description.as_str()),
        Some("Refresh the server subscription?")
    );
    handle_key(&mut app, key(KeyCode::Char('n')));
    assert!(app.pending_action.is_none());
    assert_eq!(
        app.controller.log_viewer.state().map(|s| &s.body),
        Some(&PanelBody::Text(vec!["pool: 2 servers".into()]))
    );

    // The successful refresh resynced status once.
    assert!(eventually(|| app.controller.poll_status()).await);
}
