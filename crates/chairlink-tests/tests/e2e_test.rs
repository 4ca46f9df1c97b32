//! End-to-end operator sessions against the simulated device.

use std::sync::Arc;
use std::time::Duration;

use chairlink_client::testing::TestServer;
use chairlink_client::{DispatchController, StaticTelemetry};
use chairlink_core::{
    ControllerConfig, DispatchOutcome, DriveCommand, DriveMode, TelemetryReading,
};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chairlink_client=debug".into()),
        )
        .try_init();
}

async fn start(config: impl FnOnce(&mut ControllerConfig)) -> (TestServer, DispatchController) {
    init_tracing();
    let server = TestServer::start().await.expect("failed to start simulator");
    let mut cfg = ControllerConfig::new(server.base_url());
    config(&mut cfg);
    let transport = Arc::new(server.transport().expect("transport"));
    let controller = DispatchController::with_telemetry(
        &cfg,
        transport,
        Some(Arc::new(StaticTelemetry::new(TelemetryReading {
            battery_percent: 86,
            signal_bars: 3,
        }))),
    );
    (server, controller)
}

#[tokio::test]
async fn full_drive_session() {
    let (server, controller) = start(|_| {}).await;

    // Session starts locked: manual motion is refused without a wire call.
    let outcome = controller.dispatch(DriveCommand::Front).await;
    assert!(matches!(outcome, DispatchOutcome::Rejected { .. }));
    assert!(controller.state().warning.is_visible());

    // Unlock, then drive a small loop and stop.
    controller.dispatch(DriveCommand::GestureOff).await;
    for command in [
        DriveCommand::Front,
        DriveCommand::Left,
        DriveCommand::Right,
        DriveCommand::Back,
        DriveCommand::Stop,
    ] {
        let outcome = controller.dispatch(command).await;
        assert!(outcome.is_completed(), "{command} should complete");
    }
    assert_eq!(controller.state().status, "stopped");

    // Hand control back to the motion sensor.
    controller.dispatch(DriveCommand::GestureOn).await;
    assert!(controller.state().mode.gesture_enabled);

    assert_eq!(
        server.received(),
        vec![
            "gesture_off",
            "front",
            "left",
            "right",
            "back",
            "stop",
            "gesture_on"
        ]
    );
}

#[tokio::test]
async fn startup_grace_warning_self_dismisses() {
    let (_server, controller) = start(|cfg| {
        cfg.warning_visible_at_start = true;
        cfg.warning_duration = Duration::from_millis(200);
    })
    .await;

    assert!(controller.state().warning.is_visible());
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!controller.state().warning.is_visible());
}

#[tokio::test]
async fn operator_dismisses_the_warning_early() {
    let (_server, controller) = start(|_| {}).await;

    controller.dispatch(DriveCommand::Stop).await;
    assert!(controller.state().warning.is_visible());

    controller.dismiss_warning();
    assert!(!controller.state().warning.is_visible());
}

#[tokio::test]
async fn telemetry_and_local_controls() {
    let (server, controller) = start(|_| {}).await;

    controller.refresh_telemetry().await;
    controller.set_speed(70);
    controller.set_drive_mode(DriveMode::Outdoor);

    let telemetry = controller.state().telemetry;
    assert_eq!(telemetry.battery_percent, 86);
    assert_eq!(telemetry.signal_bars, 3);
    assert_eq!(telemetry.speed, 70);
    assert_eq!(telemetry.drive_mode, DriveMode::Outdoor);

    // None of this produced traffic.
    assert_eq!(server.received(), Vec::<String>::new());
}

#[tokio::test]
async fn observer_follows_a_session() {
    let (_server, controller) = start(|_| {}).await;
    let mut rx = controller.subscribe();

    controller.dispatch(DriveCommand::GestureOff).await;
    rx.changed().await.unwrap();
    assert!(!rx.borrow_and_update().mode.gesture_enabled);

    controller.dispatch(DriveCommand::Front).await;
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().status, "moving forward");
}

#[tokio::test]
async fn settings_file_drives_a_session() {
    use std::io::Write;

    init_tracing();
    let server = TestServer::start().await.expect("failed to start simulator");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
device_url = "{}"
gesture_enabled_at_start = false
warning_duration = "3s"
"#,
        server.base_url()
    )
    .unwrap();

    let config = ControllerConfig::load(file.path()).unwrap();
    let transport = Arc::new(server.transport().unwrap());
    let controller = DispatchController::new(&config, transport);

    // Unlocked from the settings file: motion goes straight through.
    let outcome = controller.dispatch(DriveCommand::Front).await;
    assert!(outcome.is_completed());
    assert_eq!(server.received(), vec!["front"]);
}
