#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use p5bridge_gateway::gateway::{Command, SampleKey};
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use common::bridge;

#[tokio::test]
async fn send_code_without_editors_reports_nobody_listening() {
    let b = bridge(Duration::from_secs(30));
    let out = b.gateway.invoke("send_code", &json!({ "code": "circle(1,1,1)" })).await;
    assert!(out.contains("No editor sessions connected"), "{out}");
    assert!(out.contains("NO_SUBSCRIBERS"), "{out}");
    assert!(b.transport.sent().is_empty());
}

#[tokio::test]
async fn send_code_reports_recipient_count() {
    let b = bridge(Duration::from_secs(30));
    b.registry.register("a");
    b.registry.register("b");

    let out = b.gateway.invoke("send_code", &json!({ "code": "X" })).await;
    assert_eq!(out, "Sent code to 2 editor session(s) (1 characters)");
    assert_eq!(b.transport.events_for("a"), vec!["codeUpdate"]);
    assert_eq!(b.transport.events_for("b"), vec!["codeUpdate"]);
}

#[tokio::test]
async fn invalid_arguments_are_rejected_at_the_boundary() {
    let b = bridge(Duration::from_secs(30));
    b.registry.register("a");

    let cases: [(&str, Value); 5] = [
        ("send_code", json!({ "code": "   " })),
        ("send_code", json!({})),
        ("send_code", Value::Null),
        ("update_project_name", json!({ "name": "" })),
        ("does_not_exist", json!({})),
    ];
    for (tool, args) in cases {
        let out = b.gateway.invoke(tool, &args).await;
        assert!(out.contains("INVALID_ARGUMENT"), "tool={tool} out={out}");
    }
    assert!(b.transport.sent().is_empty());
}

#[tokio::test]
async fn unknown_sample_lists_available_keys() {
    let b = bridge(Duration::from_secs(30));
    let out = b
        .gateway
        .invoke("send_sample", &json!({ "sample_name": "teapot" }))
        .await;
    assert!(out.contains("INVALID_ARGUMENT"), "{out}");
    for key in SampleKey::ALL {
        assert!(out.contains(key.as_str()), "{out}");
    }
}

#[tokio::test]
async fn send_sample_pushes_the_sketch() {
    let b = bridge(Duration::from_secs(30));
    b.registry.register("a");

    let out = b
        .gateway
        .invoke("send_sample", &json!({ "sample_name": "rotating_cube" }))
        .await;
    assert!(out.starts_with("Sent 'rotating_cube' sample. Sent code to 1"), "{out}");

    let sent = b.transport.sent();
    assert_eq!(sent[0].1["data"]["code"], SampleKey::RotatingCube.code());
}

#[tokio::test]
async fn ui_commands_emit_their_events() {
    let b = bridge(Duration::from_secs(30));
    b.registry.register("a");

    for tool in ["start_execution", "stop_execution", "clear_console", "toggle_sidebar"] {
        let out = b.gateway.invoke(tool, &Value::Null).await;
        assert!(out.contains("(1 editor session(s))"), "tool={tool} out={out}");
    }
    let out = b
        .gateway
        .invoke("update_project_name", &json!({ "name": "  Tides " }))
        .await;
    assert_eq!(out, "Project name updated to 'Tides' (1 editor session(s))");

    assert_eq!(
        b.transport.events_for("a"),
        vec![
            "startExecution",
            "stopExecution",
            "clearConsole",
            "toggleSidebar",
            "updateProjectName"
        ]
    );
    assert_eq!(b.transport.sent()[4].1["data"], "Tides");
}

#[tokio::test]
async fn status_sweeps_before_counting() {
    let b = bridge(Duration::from_millis(50));
    b.registry.register("a");

    let out = b.gateway.invoke("get_status", &json!({})).await;
    assert!(out.contains("with 1 connected editor session(s)"), "{out}");

    sleep(Duration::from_millis(80)).await;
    let out = b.gateway.invoke("get_status", &json!({})).await;
    assert!(out.contains("no editor sessions are connected"), "{out}");
    assert!(out.contains("idle"), "{out}");
    assert_eq!(b.registry.count(), 0);
}

#[tokio::test]
async fn debug_info_shows_registry_and_transport_separately() {
    let b = bridge(Duration::from_secs(30));
    b.registry.register("a");
    b.transport.add_open("zombie");

    let out = b.gateway.invoke("get_debug_info", &json!({})).await;
    assert!(out.contains("Live sessions: 1"), "{out}");
    assert!(out.contains("Session ids: a"), "{out}");
    assert!(out.contains("Open but not live: zombie"), "{out}");
    // diagnostics never feed back into the registry
    assert!(!b.registry.contains("zombie"));
}

#[tokio::test]
async fn ping_and_console_tools() {
    let b = bridge(Duration::from_secs(30));
    let out = b.gateway.invoke("ping_subscribers", &json!({})).await;
    assert!(out.contains("NO_SUBSCRIBERS"), "{out}");

    b.registry.register("a");
    let out = b.gateway.invoke("ping_subscribers", &json!({})).await;
    assert!(out.starts_with("Ping sent to 1 editor session(s)"), "{out}");

    b.gateway.invoke("send_debug_message", &json!({})).await;
    b.gateway.invoke("test_connection", &json!({})).await;
    assert_eq!(
        b.transport.events_for("a"),
        vec!["ping", "addConsoleMessage", "codeUpdate", "addConsoleMessage"]
    );
    let sent = b.transport.sent();
    assert_eq!(sent[1].1["data"]["type"], "info");
    assert!(sent[0].1["data"]["timestamp"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn refresh_and_sync_report_counts() {
    let b = bridge(Duration::from_secs(30));
    let out = b.gateway.invoke("refresh_connections", &json!({})).await;
    assert_eq!(out, "Connection refresh complete. Sessions before: 0, after: 0");

    b.registry.register("a");
    b.registry.register("b");
    b.transport.fail_for("b");

    let out = b.gateway.invoke("refresh_connections", &json!({})).await;
    assert_eq!(out, "Connection refresh complete. Sessions before: 2, after: 2");
    assert_eq!(b.transport.events_for("a"), vec!["getProjectState"]);

    let out = b.gateway.invoke("sync_connections", &json!({})).await;
    assert!(out.contains("Live sessions: 2"), "{out}");
    assert!(out.contains("Pinged: 1"), "{out}");
}

#[tokio::test]
async fn health_reports_unbound_listener() {
    let b = bridge(Duration::from_secs(30));
    let out = b.gateway.invoke("check_health", &json!({})).await;
    assert!(out.contains("Listener: FAIL (idle)"), "{out}");
    assert!(out.contains("Port: not bound"), "{out}");
}

#[tokio::test]
async fn panic_inside_a_command_becomes_a_message() {
    let b = bridge(Duration::from_secs(30));
    b.registry.register("boom");
    b.transport.panic_for("boom");

    let out = b.gateway.invoke("clear_console", &json!({})).await;
    assert_eq!(out, "Failed to clear console: unexpected internal error in the bridge");

    // the gateway keeps working afterwards
    b.registry.remove("boom");
    b.registry.register("ok");
    let out = b.gateway.invoke("clear_console", &json!({})).await;
    assert!(out.starts_with("Console cleared"), "{out}");
}

#[test]
fn catalog_covers_every_parsable_tool() {
    let catalog = Command::catalog();
    assert_eq!(catalog.len(), 15);
    for tool in &catalog {
        let args = match tool.name {
            "send_code" => json!({ "code": "x" }),
            "update_project_name" => json!({ "name": "p" }),
            "send_sample" => json!({ "sample_name": "generative_art" }),
            _ => json!({}),
        };
        assert!(Command::parse(tool.name, &args).is_ok(), "tool={}", tool.name);
        assert_eq!(tool.input_schema["type"], "object");
    }
}
