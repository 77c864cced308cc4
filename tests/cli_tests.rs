// ABOUTME: Integration tests for the CLI application
// ABOUTME: Runs the property-generator binary against generated snapshots and plugin configs

use std::process::Command;
use tokio::fs;

use property_generator::process::ProcessProperty;

mod common;
use common::{sample_process, TestEnvironment, TestPluginConfigBuilder, TestProperty};

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_property-generator"))
}

#[test]
fn test_cli_help_command() {
    let output = binary()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("property"));
    assert!(stdout.contains("validate"));
}

#[test]
fn test_cli_version_command() {
    let output = binary()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_cli_run_generates_properties() {
    let env = TestEnvironment::new();
    let builder = TestPluginConfigBuilder::new()
        .section("Archive", "*")
        .add_static("Static Text", "This is static")
        .with_property(
            TestProperty::new("User Location", "{{schritte[0].bearbeitungsbenutzer.standort}}")
                .with_rule("^Office$", "Büro"),
        )
        .add_static("Site", "{site}/{processtitle}");
    let plugin = env.create_plugin_config("plugin", &builder).await;
    let mut snapshot = sample_process();
    snapshot.eigenschaften.push(ProcessProperty {
        name: "Template".to_string(),
        value: "Monograph".to_string(),
    });
    let process = env.create_process_file("process", &snapshot).await;
    let report = env.output_file("cli");

    let output = binary()
        .args(["--no-color", "run", "--process"])
        .arg(&process)
        .arg("--plugin-config")
        .arg(&plugin)
        .args(["--step", "Scanning", "-V", "site=Göttingen", "--output"])
        .arg(&report)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Static Text = This is static"));
    assert!(stdout.contains("User Location = Büro"));
    assert!(stdout.contains("Site = Göttingen/00469418X"));
    assert!(stdout.contains("outcome: finish"));
    assert!(!stdout.contains("Template = Monograph"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).await.unwrap()).unwrap();
    assert_eq!(json["outcome"], "Finish");
    assert_eq!(json["summary"]["total_properties"], 3);
}

#[tokio::test]
async fn test_cli_run_fails_on_missing_accessor() {
    let env = TestEnvironment::new();
    let builder = TestPluginConfigBuilder::new().add_static("Broken", "{{doesNotExist}}");
    let plugin = env.create_plugin_config("plugin", &builder).await;
    let process = env.create_process_file("process", &sample_process()).await;

    let output = binary()
        .args(["--no-color", "run", "--process"])
        .arg(&process)
        .arg("--plugin-config")
        .arg(&plugin)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Broken"));
}

#[tokio::test]
async fn test_cli_validate() {
    let env = TestEnvironment::new();
    let valid = env
        .create_plugin_config(
            "valid",
            &TestPluginConfigBuilder::new().add_static("Title", "{{titel}}"),
        )
        .await;
    let invalid = env
        .create_plugin_config(
            "invalid",
            &TestPluginConfigBuilder::new()
                .with_property(TestProperty::new("Bad", "x").with_rule("(", "")),
        )
        .await;

    let output = binary()
        .args(["validate", "--plugin-config"])
        .arg(&valid)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("is valid"));

    let output = binary()
        .args(["validate", "--plugin-config"])
        .arg(&invalid)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
}
