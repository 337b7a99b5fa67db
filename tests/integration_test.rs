//! Integration tests for the typegraph binary
//!
//! These tests run the actual binary against a copy of the fixture project
//! to verify:
//! - Every declared type appears in the output, referenced or not
//! - Weights are relative frequencies over project-internal targets
//! - Project config switches nested types and pretty output
//!
//! Each test uses its own isolated temp directory.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SHOP: &str = "com.acme.shop.Shop";
const INVENTORY: &str = "com.acme.shop.Inventory";
const ORDER: &str = "com.acme.shop.model.Order";
const LINE: &str = "com.acme.shop.model.Order$Line";
const CUSTOMER: &str = "com.acme.shop.model.Customer";
const PRODUCT: &str = "com.acme.shop.model.Product";

/// Path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).expect("Failed to create directory");
    for entry in fs::read_dir(from).expect("Failed to read fixtures") {
        let entry = entry.expect("Failed to read entry");
        let path = entry.path();
        let target = to.join(entry.file_name());
        if path.is_dir() {
            copy_dir(&path, &target);
        } else {
            fs::copy(&path, &target).expect("Failed to copy fixture file");
        }
    }
}

/// Copy the shop fixture to a temp directory and return the temp dir
fn create_test_workspace() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    copy_dir(&fixtures_path().join("shop"), temp_dir.path());
    temp_dir
}

/// Run typegraph on a path and return (stdout, stderr, exit_code)
fn run_typegraph(path: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_typegraph"))
        .arg(path)
        .output()
        .expect("Failed to run typegraph");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

fn analyze(path: &Path) -> Value {
    let (stdout, stderr, code) = run_typegraph(path);
    assert_eq!(code, 0, "typegraph failed: {}", stderr);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

fn weight(graph: &Value, source: &str, target: &str) -> f64 {
    graph[source][target]
        .as_f64()
        .unwrap_or_else(|| panic!("missing edge {} -> {}", source, target))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_every_declared_type_is_a_key() {
    let workspace = create_test_workspace();
    let graph = analyze(workspace.path());

    let mut keys: Vec<&str> = graph
        .as_object()
        .expect("top-level object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort();
    assert_eq!(keys, vec![INVENTORY, SHOP, CUSTOMER, ORDER, PRODUCT]);
}

#[test]
fn test_weights_are_relative_frequencies() {
    let workspace = create_test_workspace();
    let graph = analyze(workspace.path());

    // Order four times, Inventory twice, Customer and Product once each
    assert_close(weight(&graph, SHOP, ORDER), 0.5);
    assert_close(weight(&graph, SHOP, INVENTORY), 0.25);
    assert_close(weight(&graph, SHOP, CUSTOMER), 0.125);
    assert_close(weight(&graph, SHOP, PRODUCT), 0.125);

    assert_close(weight(&graph, INVENTORY, PRODUCT), 1.0);

    // References from the nested Line count toward Order
    assert_close(weight(&graph, ORDER, CUSTOMER), 0.4);
    assert_close(weight(&graph, ORDER, PRODUCT), 0.6);
}

#[test]
fn test_external_and_self_references_are_ignored() {
    let workspace = create_test_workspace();
    let graph = analyze(workspace.path());

    assert_eq!(graph[CUSTOMER], serde_json::json!({}));
    assert_eq!(graph[PRODUCT], serde_json::json!({}));
    for (_, weights) in graph.as_object().unwrap() {
        for target in weights.as_object().unwrap().keys() {
            assert!(target.starts_with("com.acme.shop."), "unexpected target {}", target);
        }
    }
}

#[test]
fn test_weights_sum_to_one() {
    let workspace = create_test_workspace();
    let graph = analyze(workspace.path());

    for (source, weights) in graph.as_object().unwrap() {
        let weights = weights.as_object().unwrap();
        if weights.is_empty() {
            continue;
        }
        let sum: f64 = weights.values().map(|w| w.as_f64().unwrap()).sum();
        assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", source, sum);
        assert!(!weights.contains_key(source.as_str()));
    }
}

#[test]
fn test_output_is_deterministic() {
    let workspace = create_test_workspace();
    let (first, _, _) = run_typegraph(workspace.path());
    let (second, _, _) = run_typegraph(workspace.path());
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 1);
}

#[test]
fn test_nested_types_config() {
    let workspace = create_test_workspace();
    fs::write(
        workspace.path().join("typegraph.toml"),
        "[collector]\nnested_types = true\n",
    )
    .unwrap();
    let graph = analyze(workspace.path());

    assert_close(weight(&graph, LINE, PRODUCT), 1.0);
    assert_close(weight(&graph, ORDER, CUSTOMER), 0.4);
    assert_close(weight(&graph, ORDER, LINE), 0.4);
    assert_close(weight(&graph, ORDER, PRODUCT), 0.2);
}

#[test]
fn test_pretty_output_config() {
    let workspace = create_test_workspace();
    fs::write(
        workspace.path().join(".typegraphrc.json"),
        r#"{"output": {"pretty": true}}"#,
    )
    .unwrap();
    let (stdout, _, code) = run_typegraph(workspace.path());

    assert_eq!(code, 0);
    assert!(stdout.lines().count() > 1);
    let graph: Value = serde_json::from_str(&stdout).unwrap();
    assert_close(weight(&graph, INVENTORY, PRODUCT), 1.0);
}

#[test]
fn test_build_output_is_excluded() {
    let workspace = create_test_workspace();
    let generated = workspace.path().join("build/generated/com/acme/shop");
    fs::create_dir_all(&generated).unwrap();
    fs::write(
        generated.join("Shop_Proxy.java"),
        "package com.acme.shop; class Shop_Proxy { Shop target; }",
    )
    .unwrap();

    let graph = analyze(workspace.path());
    assert!(graph.get("com.acme.shop.Shop_Proxy").is_none());
}

#[test]
fn test_packages_named_like_build_output_are_kept() {
    let workspace = tempfile::tempdir().unwrap();
    let sources = workspace.path().join("src/main/java/com/acme");
    for (package, name) in [("build", "Builder"), ("out", "Sink"), ("target", "Goal")] {
        fs::create_dir_all(sources.join(package)).unwrap();
        fs::write(
            sources.join(package).join(format!("{}.java", name)),
            format!("package com.acme.{}; public class {} {{}}", package, name),
        )
        .unwrap();
    }
    fs::write(
        sources.join("App.java"),
        r#"
package com.acme;

import com.acme.build.Builder;
import com.acme.out.Sink;
import com.acme.target.Goal;

public class App {
    Builder builder;
    Sink sink;
    Goal goal;
}
"#,
    )
    .unwrap();

    let graph = analyze(workspace.path());
    assert_eq!(graph.as_object().unwrap().len(), 4);
    for target in ["com.acme.build.Builder", "com.acme.out.Sink", "com.acme.target.Goal"] {
        assert_close(weight(&graph, "com.acme.App", target), 1.0 / 3.0);
        assert_eq!(graph[target], serde_json::json!({}));
    }
}

#[test]
fn test_empty_project() {
    let dir = tempfile::tempdir().unwrap();
    let graph = analyze(dir.path());
    assert_eq!(graph, serde_json::json!({}));
}
