use std::path::Path;

use assert_cmd::Command;
use httpmock::prelude::*;
use serde_json::{Value, json};

use crate::fixture::{defaults_doc, published_json};

fn folio(home: &Path, server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("FOLIO_STATE_PATH", home.join("state.db"))
        .env("FOLIO_REMOTE_FIXED_URL", "")
        .env("FOLIO_REMOTE_TIMEOUT", "5s")
        .env("FOLIO_PUBLISH_ENDPOINT", server.url("/gists"))
        .env_remove("FOLIO_CONFIG")
        .env_remove("FOLIO_PUBLISH_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN");
    cmd
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn remote_set_switches_the_source() {
    let server = MockServer::start();
    let mut doc = defaults_doc();
    doc.hero.en.name = "From Remote".into();
    server.mock(|when, then| {
        when.method(GET).path("/content.json");
        then.status(200).body(published_json(&doc));
    });
    let home = tempfile::tempdir().unwrap();

    let set = run_json(folio(home.path(), &server).args([
        "-m",
        "remote",
        "set",
        &server.url("/content.json"),
    ]));
    assert_eq!(set["data"]["provenance"], "remote-dynamic");

    let shown = run_json(folio(home.path(), &server).args([
        "-m", "show", "--section", "hero", "--lang", "en",
    ]));
    assert_eq!(shown["data"]["provenance"], "remote-dynamic");
    assert_eq!(shown["data"]["content"]["name"], "From Remote");
}

#[test]
fn unreachable_remote_is_reported_but_not_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/content.json");
        then.status(503);
    });
    let home = tempfile::tempdir().unwrap();

    let loaded = run_json(
        folio(home.path(), &server)
            .env("FOLIO_REMOTE_FIXED_URL", server.url("/content.json"))
            .args(["-m", "load"]),
    );
    assert_eq!(loaded["data"]["provenance"], "static-default");
    assert_eq!(loaded["data"]["failures"][0]["stage"], "remote");
    assert_eq!(loaded["data"]["failures"][0]["code"], "NETWORK_UNREACHABLE");

    folio(home.path(), &server)
        .env("FOLIO_REMOTE_FIXED_URL", server.url("/content.json"))
        .args(["load", "--require-remote"])
        .assert()
        .failure();
}

#[test]
fn publish_saves_token_and_applies_url() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/gists")
            .header("Authorization", "Bearer cli-token");
        then.status(201).json_body(json!({
            "id": "cli1",
            "files": {
                "content.json": {
                    "raw_url": server.url("/me/cli1/raw/content.json"),
                }
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/me/cli1/raw/content.json");
        then.status(200).body(published_json(&defaults_doc()));
    });
    let home = tempfile::tempdir().unwrap();

    let published = run_json(
        folio(home.path(), &server)
            .env("FOLIO_PUBLISH_TOKEN", "cli-token")
            .args(["-m", "publish"]),
    );
    create.assert();
    assert_eq!(published["data"]["doc_id"], "cli1");
    assert_eq!(published["data"]["created"], true);
    assert_eq!(published["data"]["applied"]["provenance"], "remote-dynamic");

    let status = run_json(folio(home.path(), &server).args(["-m", "status"]));
    assert_eq!(status["data"]["publish"]["token_saved"], true);
    assert_eq!(status["data"]["publish"]["doc_id"], "cli1");
    assert_eq!(
        status["data"]["publish"]["history"].as_array().unwrap().len(),
        1
    );
    assert_eq!(status["data"]["provenance"], "remote-dynamic");
}
