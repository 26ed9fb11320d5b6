use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SENTINEL: &str = "Something went wrong. Please check your API key or model name.";

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

#[tokio::test]
async fn test_exec_prints_answer() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "What is 2+2?" }] }]
        })))
        .respond_with(text_response("4"))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "-p", "What is 2+2?"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^4\n$").unwrap());
}

#[tokio::test]
async fn test_exec_model_override_changes_path() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(text_response("from pro"))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["--model", "gemini-2.5-pro", "exec", "-p", "hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from pro"));
}

#[tokio::test]
async fn test_exec_failure_prints_sentinel() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .env("GEMINI_API_KEY", "bad-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "-p", "hi"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(SENTINEL))
        .stderr(predicate::str::contains("API key not valid.").not());
}

#[tokio::test]
async fn test_exec_failure_logs_raw_error() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .env_remove("ASK_LOG")
        .env("GEMINI_API_KEY", "bad-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "-p", "hi"])
        .assert()
        .failure();

    let logs = fs::read_dir(home.path().join("logs"))
        .unwrap()
        .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect::<String>();
    assert!(logs.contains("answer retrieval failed"), "log was: {logs}");
    assert!(logs.contains("API key not valid."), "log was: {logs}");
}

#[tokio::test]
async fn test_exec_rejects_blank_prompt() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .args(["exec", "-p", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt is empty"));
}

#[tokio::test]
async fn test_exec_fails_without_api_key() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .args(["exec", "-p", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_piped_stdin_runs_as_exec() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "piped question" }] }]
        })))
        .respond_with(text_response("piped answer"))
        .mount(&server)
        .await;

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .env("GEMINI_API_KEY", "test-api-key")
        .env("GEMINI_BASE_URL", server.uri())
        .write_stdin("piped question\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("piped answer"));
}

#[tokio::test]
async fn test_empty_pipe_is_rejected() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("ask")
        .env("ASK_HOME", home.path())
        .write_stdin("  \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input provided via pipe"));
}
