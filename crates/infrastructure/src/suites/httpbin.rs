//! Demonstration suite against an HTTP echo service (httpbin).
//!
//! These tests are example payloads, not engine behavior: each reads the
//! target `baseUrl` and `timeout` from the bound environment and fails
//! through its own checks when they are absent.

use reqwest::{Client, StatusCode};
use serde_json::Value;

use beacon_domain::{Environment, RegistryBuilder, TestCase, TestFailure, TestOutcome, ensure};

/// Registers the httpbin sample suite on a builder.
#[must_use]
pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .add(TestCase::new("Should perform GET request", get_request).in_group("HTTP Methods"))
        .add(TestCase::new("Should perform POST request", post_request).in_group("HTTP Methods"))
        .add(TestCase::new("Should perform PUT request", put_request).in_group("HTTP Methods"))
        .add(TestCase::new("Should handle 200 status code", status_200).in_group("Status Codes"))
        .add(TestCase::new("Should handle 404 status code", status_404).in_group("Status Codes"))
        .add(
            TestCase::new("Should return request headers", request_headers)
                .in_group("Request Inspection"),
        )
        .add(
            TestCase::new("Should handle basic auth", basic_auth)
                .in_group("Authentication")
                .skipped(),
        )
        .add(
            TestCase::new("Should return JSON response", json_response)
                .in_group("Response Formats"),
        )
        .add(
            TestCase::new("Should return XML response", xml_response).in_group("Response Formats"),
        )
        .add(
            TestCase::new("Should handle query parameters", query_parameters)
                .in_group("Query Parameters"),
        )
}

fn client() -> Result<Client, TestFailure> {
    Client::builder()
        .user_agent(concat!("Beacon/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(TestFailure::caused_by)
}

fn base_url(env: &Environment) -> Result<String, TestFailure> {
    env.base_url()
        .map(str::to_string)
        .ok_or_else(|| TestFailure::new("environment is missing 'baseUrl'"))
}

fn expect_status(actual: StatusCode, expected: StatusCode) -> TestOutcome {
    ensure(
        actual == expected,
        format!("expected status {expected}, got {actual}"),
    )
}

fn content_type(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn get_request(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let response = client()?
        .get(format!("{base}/get"))
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)?;
    let body: Value = response.json().await.map_err(TestFailure::caused_by)?;
    ensure(body.get("url").is_some(), "response is missing 'url'")
}

async fn post_request(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let payload = serde_json::json!({"key": "value", "test": "data"});
    let response = client()?
        .post(format!("{base}/post"))
        .json(&payload)
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)?;
    let body: Value = response.json().await.map_err(TestFailure::caused_by)?;
    ensure(body.get("json").is_some(), "response is missing 'json'")?;
    ensure(
        body["json"]["key"] == "value",
        "echoed payload lost 'key'",
    )
}

async fn put_request(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let payload = serde_json::json!({"key": "updated_value", "test": "updated_data"});
    let response = client()?
        .put(format!("{base}/put"))
        .json(&payload)
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)?;
    let body: Value = response.json().await.map_err(TestFailure::caused_by)?;
    ensure(body.get("json").is_some(), "response is missing 'json'")?;
    ensure(
        body["json"]["key"] == "updated_value",
        "echoed payload lost 'key'",
    )
}

async fn status_200(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let response = client()?
        .get(format!("{base}/status/200"))
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)
}

async fn status_404(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let response = client()?
        .get(format!("{base}/status/404"))
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::NOT_FOUND)
}

async fn request_headers(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let response = client()?
        .get(format!("{base}/headers"))
        .header("X-Test-Header", "test-value")
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)?;
    let body: Value = response.json().await.map_err(TestFailure::caused_by)?;
    ensure(body.get("headers").is_some(), "response is missing 'headers'")
}

// Placeholder until a credentialed environment exists; registered skipped.
async fn basic_auth(_env: Environment) -> TestOutcome {
    Ok(())
}

async fn json_response(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let response = client()?
        .get(format!("{base}/json"))
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)?;
    let kind = content_type(&response);
    ensure(
        kind.starts_with("application/json"),
        format!("expected a JSON content type, got '{kind}'"),
    )?;
    let body: Value = response.json().await.map_err(TestFailure::caused_by)?;
    ensure(
        body.get("slideshow").is_some(),
        "response is missing 'slideshow'",
    )
}

async fn xml_response(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let response = client()?
        .get(format!("{base}/xml"))
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)?;
    let kind = content_type(&response);
    ensure(
        kind.contains("xml"),
        format!("expected an XML content type, got '{kind}'"),
    )
}

async fn query_parameters(env: Environment) -> TestOutcome {
    let base = base_url(&env)?;
    let response = client()?
        .get(format!("{base}/get"))
        .query(&[("key1", "value1"), ("key2", "value2")])
        .timeout(env.timeout())
        .send()
        .await
        .map_err(TestFailure::caused_by)?;
    expect_status(response.status(), StatusCode::OK)?;
    let body: Value = response.json().await.map_err(TestFailure::caused_by)?;
    ensure(body.get("args").is_some(), "response is missing 'args'")?;
    ensure(body["args"]["key1"] == "value1", "'key1' was not echoed")?;
    ensure(body["args"]["key2"] == "value2", "'key2' was not echoed")
}
