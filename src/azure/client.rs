//! Authenticated Resource Manager REST client.
//!
//! Wraps `reqwest` with the bearer token, `api-version` handling, ARM error
//! decoding, `nextLink` paging and long-running-operation polling.

use crate::config::Settings;
use crate::error::ApiError;
use crate::models::{ErrorResponse, OperationStatus, Page};
use colored::Colorize;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, LOCATION, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";

/// Where to poll a long-running operation.
#[derive(Debug, PartialEq)]
enum PollTarget {
    /// Status resource with a `status` field.
    AsyncOperation(String),
    /// Answers 202 until the operation is done.
    Location(String),
}

/// Resource Manager client bound to one subscription and one token.
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: String,
    subscription_id: String,
    token: String,
    poll_interval: Duration,
}

impl ArmClient {
    pub fn new(settings: &Settings, subscription_id: &str, token: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ArmClient {
            http,
            endpoint: settings.management_endpoint.clone(),
            subscription_id: subscription_id.to_string(),
            token,
            poll_interval: settings.poll_interval,
        })
    }

    /// Absolute URL of a path below `/subscriptions/{id}`.
    pub fn subscription_url(&self, path: &str) -> String {
        format!(
            "{}/subscriptions/{}{}",
            self.endpoint, self.subscription_id, path
        )
    }

    fn request(&self, method: Method, url: &str, api_version: Option<&str>) -> RequestBuilder {
        let mut builder = self.http.request(method, url).bearer_auth(&self.token);
        if let Some(version) = api_version {
            builder = builder.query(&[("api-version", version)]);
        }
        builder
    }

    /// Send and turn any non-success status into an error.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        log::debug!("{} {}", method, url.as_str().on_blue());

        let response = self.http.execute(request).await?;
        let status = response.status();
        log::debug!("{} {} -> {}", method, url.path(), status);

        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::warn!(
            "{failed} {method} {path}: {status}",
            failed = "failed".on_red(),
            path = url.path()
        );
        log::trace!("error body:\n{body}");
        Err(describe_error(status, &body).into())
    }

    /// Send `body` (if any) and parse the JSON response.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        url: &str,
        api_version: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, url, Some(api_version));
        builder = match body {
            Some(body) => builder.json(body),
            None => builder.header(CONTENT_LENGTH, "0"),
        };
        let response = self.execute(builder).await?;
        let text = response.text().await?;
        parse_body(&text)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        api_version: &str,
    ) -> Result<T, ApiError> {
        self.send_json::<(), T>(Method::GET, url, api_version, None)
            .await
    }

    /// GET a list and follow `nextLink` until the last page.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        url: &str,
        api_version: &str,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut seen_links = HashSet::new();
        let mut page: Page<T> = self.get_json(url, api_version).await?;
        let mut page_count = 1;
        loop {
            items.extend(page.value);
            let Some(next) = page.next_link else {
                break;
            };
            if !seen_links.insert(next.clone()) {
                return Err(format!("nextLink not unique - possible infinite loop: {next}").into());
            }
            // nextLink already carries the api-version.
            let response = self.execute(self.request(Method::GET, &next, None)).await?;
            page = parse_body(&response.text().await?)?;
            page_count += 1;
        }
        log::debug!("Listed {} items in {} page(s)", items.len(), page_count);
        Ok(items)
    }

    /// PUT a resource and block until the provider finishes, then read it back.
    pub async fn put_long_running<B, T>(
        &self,
        url: &str,
        api_version: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, url, Some(api_version)).json(body);
        let response = self.execute(builder).await?;
        self.wait_for(&response).await?;
        self.get_json(url, api_version).await
    }

    /// DELETE a resource and block until the provider finishes.
    pub async fn delete(&self, url: &str, api_version: &str) -> Result<(), ApiError> {
        let response = self
            .execute(self.request(Method::DELETE, url, Some(api_version)))
            .await?;
        self.wait_for(&response).await
    }

    async fn wait_for(&self, response: &Response) -> Result<(), ApiError> {
        let Some(target) = poll_target(response.status(), response.headers()) else {
            return Ok(());
        };
        let delay = retry_after(response.headers(), self.poll_interval);
        self.poll(target, delay).await
    }

    async fn poll(&self, target: PollTarget, mut delay: Duration) -> Result<(), ApiError> {
        let mut polls = 0u32;
        loop {
            tokio::time::sleep(delay).await;
            polls += 1;
            match &target {
                PollTarget::AsyncOperation(url) => {
                    let response = self.execute(self.request(Method::GET, url, None)).await?;
                    delay = retry_after(response.headers(), self.poll_interval);
                    let status: OperationStatus = parse_body(&response.text().await?)?;
                    match status.status.as_str() {
                        "Succeeded" => {
                            log::info!("Operation succeeded after {polls} poll(s)");
                            return Ok(());
                        }
                        "Failed" | "Canceled" => {
                            let detail = status
                                .error
                                .map(|e| format!("{}: {}", e.code, e.message))
                                .unwrap_or_else(|| "no error detail".to_string());
                            return Err(
                                format!("operation {}: {}", status.status, detail).into()
                            );
                        }
                        other => log::info!("Operation {other}, next poll in {delay:?}"),
                    }
                }
                PollTarget::Location(url) => {
                    let response = self.execute(self.request(Method::GET, url, None)).await?;
                    if response.status() != StatusCode::ACCEPTED {
                        log::info!("Operation finished after {polls} poll(s)");
                        return Ok(());
                    }
                    delay = retry_after(response.headers(), self.poll_interval);
                    log::info!("Operation still running, next poll in {delay:?}");
                }
            }
        }
    }
}

/// Pick the polling URL of an accepted request, if it is long-running.
fn poll_target(status: StatusCode, headers: &HeaderMap) -> Option<PollTarget> {
    if status != StatusCode::CREATED && status != StatusCode::ACCEPTED {
        return None;
    }
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    if let Some(url) = header(ASYNC_OPERATION_HEADER) {
        return Some(PollTarget::AsyncOperation(url));
    }
    if status == StatusCode::ACCEPTED {
        return header(LOCATION.as_str()).map(PollTarget::Location);
    }
    None
}

/// `Retry-After` in whole seconds, else `default`.
fn retry_after(headers: &HeaderMap, default: Duration) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Render a failing response as `HTTP <status> <code>: <message>`.
fn describe_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(envelope) => format!(
            "HTTP {} {}: {}",
            status.as_u16(),
            envelope.error.code,
            envelope.error.message
        ),
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {}: {}", status.as_u16(), body.trim()),
    }
}

/// Parse JSON, naming the failing path on mismatch.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("BODY START:\n\n{}\n\nBODY END\n", body);
        format!("Error parsing response: path={} error={}", e.path(), e).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StorageAccount;
    use reqwest::header::HeaderValue;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_describe_error_envelope() {
        let body = r#"{"error":{"code":"StorageAccountAlreadyTaken","message":"The storage account named x is already taken."}}"#;
        assert_eq!(
            describe_error(StatusCode::CONFLICT, body),
            "HTTP 409 StorageAccountAlreadyTaken: The storage account named x is already taken."
        );
    }

    #[test]
    fn test_describe_error_plain_and_empty() {
        assert_eq!(
            describe_error(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "HTTP 502: upstream down"
        );
        assert_eq!(
            describe_error(StatusCode::UNAUTHORIZED, ""),
            "HTTP 401 Unauthorized"
        );
    }

    #[test]
    fn test_retry_after() {
        let default = Duration::from_secs(5);
        assert_eq!(
            retry_after(&headers(&[("retry-after", "17")]), default),
            Duration::from_secs(17)
        );
        assert_eq!(retry_after(&headers(&[]), default), default);
        assert_eq!(
            retry_after(&headers(&[("retry-after", "soon")]), default),
            default
        );
    }

    #[test]
    fn test_poll_target_prefers_async_operation() {
        let h = headers(&[
            ("azure-asyncoperation", "https://arm/op/1"),
            ("location", "https://arm/loc/1"),
        ]);
        assert_eq!(
            poll_target(StatusCode::ACCEPTED, &h),
            Some(PollTarget::AsyncOperation("https://arm/op/1".to_string()))
        );
    }

    #[test]
    fn test_poll_target_location_only_on_accepted() {
        let h = headers(&[("location", "https://arm/loc/1")]);
        assert_eq!(
            poll_target(StatusCode::ACCEPTED, &h),
            Some(PollTarget::Location("https://arm/loc/1".to_string()))
        );
        assert_eq!(poll_target(StatusCode::CREATED, &h), None);
        assert_eq!(poll_target(StatusCode::OK, &h), None);
    }

    #[test]
    fn test_parse_body_reports_path() {
        let err = parse_body::<StorageAccount>(r#"{"id":"i","name":5}"#).unwrap_err();
        assert!(err.to_string().contains("path=name"), "{err}");
    }

    #[test]
    fn test_subscription_url() {
        let settings = Settings {
            management_endpoint: "http://localhost:9999".to_string(),
            ..Settings::default()
        };
        let client = ArmClient::new(&settings, "sub-1", "tok".to_string()).unwrap();
        assert_eq!(
            client.subscription_url("/providers/Microsoft.Storage/register"),
            "http://localhost:9999/subscriptions/sub-1/providers/Microsoft.Storage/register"
        );
    }

    fn client_for(server: &MockServer) -> ArmClient {
        let settings = Settings {
            management_endpoint: server.uri(),
            poll_interval: Duration::ZERO,
            ..Settings::default()
        };
        ArmClient::new(&settings, "sub-1", "tok".to_string()).expect("client")
    }

    fn account_json(name: &str) -> serde_json::Value {
        json!({
            "id": format!("/subscriptions/sub-1/storageAccounts/{name}"),
            "name": name,
            "type": "Microsoft.Storage/storageAccounts",
            "location": "westus",
            "properties": {"provisioningState": "Succeeded"}
        })
    }

    #[tokio::test]
    async fn test_list_all_follows_next_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(query_param("api-version", "2023-01-01"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [account_json("one")],
                "nextLink": format!("{}/accounts/page2?api-version=2023-01-01&skiptoken=abc", server.uri())
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts/page2"))
            .and(query_param("skiptoken", "abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"value": [account_json("two")]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let accounts: Vec<StorageAccount> = client
            .list_all(&format!("{}/accounts", server.uri()), "2023-01-01")
            .await
            .expect("two pages");
        let names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_list_all_stops_on_repeated_next_link() {
        let server = MockServer::start().await;
        let repeated = format!("{}/accounts/again", server.uri());
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"value": [], "nextLink": repeated})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts/again"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"value": [], "nextLink": repeated})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .list_all::<StorageAccount>(&format!("{}/accounts", server.uri()), "2023-01-01")
            .await
            .unwrap_err();
        assert!(
            err.to_string().contains("possible infinite loop"),
            "{err}"
        );
    }

    #[tokio::test]
    async fn test_async_operation_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/groups/grp"))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header(
                        "azure-asyncoperation",
                        format!("{}/operations/op1", server.uri()),
                    )
                    .insert_header("retry-after", "0"),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/op1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/op1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Failed",
                "error": {"code": "ScopeLocked", "message": "The resource group is locked."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .delete(&format!("{}/groups/grp", server.uri()), "2021-04-01")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "operation Failed: ScopeLocked: The resource group is locked."
        );
    }

    #[tokio::test]
    async fn test_location_poll_then_read_back() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/accounts/acct"))
            .and(query_param("api-version", "2023-01-01"))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("location", format!("{}/locations/op2", server.uri())),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/locations/op2"))
            .respond_with(ResponseTemplate::new(202))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/locations/op2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts/acct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(account_json("acct")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let account: StorageAccount = client
            .put_long_running(
                &format!("{}/accounts/acct", server.uri()),
                "2023-01-01",
                &json!({"location": "westus"}),
            )
            .await
            .expect("created");
        assert_eq!(account.name, "acct");
        assert_eq!(account.provisioning_state(), "Succeeded");
    }

    #[tokio::test]
    async fn test_error_envelope_from_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "ResourceNotFound", "message": "not here"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .get_json::<StorageAccount>(
                &format!("{}/accounts/missing", server.uri()),
                "2023-01-01",
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404 ResourceNotFound: not here");
    }
}
