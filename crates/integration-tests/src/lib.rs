//! Integration tests for Roster.
//!
//! Each test drives the real admin router in-process against an `httpmock`
//! stand-in for the remote user store, so no server or network access is
//! needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p roster-integration-tests
//! ```

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use httpmock::MockServer;
use roster_admin::{
    config::{AdminConfig, StoreConfig},
    routes,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// A mock user store plus an admin router pointed at it.
pub struct TestContext {
    pub store: MockServer,
    pub state: AppState,
}

impl TestContext {
    /// Start a mock store and build admin state with the given page size.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be built.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        let store = MockServer::start();
        let store_config =
            StoreConfig::parse(&store.url("/users")).expect("mock store URL is valid");

        let mut config = AdminConfig::for_store(store_config);
        config.page_size = page_size;
        config.locale = "en".to_string();

        let state = AppState::new(config).expect("Failed to create application state");
        Self { store, state }
    }

    /// Context with the default page size of 10.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_size(10)
    }

    /// A fresh router sharing this context's state.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::routes().with_state(self.state.clone())
    }

    /// Send a GET request through the router.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// Send a form-encoded POST through the router.
    pub async fn post_form(&self, uri: &str, pairs: &[(&str, &str)]) -> TestResponse {
        let body = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("router is infallible");
        TestResponse::read(response).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Status, redirect target and body of a router response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    async fn read(response: Response<Body>) -> Self {
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        Self {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Whether some element carries `name="value"`.
    ///
    /// Attribute values are compared with `&` entities decoded, whichever
    /// form the template engine chose.
    #[must_use]
    pub fn has_attribute(&self, name: &str, value: &str) -> bool {
        let prefix = format!("{name}=\"");
        self.body
            .split(prefix.as_str())
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .any(|raw| raw.replace("&#38;", "&").replace("&amp;", "&") == value)
    }

    /// Whether the page contains a link to `href`.
    #[must_use]
    pub fn links_to(&self, href: &str) -> bool {
        self.has_attribute("href", href)
    }

    /// Whether this is a redirect to the user list.
    #[must_use]
    pub fn redirects_to_list(&self) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some("/")
    }
}

/// A raw store record as the mock returns it.
#[must_use]
pub fn user_json(id: u32, first: &str, last: &str, date: &str) -> Value {
    json!({
        "id": id.to_string(),
        "firstName": first,
        "lastName": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "skills": ["Rust"],
        "registrationDate": date,
    })
}

/// `count` sequential records named `UserN Last`.
#[must_use]
pub fn many_users(count: u32) -> Value {
    Value::Array(
        (1..=count)
            .map(|id| user_json(id, &format!("User{id}"), "Last", "2024-01-15T10:30:00.000Z"))
            .collect(),
    )
}
