//! HTTP client for the user store.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use roster_core::{User, UserFormData, UserId, now_timestamp};
use tracing::{debug, instrument, warn};
use url::Url;

use super::conversions::normalize_user;
use super::error::StoreError;
use super::types::{CreateUserBody, RawUser};
use crate::config::StoreConfig;

/// User-Agent sent with every store request.
const USER_AGENT: &str = concat!("roster-admin/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body characters quoted in error messages.
const ERROR_PREVIEW_CHARS: usize = 200;

/// User store API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct UserStoreClient {
    inner: Arc<UserStoreClientInner>,
}

struct UserStoreClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for UserStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStoreClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl UserStoreClient {
    /// Create a new store client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreError::Api(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(UserStoreClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// URL of the users collection.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn collection_url(&self) -> String {
        self.inner.base_url.as_str().trim_end_matches('/').to_string()
    }

    fn record_url(&self, id: UserId) -> String {
        format!("{}/{id}", self.collection_url())
    }

    /// Fetch every user record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` on transport failure, non-success status,
    /// or a record that cannot be normalized.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let response = send(self.inner.client.get(self.collection_url())).await?;
        let records: Vec<RawUser> = handle_response(response).await?;

        debug!(count = records.len(), "Fetched users");
        records.into_iter().map(normalize_user).collect()
    }

    /// Fetch a single record. A 404 yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` for any other failure.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let response = send(self.inner.client.get(self.record_url(id))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("User not found");
            return Ok(None);
        }

        let record: RawUser = handle_response(response).await?;
        normalize_user(record).map(Some)
    }

    /// Create a record. `registrationDate` is stamped with the current time.
    ///
    /// Blank skills are dropped from the payload.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` on any failure.
    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn create_user(&self, data: &UserFormData) -> Result<User, StoreError> {
        let data = data.without_blank_skills();
        let body = CreateUserBody {
            data: &data,
            registration_date: now_timestamp(),
        };

        let response = send(self.inner.client.post(self.collection_url()).json(&body)).await?;
        let record: RawUser = handle_response(response).await?;
        let user = normalize_user(record)?;

        debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Replace the editable fields of a record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` on 404 and `StoreError::Api` otherwise.
    #[instrument(skip(self, data), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, data: &UserFormData) -> Result<User, StoreError> {
        let data = data.without_blank_skills();
        let response = send(self.inner.client.put(self.record_url(id)).json(&data)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }

        let record: RawUser = handle_response(response).await?;
        normalize_user(record)
    }

    /// Delete a record. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` on 404 and `StoreError::Api` otherwise.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        let response = send(self.inner.client.delete(self.record_url(id))).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id));
        }

        Err(parse_error(response).await)
    }

    /// Check that the store answers the collection endpoint.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the store is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let response = send(self.inner.client.get(self.collection_url())).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(response).await)
        }
    }
}

// =============================================================================
// Response Handling
// =============================================================================

async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
    request.send().await.map_err(|e| {
        warn!(error = %e, "Store request failed");
        StoreError::Api(format!("Request failed: {e}"))
    })
}

/// Decode a success body, or turn the response into an error.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, StoreError> {
    if response.status().is_success() {
        return response
            .json()
            .await
            .map_err(|e| StoreError::Api(format!("Failed to parse response: {e}")));
    }

    Err(parse_error(response).await)
}

async fn parse_error(response: Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let preview: String = body.chars().take(ERROR_PREVIEW_CHARS).collect();

    warn!(status = status.as_u16(), body = %preview, "Store returned error status");

    if preview.is_empty() {
        StoreError::Api(format!("{status}"))
    } else {
        StoreError::Api(format!("{status} - {preview}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client_for(server: &MockServer) -> UserStoreClient {
        let config = StoreConfig::parse(&server.url("/users")).unwrap();
        UserStoreClient::new(&config).unwrap()
    }

    fn form(first: &str, skills: &[&str]) -> UserFormData {
        UserFormData {
            first_name: first.to_string(),
            last_name: "Petrov".to_string(),
            email: "ivan@example.com".to_string(),
            skills: skills.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn test_list_users_normalizes_records() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/users")
                .header("accept", "application/json");
            then.status(200).json_body(json!([
                {"id": "1", "firstName": "Anna", "lastName": "Ivanova", "email": "a@example.com",
                 "skills": ["Rust"], "registrationDate": "2024-03-01T12:00:00.000Z"},
                {"id": 2, "firstName": "Boris", "lastName": "Orlov", "email": "b@example.com",
                 "createdAt": "2023-01-01T00:00:00.000Z"}
            ]));
        });

        let users = client_for(&server).list_users().await.unwrap();

        mock.assert();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, UserId::new(1));
        assert_eq!(users[1].skills, Vec::<String>::new());
        assert_eq!(users[1].registration_date, "2023-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_list_users_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(500).body("boom");
        });

        let err = client_for(&server).list_users().await.unwrap_err();
        match err {
            StoreError::Api(message) => {
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_users_undecodable_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).body("not json");
        });

        let err = client_for(&server).list_users().await.unwrap_err();
        assert!(matches!(err, StoreError::Api(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_api_error() {
        // Nothing listens on the discard port.
        let config = StoreConfig::parse("http://127.0.0.1:9/users").unwrap();
        let client = UserStoreClient::new(&config).unwrap();

        let err = client.list_users().await.unwrap_err();
        assert!(matches!(err, StoreError::Api(_)));
    }

    #[tokio::test]
    async fn test_get_user_missing_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/99");
            then.status(404).body("\"Not found\"");
        });

        let user = client_for(&server).get_user(UserId::new(99)).await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_get_user_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users/3");
            then.status(200)
                .json_body(json!({"id": "3", "firstName": "Vera", "skills": "n/a"}));
        });

        let user = client_for(&server)
            .get_user(UserId::new(3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.first_name, "Vera");
        assert!(user.skills.is_empty());
    }

    #[tokio::test]
    async fn test_create_user_returns_persisted_record() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/users");
            then.status(201).json_body(json!({
                "id": "10", "firstName": "Ivan", "lastName": "Petrov",
                "email": "ivan@example.com", "skills": ["Go"],
                "registrationDate": "2024-06-01T09:00:00.000Z"
            }));
        });

        let user = client_for(&server)
            .create_user(&form("Ivan", &["", "Go", " "]))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(user.id, UserId::new(10));
        assert_eq!(user.skills, vec!["Go"]);
    }

    #[test]
    fn test_create_body_shape() {
        let data = form("Ivan", &["Go"]);
        let body = CreateUserBody {
            data: &data,
            registration_date: "2024-06-01T09:00:00.000Z".to_string(),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "firstName": "Ivan",
                "lastName": "Petrov",
                "email": "ivan@example.com",
                "skills": ["Go"],
                "registrationDate": "2024-06-01T09:00:00.000Z"
            })
        );
    }

    #[tokio::test]
    async fn test_update_user_sends_filtered_skills() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/users/5").json_body(json!({
                "firstName": "Ivan",
                "lastName": "Petrov",
                "email": "ivan@example.com",
                "skills": ["Go"]
            }));
            then.status(200).json_body(json!({
                "id": "5", "firstName": "Ivan", "lastName": "Petrov",
                "email": "ivan@example.com", "skills": ["Go"],
                "registrationDate": "2024-01-01T00:00:00.000Z"
            }));
        });

        let user = client_for(&server)
            .update_user(UserId::new(5), &form("Ivan", &["", "Go", ""]))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(user.skills, vec!["Go"]);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/users/5");
            then.status(404);
        });

        let err = client_for(&server)
            .update_user(UserId::new(5), &form("Ivan", &[]))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(UserId::new(5)));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/users/4");
            then.status(200).body("{\"id\":\"4\"}");
        });

        client_for(&server).delete_user(UserId::new(4)).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/users/4");
            then.status(404);
        });

        let err = client_for(&server)
            .delete_user(UserId::new(4))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/users/4");
            then.status(503);
        });

        let err = client_for(&server)
            .delete_user(UserId::new(4))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Api(ref message) if message.contains("503")));
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).json_body(json!([]));
        });

        assert!(client_for(&server).ping().await.is_ok());
    }
}
