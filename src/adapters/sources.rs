use crate::adapters::storage::LocalStorage;
use crate::domain::model::{SourceKind, User};
use crate::domain::ports::{ConfigProvider, Storage, UserSource};
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{validate_file_extension, validate_required_field};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 來源可以回傳的 JSON 形狀
#[derive(Deserialize)]
#[serde(untagged)]
enum UsersPayload {
    List(Vec<User>),
    Envelope { users: Vec<User> },
    Single(User),
}

impl From<UsersPayload> for Vec<User> {
    fn from(payload: UsersPayload) -> Self {
        match payload {
            UsersPayload::List(users) | UsersPayload::Envelope { users } => users,
            UsersPayload::Single(user) => vec![user],
        }
    }
}

/// 非 JSON 內容回傳 SerializationError，形狀不符回傳 ProcessingError
pub fn parse_users_json(data: &[u8]) -> Result<Vec<User>> {
    let value: serde_json::Value = serde_json::from_slice(data)?;
    let payload =
        UsersPayload::deserialize(value).map_err(|e| RosterError::ProcessingError {
            message: format!("Unexpected users payload shape: {}", e),
        })?;
    Ok(payload.into())
}

pub fn parse_users_csv(data: &[u8]) -> Result<Vec<User>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut users = Vec::new();
    for row in reader.deserialize() {
        let user: User = row?;
        users.push(user);
    }
    Ok(users)
}

#[derive(Debug, Clone)]
pub struct StaticUserSource {
    users: Vec<User>,
}

impl StaticUserSource {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl Default for StaticUserSource {
    fn default() -> Self {
        Self::new(vec![User::new("Lee", "Earth")])
    }
}

#[async_trait]
impl UserSource for StaticUserSource {
    async fn fetch_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} users)", self.users.len())
    }
}

pub struct HttpUserSource {
    client: Client,
    endpoint: String,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpUserSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            retry_attempts: 0,
            retry_delay: Duration::from_millis(500),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    async fn fetch_once(&self) -> Result<Vec<User>> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(RosterError::HttpStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_users_json(&body)
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_users(&self) -> Result<Vec<User>> {
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Ok(users) => return Ok(users),
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Fetching users failed ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.retry_attempts,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn describe(&self) -> String {
        format!("http {}", self.endpoint)
    }
}

pub struct FileUserSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> FileUserSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> UserSource for FileUserSource<S> {
    async fn fetch_users(&self) -> Result<Vec<User>> {
        let extension = validate_file_extension("source.file", &self.path, &["json", "csv"])?;
        let data = self.storage.read_file(&self.path).await?;

        match extension.as_str() {
            "csv" => parse_users_csv(&data),
            _ => parse_users_json(&data),
        }
    }

    fn describe(&self) -> String {
        format!("file {}", self.path)
    }
}

/// 依設定建立對應的使用者來源
pub fn build_source<C: ConfigProvider>(config: &C) -> Result<Box<dyn UserSource>> {
    match config.source_kind() {
        SourceKind::Static => Ok(Box::new(StaticUserSource::default())),
        SourceKind::Http => {
            let endpoint = config.endpoint();
            let endpoint = validate_required_field("source.endpoint", &endpoint)?;
            let source = HttpUserSource::new(*endpoint)
                .with_timeout(Duration::from_secs(config.timeout_seconds()))?
                .with_retry(
                    config.retry_attempts(),
                    Duration::from_millis(config.retry_delay_ms()),
                );
            Ok(Box::new(source))
        }
        SourceKind::File => {
            let file = config.file();
            let file = validate_required_field("source.file", &file)?;
            Ok(Box::new(FileUserSource::new(LocalStorage::new("."), *file)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                RosterError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_parse_users_json_shapes() {
        let list = parse_users_json(br#"[{"first_name":"Lee","last_name":"Earth"}]"#).unwrap();
        assert_eq!(list, vec![User::new("Lee", "Earth")]);

        let envelope =
            parse_users_json(br#"{"users":[{"first_name":"Ada","last_name":"Moon"}]}"#).unwrap();
        assert_eq!(envelope, vec![User::new("Ada", "Moon")]);

        let single = parse_users_json(br#"{"firstName":"Lee","lastName":"Earth"}"#).unwrap();
        assert_eq!(single, vec![User::new("Lee", "Earth")]);

        assert!(parse_users_json(b"[]").unwrap().is_empty());
        assert!(matches!(
            parse_users_json(br#"{"name":"Lee"}"#),
            Err(RosterError::ProcessingError { .. })
        ));
        assert!(matches!(
            parse_users_json(b"not json"),
            Err(RosterError::SerializationError(_))
        ));
    }

    #[test]
    fn test_parse_users_csv_keeps_row_order() {
        let data = b"first_name,last_name\nLee,Earth\n Ada , Moon \n";
        let users = parse_users_csv(data).unwrap();
        assert_eq!(
            users,
            vec![User::new("Lee", "Earth"), User::new("Ada", "Moon")]
        );
    }

    #[test]
    fn test_parse_users_csv_missing_column() {
        let data = b"first_name\nLee\n";
        assert!(matches!(parse_users_csv(data), Err(RosterError::CsvError(_))));
    }

    #[tokio::test]
    async fn test_static_source_default_fixture() {
        let users = StaticUserSource::default().fetch_users().await.unwrap();
        assert_eq!(users, vec![User::new("Lee", "Earth")]);
    }

    #[tokio::test]
    async fn test_http_source_successful_response() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"first_name": "Lee", "last_name": "Earth"},
                    {"first_name": "Ada", "last_name": "Moon"}
                ]));
        });

        let source = HttpUserSource::new(server.url("/users"));
        let users = source.fetch_users().await.unwrap();

        api_mock.assert();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0], User::new("Lee", "Earth"));
        assert_eq!(users[1], User::new("Ada", "Moon"));
    }

    #[tokio::test]
    async fn test_http_source_empty_list_is_not_replaced() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).json_body(serde_json::json!([]));
        });

        let users = HttpUserSource::new(server.url("/users"))
            .fetch_users()
            .await
            .unwrap();

        api_mock.assert();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_http_source_retries_server_errors() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(503);
        });

        let source = HttpUserSource::new(server.url("/users"))
            .with_retry(2, Duration::from_millis(10));
        let err = source.fetch_users().await.unwrap_err();

        api_mock.assert_hits(3);
        assert!(matches!(err, RosterError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_http_source_does_not_retry_client_errors() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(404);
        });

        let source = HttpUserSource::new(server.url("/users"))
            .with_retry(3, Duration::from_millis(10));
        let err = source.fetch_users().await.unwrap_err();

        api_mock.assert_hits(1);
        assert!(matches!(err, RosterError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_http_source_rejects_unexpected_shape() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200).json_body(serde_json::json!({"status": "ok"}));
        });

        let err = HttpUserSource::new(server.url("/users"))
            .fetch_users()
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn test_http_source_retries_rate_limited_responses() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(429);
        });

        let source = HttpUserSource::new(server.url("/users"))
            .with_retry(2, Duration::from_millis(10));
        let err = source.fetch_users().await.unwrap_err();

        api_mock.assert_hits(3);
        assert!(matches!(err, RosterError::HttpStatus { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_http_source_retries_connection_refused() {
        // 先綁定再釋放，取得一個沒有人監聽的埠
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpUserSource::new(format!("http://{}/users", addr))
            .with_retry(2, Duration::from_millis(10));
        let err = source.fetch_users().await.unwrap_err();

        assert!(matches!(err, RosterError::ApiError(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_http_source_times_out_slow_responses() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(serde_json::json!([]));
        });

        let source = HttpUserSource::new(server.url("/users"))
            .with_timeout(Duration::from_millis(200))
            .unwrap();
        let err = source.fetch_users().await.unwrap_err();

        match err {
            RosterError::ApiError(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_file_source_reads_csv_and_json() {
        let csv_storage = MockStorage::with_file("users.csv", b"first_name,last_name\nLee,Earth\n");
        let users = FileUserSource::new(csv_storage, "users.csv")
            .fetch_users()
            .await
            .unwrap();
        assert_eq!(users, vec![User::new("Lee", "Earth")]);

        let json_storage =
            MockStorage::with_file("users.json", br#"[{"first_name":"Lee","last_name":"Earth"}]"#);
        let users = FileUserSource::new(json_storage, "users.json")
            .fetch_users()
            .await
            .unwrap();
        assert_eq!(users, vec![User::new("Lee", "Earth")]);
    }

    #[tokio::test]
    async fn test_file_source_rejects_unknown_extension() {
        let storage = MockStorage::with_file("users.txt", b"Lee Earth");
        let err = FileUserSource::new(storage, "users.txt")
            .fetch_users()
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::InvalidConfigValueError { .. }));
    }
}
