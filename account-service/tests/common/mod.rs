use std::sync::Arc;
use std::time::Duration;

use account_service::domain::account::service::CredentialService;
use account_service::domain::identity::filter::AuthenticationFilter;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryAccountRepository;
use auth::HashCost;
use auth::ManualClock;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::TimeZone;
use chrono::Utc;
use serde_json::json;

const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    /// Clock shared by every token the server issues or verifies
    pub clock: Arc<ManualClock>,
    /// Codec with the server's secret, for minting tokens directly
    pub token_codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::at(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let ttl = chrono::Duration::minutes(60);
        let server_codec = Arc::new(TokenCodec::with_clock(TEST_SECRET, ttl, clock.clone()));

        let repository = Arc::new(InMemoryAccountRepository::new());

        // Cheap hashing keeps the suite fast
        let password_hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to create password hasher");

        let credential_service = Arc::new(
            CredentialService::new(
                Arc::clone(&repository),
                password_hasher,
                Arc::clone(&server_codec),
            )
            .expect("Failed to create credential service"),
        );
        let authentication_filter = Arc::new(AuthenticationFilter::new(
            server_codec,
            repository,
            Duration::from_secs(2),
        ));

        let router = create_router(credential_service, authentication_filter);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let token_codec = TokenCodec::with_clock(TEST_SECRET, ttl, clock.clone());

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            clock,
            token_codec,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make GET request with a raw Authorization header
    pub fn get_with_authorization(&self, path: &str, value: &str) -> reqwest::RequestBuilder {
        self.get(path).header(reqwest::header::AUTHORIZATION, value)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username_or_email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "username_or_email": username_or_email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and return a token issued for it
    pub async fn register_and_login(&self, username: &str, email: &str, password: &str) -> String {
        let response = self.register(username, email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}
