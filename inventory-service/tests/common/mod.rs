use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordPolicy;
use auth::SecretProvider;
use auth::TokenIssuer;
use auth::UppercaseAndDigit;
use inventory_service::domain::user::service::UserService;
use inventory_service::inbound::http::router::create_router;
use inventory_service::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
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

        let secrets = Arc::new(SecretProvider::new(Some(TEST_SECRET.to_string())));

        let authenticator = Arc::new(
            Authenticator::new(Arc::clone(&secrets))
                .with_policy(PasswordPolicy::new(8).with_rule(UppercaseAndDigit)),
        );

        let user_repo = Arc::new(InMemoryUserRepository::new());
        let user_service = Arc::new(UserService::new(user_repo, Arc::clone(&authenticator)));

        let gate = authenticator.gate();
        let router = create_router(user_service, gate);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            token_issuer: TokenIssuer::new(secrets),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token and no cookie store
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().get(self.url(path)).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token and no cookie store
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().put(self.url(path)).bearer_auth(token)
    }

    /// Register an account through the API
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/users/signup")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in through the API
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/users/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
