#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenKind;
use auth::TokenLifetimes;
use todo_service::domain::auth::errors::EmailSendError;
use todo_service::domain::auth::errors::ProviderError;
use todo_service::domain::auth::models::AuthSettings;
use todo_service::domain::auth::models::ProviderIdentity;
use todo_service::domain::auth::ports::EmailSender;
use todo_service::domain::auth::ports::IdentityProvider;
use todo_service::inbound::http::router::create_router;
use todo_service::inbound::http::router::AppState;
use todo_service::repositories::InMemoryStore;
use todo_service::user::models::CreateUserCommand;
use todo_service::user::models::EmailAddress;
use todo_service::user::models::User;
use todo_service::user::ports::UserRepository;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_BASE_URL: &str = "http://testserver/api";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub state: AppState,
    pub store: InMemoryStore,
    pub authenticator: Arc<Authenticator>,
    pub mailbox: Arc<RecordingEmailSender>,
    pub identity_provider: Arc<StubIdentityProvider>,
}

/// Mail captured by the recording sender
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email sender that keeps every message for later inspection
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().expect("mailbox lock").clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailSendError> {
        self.sent.lock().expect("mailbox lock").push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Identity provider that vouches for a fixed set of access tokens
#[derive(Default)]
pub struct StubIdentityProvider {
    identities: Mutex<Vec<(String, ProviderIdentity)>>,
}

impl StubIdentityProvider {
    pub fn vouch(&self, access_token: &str, email: &str, name: Option<&str>) {
        self.identities.lock().expect("provider lock").push((
            access_token.to_string(),
            ProviderIdentity {
                email: email.to_string(),
                name: name.map(str::to_string),
            },
        ));
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, ProviderError> {
        self.identities
            .lock()
            .expect("provider lock")
            .iter()
            .find(|(token, _)| token == access_token)
            .map(|(_, identity)| identity.clone())
            .ok_or_else(|| ProviderError::Rejected("401 Unauthorized".to_string()))
    }
}

impl TestApp {
    /// Spawn with outgoing mail enabled and no verification step
    pub async fn spawn() -> Self {
        Self::spawn_with(AuthSettings {
            emails_enabled: true,
            verification_required: false,
            base_url: TEST_BASE_URL.to_string(),
        })
        .await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(settings: AuthSettings) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().expect("local address").port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = InMemoryStore::new();
        let authenticator = Arc::new(Authenticator::with_lifetimes(
            TEST_SECRET,
            TokenLifetimes::default(),
        ));
        let mailbox = Arc::new(RecordingEmailSender::default());
        let identity_provider = Arc::new(StubIdentityProvider::default());

        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::clone(&mailbox),
            Arc::clone(&identity_provider),
            Arc::clone(&authenticator),
            settings,
        );
        let router = create_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            state,
            store,
            authenticator,
            mailbox,
            identity_provider,
        }
    }

    /// Create a user straight through the service, bypassing registration
    pub async fn create_user(&self, email: &str, password: &str, is_superuser: bool) -> User {
        self.state
            .user_service
            .create_user(CreateUserCommand {
                email: EmailAddress::new(email.to_string()).expect("valid email"),
                full_name: None,
                password: password.to_string(),
                is_superuser,
                is_verified: true,
            })
            .await
            .expect("Failed to create user")
    }

    /// Mark a stored user inactive
    pub async fn deactivate(&self, user: &User) {
        let mut user = user.clone();
        user.is_active = false;
        UserRepository::update(&self.store, user)
            .await
            .expect("Failed to deactivate user");
    }

    /// Mint an access token for a user without logging in
    pub fn access_token_for(&self, user: &User) -> String {
        self.authenticator
            .issue(TokenKind::Access, &user.id.to_string())
            .expect("Failed to create test token")
    }

    /// Log in through the API and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/login/token")
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }

    /// Create a user and return it with a fresh access token
    pub async fn user_with_token(&self, email: &str) -> (User, String) {
        let user = self.create_user(email, "password123", false).await;
        let token = self.access_token_for(&user);
        (user, token)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.put(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.delete(path).bearer_auth(token)
    }
}

/// Pull the `token` query parameter out of a link carried in a mail body
pub fn token_from_body(body: &str) -> String {
    body.split("token=")
        .nth(1)
        .expect("mail carries a token link")
        .split_whitespace()
        .next()
        .expect("token value")
        .to_string()
}
