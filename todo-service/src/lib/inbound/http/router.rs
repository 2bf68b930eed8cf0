use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::google::login_google;
use super::handlers::google::register_google;
use super::handlers::health::health;
use super::handlers::login::login_access_token;
use super::handlers::login::refresh_access_token;
use super::handlers::login::verify_account;
use super::handlers::password_recovery::recover_password;
use super::handlers::password_recovery::reset_password;
use super::handlers::todos::create_todo;
use super::handlers::todos::delete_todo;
use super::handlers::todos::get_todo;
use super::handlers::todos::list_todos;
use super::handlers::todos::resolve_todo;
use super::handlers::todos::update_todo;
use super::handlers::users::delete_me;
use super::handlers::users::delete_user;
use super::handlers::users::get_me;
use super::handlers::users::get_user;
use super::handlers::users::list_users;
use super::handlers::users::register_user;
use super::handlers::users::update_me;
use super::handlers::users::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::models::AuthSettings;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::EmailSender;
use crate::domain::auth::ports::IdentityProvider;
use crate::domain::auth::service::AuthService;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::todo::service::TodoService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub todo_service: Arc<dyn TodoServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
}

impl AppState {
    /// Wire the domain services over the given adapters.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `todos` - To-do persistence implementation
    /// * `email_sender` - Outgoing mail implementation
    /// * `identity_provider` - OAuth userinfo implementation
    /// * `authenticator` - Password hashing and token minting
    /// * `settings` - Email switches and link prefix
    pub fn new<UR, TR, ES, IP>(
        users: Arc<UR>,
        todos: Arc<TR>,
        email_sender: Arc<ES>,
        identity_provider: Arc<IP>,
        authenticator: Arc<Authenticator>,
        settings: AuthSettings,
    ) -> Self
    where
        UR: UserRepository,
        TR: TodoRepository,
        ES: EmailSender,
        IP: IdentityProvider,
    {
        Self {
            user_service: Arc::new(UserService::new(Arc::clone(&users))),
            todo_service: Arc::new(TodoService::new(todos)),
            auth_service: Arc::new(AuthService::new(
                users,
                email_sender,
                identity_provider,
                authenticator,
                settings,
            )),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/users", post(register_user))
        .route("/api/users/google", post(register_google))
        .route("/api/login/token", post(login_access_token))
        .route("/api/login/refresh_token", post(refresh_access_token))
        .route("/api/login/google", post(login_google))
        .route("/api/verify_account", post(verify_account))
        .route("/api/password_recovery", post(recover_password))
        .route("/api/password_reset", post(reset_password));

    let protected_routes = Router::new()
        .route("/api/users", get(list_users))
        .route(
            "/api/users/me",
            get(get_me).put(update_me).delete(delete_me),
        )
        .route(
            "/api/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/todos", post(create_todo).get(list_todos))
        .route(
            "/api/todos/:todo_id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/todos/:todo_id/resolve", put(resolve_todo))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
