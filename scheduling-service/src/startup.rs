//! Application startup and lifecycle management.

use crate::config::SchedulingConfig;
use crate::handlers::{self, employees, schedules};
use crate::services::{
    http_client, DirectoryStore, IdentityProvider, PostgrestDirectory, SupabaseIdentity,
};
use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state. Built once at startup, read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub directory: Arc<dyn DirectoryStore>,
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(handlers::sign_up))
        .route("/auth/sign-in", post(handlers::sign_in))
        .route("/auth/sign-out", post(handlers::sign_out))
}

fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/employees/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
}

fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/schedules",
            get(schedules::week_schedules).post(schedules::create_schedule),
        )
        .route("/schedules/month", get(schedules::month_schedules))
        .route("/schedules/:id", put(schedules::update_schedule))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(auth_routes())
        .merge(employee_routes())
        .merge(schedule_routes())
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the configured Supabase project.
    pub async fn build(config: SchedulingConfig) -> Result<Self, AppError> {
        let client = http_client(&config.supabase).map_err(|e| {
            tracing::error!("Failed to build provider HTTP client: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        let identity: Arc<dyn IdentityProvider> =
            Arc::new(SupabaseIdentity::new(client.clone(), &config.supabase));
        let directory: Arc<dyn DirectoryStore> =
            Arc::new(PostgrestDirectory::new(client, &config.supabase));

        tracing::info!(
            provider = %config.supabase.url,
            users_table = %config.supabase.users_table,
            "Identity provider configured"
        );

        Self::with_providers(config, identity, directory).await
    }

    /// Build the application with explicit collaborators (tests, local runs).
    pub async fn with_providers(
        config: SchedulingConfig,
        identity: Arc<dyn IdentityProvider>,
        directory: Arc<dyn DirectoryStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        // Port 0 binds a random port; report the real one.
        let port = listener.local_addr()?.port();

        let state = AppState {
            identity,
            directory,
        };
        let router = build_router(state);

        tracing::info!("Server is running on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until the process is killed.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await
    }
}
