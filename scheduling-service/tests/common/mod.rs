//! Test helper module for scheduling-service integration tests.
//!
//! Spawns the real router on a random port with in-memory collaborators.

#![allow(dead_code)]

use scheduling_service::config::{SchedulingConfig, SupabaseConfig};
use scheduling_service::services::{MockDirectory, MockIdentityProvider};
use scheduling_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub identity: Arc<MockIdentityProvider>,
    pub directory: Arc<MockDirectory>,
    pub client: reqwest::Client,
}

pub fn test_config() -> SchedulingConfig {
    SchedulingConfig {
        common: CoreConfig { port: 0 },
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        supabase: SupabaseConfig {
            url: "http://supabase.test.local".to_string(),
            service_role_key: Secret::new("test-service-role-key".to_string()),
            users_table: "users".to_string(),
            timeout_secs: Some(5),
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(MockIdentityProvider::new(), MockDirectory::new()).await
    }

    pub async fn spawn_with(identity: MockIdentityProvider, directory: MockDirectory) -> Self {
        let identity = Arc::new(identity);
        let directory = Arc::new(directory);

        let app = Application::with_providers(test_config(), identity.clone(), directory.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            identity,
            directory,
            client,
        }
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> reqwest::Response {
        self.post_json(
            "/auth/sign-up",
            &serde_json::json!({
                "email": email,
                "password": password,
                "full_name": full_name
            }),
        )
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json(
            "/auth/sign-in",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
