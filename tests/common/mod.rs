#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use companies_api::auth::{generate_jwt, Claims};
use companies_api::config::AppConfig;
use companies_api::database::{CompanyStore, MemoryCompanyStore, StoreError};
use companies_api::models::{Company, CompanyPatch, CompanySearchFilters, CompanyWithJobs, NewCompany};
use companies_api::{app, AppState};

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.api.enable_request_logging = false;
    config
}

/// Wraps the in-memory store and counts every call that reaches it
pub struct CountingStore {
    inner: Arc<MemoryCompanyStore>,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompanyStore for CountingStore {
    async fn create(&self, company: NewCompany) -> Result<Company, StoreError> {
        self.hit();
        self.inner.create(company).await
    }

    async fn find_all(&self, filters: &CompanySearchFilters) -> Result<Vec<Company>, StoreError> {
        self.hit();
        self.inner.find_all(filters).await
    }

    async fn get(&self, handle: &str) -> Result<CompanyWithJobs, StoreError> {
        self.hit();
        self.inner.get(handle).await
    }

    async fn update(&self, handle: &str, patch: CompanyPatch) -> Result<Company, StoreError> {
        self.hit();
        self.inner.update(handle, patch).await
    }

    async fn remove(&self, handle: &str) -> Result<(), StoreError> {
        self.hit();
        self.inner.remove(handle).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

/// Router backed by a fresh in-memory store.
/// `store` bypasses the call counter so seeding does not show up in `store_calls`.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCompanyStore>,
    calls: Arc<AtomicUsize>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryCompanyStore::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = CountingStore {
            inner: store.clone(),
            calls: calls.clone(),
        };

        let state = AppState::new(Arc::new(counting), test_config()).expect("bundled schemas compile");

        Self {
            router: app(state),
            store,
            calls,
        }
    }

    /// c1 (1 employee), c2 (2), c3 (3); c1 has two jobs
    pub async fn seeded() -> Result<Self> {
        let app = Self::new();
        for n in 1..=3 {
            app.store
                .create(NewCompany {
                    handle: format!("c{}", n),
                    name: format!("C{}", n),
                    description: format!("Desc{}", n),
                    num_employees: Some(n),
                    logo_url: Some(format!("http://c{}.img", n)),
                })
                .await?;
        }
        app.store.add_job("c1", "Job1", Some(100), Some("0.1")).await?;
        app.store.add_job("c1", "Job2", Some(200), None).await?;
        Ok(app)
    }

    pub fn store_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let raw = body.map(|b| b.to_string());
        self.send_raw(method, uri, token, raw).await
    }

    /// Send an arbitrary body string labelled as JSON
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(raw) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(raw))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse { status, body })
    }
}

pub fn token() -> String {
    token_for("u1", false)
}

pub fn admin_token() -> String {
    token_for("admin", true)
}

pub fn token_for(username: &str, is_admin: bool) -> String {
    generate_jwt(&Claims::new(username, is_admin, 1), JWT_SECRET).expect("token signs")
}

pub fn expired_token() -> String {
    let mut claims = Claims::new("u1", false, 1);
    claims.iat -= 7200;
    claims.exp = claims.iat + 60;
    generate_jwt(&claims, JWT_SECRET).expect("token signs")
}

pub fn acme() -> Value {
    json!({ "handle": "acme", "name": "Acme", "numEmployees": 10 })
}
