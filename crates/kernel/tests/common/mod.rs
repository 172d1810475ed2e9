#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] assembles the real router and handlers over in-memory stores,
//! an in-memory session store and a temporary upload directory, so the tests
//! need neither PostgreSQL nor Redis.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use tower_sessions::cookie::SameSite;
use uuid::Uuid;

use copsewood_kernel::file::{LocalFileStorage, UploadPolicy};
use copsewood_kernel::models::{Admin, Bird, BirdFields, Product, ProductFields};
use copsewood_kernel::services::Mailer;
use copsewood_kernel::session::session_layer;
use copsewood_kernel::store::{MemoryRepository, Repository};
use copsewood_kernel::theme::ThemeEngine;
use copsewood_kernel::{AppState, StateParts, Stores, build_router};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const CONTACT_RECIPIENT: &str = "aviary@example.com";

/// One email captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mailer that records messages instead of sending them.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("smtp relay refused the message");
        }
        self.sent.lock().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Test application wrapper using the REAL routes and state.
///
/// Cookies set by responses are kept and sent with later requests, like a
/// browser would.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub birds: Arc<MemoryRepository<Bird>>,
    pub products: Arc<MemoryRepository<Product>>,
    pub admins: Arc<MemoryRepository<Admin>>,
    pub mailer: Arc<RecordingMailer>,
    pub uploads_dir: PathBuf,
    cookies: Mutex<BTreeMap<String, String>>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(true)
    }

    /// Build the app; without a mailer the contact form reports failure.
    pub fn with_mailer(mailer_configured: bool) -> Self {
        let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
        let uploads_dir = std::env::temp_dir().join(format!("copsewood-test-{}", Uuid::now_v7()));

        let birds = Arc::new(MemoryRepository::<Bird>::new());
        let products = Arc::new(MemoryRepository::<Product>::new());
        let admins = Arc::new(MemoryRepository::<Admin>::new());
        let mailer = Arc::new(RecordingMailer::default());

        let theme = ThemeEngine::new(&project_root.join("templates"), "/uploads")
            .expect("templates should load");

        let state = AppState::from_parts(StateParts {
            stores: Stores {
                birds: birds.clone(),
                products: products.clone(),
                admins: admins.clone(),
            },
            theme,
            files: Arc::new(LocalFileStorage::new(&uploads_dir, "/uploads")),
            upload_policy: UploadPolicy::default(),
            jwt_secret: JWT_SECRET.to_string(),
            mailer: mailer_configured.then(|| mailer.clone() as Arc<dyn Mailer>),
            contact_recipient: CONTACT_RECIPIENT.to_string(),
            cookie_secure: false,
            static_dir: project_root.join("static"),
            uploads_dir: uploads_dir.clone(),
        });

        let router = build_router(
            state.clone(),
            session_layer(MemoryStore::default(), SameSite::Lax, false),
        );

        Self {
            router,
            state,
            birds,
            products,
            admins,
            mailer,
            uploads_dir,
            cookies: Mutex::new(BTreeMap::new()),
        }
    }

    /// Send a request with the stored cookies and remember any new ones.
    pub async fn request(&self, mut request: Request<Body>) -> Response {
        let cookie_header = self.cookie_header();
        if !cookie_header.is_empty() {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie_header.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        self.remember_cookies(&response);
        response
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        self.request(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// POST a `multipart/form-data` body.
    pub async fn post_multipart(&self, uri: &str, form: MultipartForm) -> Response {
        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, form.content_type())
                .body(Body::from(form.finish()))
                .unwrap(),
        )
        .await
    }

    /// Store an admin directly, bypassing the API.
    pub async fn create_admin(&self, username: &str, password: &str) -> Admin {
        let admin = Admin::new(username, password, None).unwrap();
        self.admins.save(&admin).await.unwrap();
        admin
    }

    /// Create an admin and log in as them through the login form.
    pub async fn login_as_new_admin(&self, username: &str, password: &str) -> Admin {
        let admin = self.create_admin(username, password).await;
        let response = self
            .post_form(
                "/api/admins/login",
                &[("username", username), ("password", password)],
            )
            .await;
        assert_eq!(location(&response), "/admin-panel", "login should succeed");
        admin
    }

    pub async fn seed_bird(&self, breed: &str, name: Option<&str>, price: f64) -> Bird {
        let bird = Bird::new(
            BirdFields {
                breed: breed.to_string(),
                name: name.map(str::to_string),
                price,
                description: format!("A lovely {breed}"),
            },
            Vec::new(),
        );
        self.birds.save(&bird).await.unwrap();
        bird
    }

    pub async fn seed_product(&self, name: &str, category: Option<&str>, price: f64) -> Product {
        let product = Product::new(ProductFields {
            name: name.to_string(),
            category: category.map(str::to_string),
            price,
            description: String::new(),
        });
        self.products.save(&product).await.unwrap();
        product
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.lock().contains_key(name)
    }

    pub fn clear_cookies(&self) {
        self.cookies.lock().clear();
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .lock()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn remember_cookies(&self, response: &Response) {
        let mut jar = self.cookies.lock();
        for raw in response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
        {
            let Some((name, value)) = raw.split(';').next().and_then(|kv| kv.split_once('='))
            else {
                continue;
            };
            let removed = value.is_empty() || raw.to_ascii_lowercase().contains("max-age=0");
            if removed {
                jar.remove(name.trim());
            } else {
                jar.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.uploads_dir);
    }
}

/// Hand-built multipart body.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("----copsewood{}", Uuid::now_v7().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

/// Smallest valid PNG: magic bytes plus an IHDR chunk header.
pub fn png_bytes() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
    data.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]);
    data
}

/// `Location` header of a redirect, or "" when there is none.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}

pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}
