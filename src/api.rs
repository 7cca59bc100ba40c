// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::errors::{TrackerError, TrackerResult};
use crate::models::{Record, RecordKind, UserProfile};
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use reqwest::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::path::Path;

const UA: &str = concat!(
    "spendwise/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/spendwise)"
);

/// What the backend handed out at login. Replayed on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.cookie.is_none() && self.token.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: UserProfile,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub credentials: Credentials,
}

/// Backend operations for one record kind.
pub trait RecordService<R: Record> {
    fn fetch_all(&self) -> TrackerResult<Vec<R>>;
    fn create(&self, draft: &R::Draft) -> TrackerResult<R>;
    fn remove(&self, id: &str) -> TrackerResult<()>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Config,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(config: &Config) -> TrackerResult<Self> {
        let mut builder = Client::builder().timeout(config.timeout).user_agent(UA);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config: config.clone(),
            credentials: Credentials::default(),
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        tracing::debug!(%method, %url, "backend request");
        let mut rb = self.http.request(method, url);
        if let Some(cookie) = &self.credentials.cookie {
            rb = rb.header(COOKIE, cookie);
        }
        if let Some(token) = &self.credentials.token {
            rb = rb.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        rb
    }

    fn send(&self, rb: RequestBuilder) -> TrackerResult<Response> {
        let resp = rb.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        tracing::warn!(status = status.as_u16(), %message, "backend rejected request");
        Err(TrackerError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub fn login(&self, email: &str, password: &str) -> TrackerResult<LoginOutcome> {
        let resp = self.send(
            self.request(Method::POST, "/login")
                .json(&LoginRequest { email, password }),
        )?;
        let cookie = session_cookie(&resp);
        let body: LoginResponse = resp.json()?;
        tracing::info!(email = body.user.email.as_str(), "logged in");
        Ok(LoginOutcome {
            user: body.user,
            credentials: Credentials {
                cookie,
                token: body.token,
            },
        })
    }

    pub fn register(&self, req: &RegisterRequest) -> TrackerResult<()> {
        self.send(self.request(Method::POST, "/register").json(req))?;
        tracing::info!(email = req.email.as_str(), "registered");
        Ok(())
    }

    pub fn logout(&self) -> TrackerResult<()> {
        self.send(self.request(Method::POST, "/logout"))?;
        Ok(())
    }

    /// Sends the file as multipart field `image`; returns the stored URL when
    /// the backend reports one.
    pub fn upload_profile_image(&self, path: &Path) -> TrackerResult<Option<String>> {
        let form = multipart::Form::new().file("image", path)?;
        let resp = self.send(self.request(Method::POST, "/upload").multipart(form))?;
        let text = resp.text()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let body: UploadResponse = serde_json::from_str(&text)?;
        Ok(body.image_url)
    }

    pub fn change_password(&self, current: &str, new: &str) -> TrackerResult<()> {
        self.send(
            self.request(Method::POST, "/change-password")
                .json(&ChangePasswordRequest {
                    current_password: current,
                    new_password: new,
                }),
        )?;
        Ok(())
    }

    pub fn list<R: Record>(&self) -> TrackerResult<Vec<R>> {
        let path = format!("/{}/get", R::KIND.resource());
        let records: Vec<R> = self.send(self.request(Method::GET, &path))?.json()?;
        tracing::debug!(kind = %R::KIND, count = records.len(), "fetched records");
        Ok(records)
    }

    pub fn add<R: Record>(&self, draft: &R::Draft) -> TrackerResult<R> {
        let path = format!("/{}/add", R::KIND.resource());
        let created: R = self
            .send(self.request(Method::POST, &path).json(draft))?
            .json()?;
        tracing::info!(kind = %R::KIND, id = created.id(), "record added");
        Ok(created)
    }

    pub fn delete<R: Record>(&self, id: &str) -> TrackerResult<()> {
        let path = format!("/{}/{}", R::KIND.resource(), checked_id(id)?);
        self.send(self.request(Method::DELETE, &path))?;
        tracing::info!(kind = %R::KIND, id, "record deleted");
        Ok(())
    }

    /// Raw spreadsheet bytes from `/<resource>/downloadexcel`.
    pub fn download_report(&self, kind: RecordKind) -> TrackerResult<Vec<u8>> {
        let path = format!("/{}/downloadexcel", kind.resource());
        let bytes = self.send(self.request(Method::GET, &path))?.bytes()?;
        Ok(bytes.to_vec())
    }
}

impl<R: Record> RecordService<R> for ApiClient {
    fn fetch_all(&self) -> TrackerResult<Vec<R>> {
        self.list::<R>()
    }

    fn create(&self, draft: &R::Draft) -> TrackerResult<R> {
        self.add::<R>(draft)
    }

    fn remove(&self, id: &str) -> TrackerResult<()> {
        self.delete::<R>(id)
    }
}

fn checked_id(id: &str) -> TrackerResult<&str> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '?', '#']) || id.chars().any(char::is_whitespace) {
        return Err(TrackerError::validation(format!("Invalid record id '{}'", id)));
    }
    Ok(id)
}

/// `name=value` pairs from every `Set-Cookie`, ready for a `Cookie` header.
fn session_cookie(resp: &Response) -> Option<String> {
    let pairs: Vec<&str> = resp
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

fn error_message(body: &str) -> Option<String> {
    if let Ok(ErrorBody { message: Some(m) }) = serde_json::from_str::<ErrorBody>(body) {
        return Some(m);
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 && !trimmed.starts_with('<') {
        return Some(trimmed.to_string());
    }
    None
}
