// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{TrackerError, TrackerResult};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendwise", "spendwise"));

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const ENV_BACKEND_URL: &str = "SPENDWISE_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "SPENDWISE_TIMEOUT_SECS";
pub const ENV_DATA_DIR: &str = "SPENDWISE_DATA_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub timeout: Duration,
    pub data_dir: PathBuf,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Config {
    pub fn new(backend_url: &str, timeout: Duration, data_dir: PathBuf) -> Self {
        Self {
            backend_url: normalize_base_url(backend_url),
            timeout,
            data_dir,
            system_proxy: true,
        }
    }

    /// Talk to the backend directly, ignoring proxy environment variables.
    pub fn without_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }

    /// Environment first (after `.env`), then platform defaults.
    /// `backend_override` comes from `--backend` and wins over both.
    pub fn load(backend_override: Option<&str>) -> TrackerResult<Self> {
        dotenvy::dotenv().ok();

        let backend_url = match backend_override {
            Some(url) => url.to_string(),
            None => std::env::var(ENV_BACKEND_URL)
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
        };

        let timeout_secs = match std::env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                TrackerError::Config(format!("{} must be whole seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let data_dir = match std::env::var(ENV_DATA_DIR) {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(TrackerError::Config(format!(
                "Backend URL '{}' must start with http:// or https://",
                backend_url
            )));
        }

        Ok(Self::new(
            &backend_url,
            Duration::from_secs(timeout_secs),
            data_dir,
        ))
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Joins an endpoint path such as `/income/get` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.backend_url, path.trim_start_matches('/'))
    }
}

fn default_data_dir() -> TrackerResult<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        TrackerError::Config("Could not determine platform-specific data dir".into())
    })?;
    Ok(proj.data_dir().to_path_buf())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
