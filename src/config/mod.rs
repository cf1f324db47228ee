use std::path::{Path, PathBuf};

pub mod loader;
pub mod validator;

pub use loader::{apply_env_overrides, ENV_API_URL, ENV_TOKEN_PATH};
pub use validator::validate_config;

use crate::error::Result;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_AVATAR_URL: &str = "https://res.cloudinary.com/dmdsoq8cj/image/upload/v1726251247/todo/uploads/profile_picture/jbhzs6zunn0n86xkgjwv.jpg";

/// Path templates for every endpoint the client talks to, relative to `api_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub list_expenses: String,
    pub delete_expense: String,
    pub user_details: String,
    pub update_profile_picture: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            list_expenses: "/api/expenses/".to_string(),
            delete_expense: "/api/expenses/delete/{id}".to_string(),
            user_details: "/api/users/users/mydetails".to_string(),
            update_profile_picture: "/api/users/update-profile-picture".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token_path: PathBuf,
    pub default_avatar_url: String,
    pub endpoints: EndpointConfig,
}

impl Config {
    pub fn builtin() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_path: default_token_path(),
            default_avatar_url: DEFAULT_AVATAR_URL.to_string(),
            endpoints: EndpointConfig::default(),
        }
    }

    /// Layer builtin defaults, an optional JSON file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::builtin();
        if let Some(path) = path {
            loader::apply_file(&mut config, path)?;
        }
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());
        validate_config(&config)?;
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self> {
        self.api_url = api_url.into();
        validate_config(&self)?;
        Ok(self)
    }

    /// Base URL without a trailing slash so endpoint paths can be appended directly.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

fn default_token_path() -> PathBuf {
    let base = dirs::home_dir().unwrap_or_else(|| {
        log::warn!("Could not find home directory; keeping the session under the temp directory");
        std::env::temp_dir()
    });
    base.join(".expense-cli").join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_is_valid() {
        let config = Config::builtin();
        validate_config(&config).expect("builtin config validates");
        assert!(config.token_path.ends_with(".expense-cli/session.json"));
        assert!(config.token_path.is_absolute());
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = Config::builtin()
            .with_api_url("https://api.example.com/")
            .expect("valid url");
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn with_api_url_rejects_bad_scheme() {
        let err = Config::builtin()
            .with_api_url("ftp://example.com")
            .expect_err("scheme should be rejected");
        assert!(err.to_string().contains("http"), "unexpected error: {err}");
    }
}
