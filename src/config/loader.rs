use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::error::{Context, Result};

use super::Config;

pub const ENV_API_URL: &str = "EXPENSE_API_URL";
pub const ENV_TOKEN_PATH: &str = "EXPENSE_TOKEN_PATH";

/// Merge the JSON configuration file at `path` into `config`. Absent keys keep their current value.
pub fn apply_file(config: &mut Config, path: &Path) -> Result<()> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let raw: RawConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    raw.merge_into(config);
    log::debug!("loaded configuration from {}", path.display());
    Ok(())
}

/// Apply `EXPENSE_API_URL` / `EXPENSE_TOKEN_PATH` through the supplied lookup.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|value| !value.trim().is_empty()) {
        config.api_url = url.trim().to_string();
    }
    if let Some(path) = lookup(ENV_TOKEN_PATH).filter(|value| !value.trim().is_empty()) {
        config.token_path = PathBuf::from(path.trim());
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    token_path: Option<PathBuf>,
    #[serde(default)]
    default_avatar_url: Option<String>,
    #[serde(default)]
    endpoints: RawEndpoints,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawEndpoints {
    list_expenses: Option<String>,
    delete_expense: Option<String>,
    user_details: Option<String>,
    update_profile_picture: Option<String>,
}

impl RawConfig {
    fn merge_into(self, config: &mut Config) {
        if let Some(url) = self.api_url {
            config.api_url = url;
        }
        if let Some(path) = self.token_path {
            config.token_path = path;
        }
        if let Some(avatar) = self.default_avatar_url {
            config.default_avatar_url = avatar;
        }

        let endpoints = &mut config.endpoints;
        if let Some(value) = self.endpoints.list_expenses {
            endpoints.list_expenses = value;
        }
        if let Some(value) = self.endpoints.delete_expense {
            endpoints.delete_expense = value;
        }
        if let Some(value) = self.endpoints.user_details {
            endpoints.user_details = value;
        }
        if let Some(value) = self.endpoints.update_profile_picture {
            endpoints.update_profile_picture = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_overrides_only_present_keys() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "api_url": "https://finance.example.com",
                "endpoints": {{ "delete_expense": "/api/expenses//delete/{{id}}" }}
            }}"#
        )
        .expect("write config");

        let mut config = Config::builtin();
        apply_file(&mut config, file.path()).expect("config applies");

        assert_eq!(config.api_url, "https://finance.example.com");
        assert_eq!(
            config.endpoints.delete_expense,
            "/api/expenses//delete/{id}"
        );
        assert_eq!(config.endpoints.list_expenses, "/api/expenses/");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "apiUrl": "https://finance.example.com" }}"#).expect("write config");

        let mut config = Config::builtin();
        let err = apply_file(&mut config, file.path()).expect_err("unknown key");
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn env_overrides_skip_blank_values() {
        let mut config = Config::builtin();
        let original_path = config.token_path.clone();

        apply_env_overrides(&mut config, |name| match name {
            ENV_API_URL => Some(" https://env.example.com ".to_string()),
            ENV_TOKEN_PATH => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.api_url, "https://env.example.com");
        assert_eq!(config.token_path, original_path);
    }
}
