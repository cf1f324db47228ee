use crate::api::request::template_placeholders;
use crate::error::{AppError, Result};

use super::Config;

/// Validate a fully merged configuration and surface every problem at once.
pub fn validate_config(config: &Config) -> Result<()> {
    let mut issues = Vec::new();

    validate_api_url(&config.api_url, &mut issues);
    validate_endpoint(
        "endpoints.list_expenses",
        &config.endpoints.list_expenses,
        &[],
        &mut issues,
    );
    validate_endpoint(
        "endpoints.delete_expense",
        &config.endpoints.delete_expense,
        &["id"],
        &mut issues,
    );
    validate_endpoint(
        "endpoints.user_details",
        &config.endpoints.user_details,
        &[],
        &mut issues,
    );
    validate_endpoint(
        "endpoints.update_profile_picture",
        &config.endpoints.update_profile_picture,
        &[],
        &mut issues,
    );

    if config.token_path.as_os_str().is_empty() {
        issues.push("token_path must not be empty".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "configuration invalid:\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_api_url(url: &str, issues: &mut Vec<String>) {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        issues.push("api_url must not be empty".to_string());
        return;
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        issues.push(format!("api_url `{trimmed}` must start with http:// or https://"));
    }
}

fn validate_endpoint(label: &str, template: &str, required: &[&str], issues: &mut Vec<String>) {
    if !template.starts_with('/') {
        issues.push(format!("{label} `{template}` must start with `/`"));
    }

    let placeholders = match template_placeholders(template) {
        Ok(placeholders) => placeholders,
        Err(err) => {
            issues.push(format!("{label}: {err}"));
            return;
        }
    };

    for name in &placeholders {
        if !required.contains(&name.as_str()) {
            issues.push(format!("{label} uses unknown placeholder `{{{name}}}`"));
        }
    }
    for name in required {
        if !placeholders.iter().any(|p| p == name) {
            issues.push(format!("{label} must reference `{{{name}}}`"));
        }
    }
}
