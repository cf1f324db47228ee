use std::borrow::Cow;
use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Url;

use crate::error::{AppError, Context, Result};

#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: String,
    pub headers: HeaderMap,
}

/// Render `template` against `base_url` and attach the bearer headers for `token`.
///
/// Each `/`-separated piece of the template is rendered and pushed as one URL path
/// segment, so placeholder values are percent-encoded and cannot add segments.
pub fn prepare_request(
    base_url: &str,
    template: &str,
    params: &[(&str, Cow<'_, str>)],
    token: &str,
) -> Result<PreparedRequest> {
    let replacements: HashMap<String, String> = params
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.to_string()))
        .collect();

    let mut url =
        Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| AppError::message(format!("Base URL cannot carry a path: {base_url}")))?;
        segments.pop_if_empty();
        for piece in template.trim_start_matches('/').split('/') {
            segments.push(&render_template(piece, &replacements)?);
        }
    }

    let headers = bearer_headers(token)?;
    Ok(PreparedRequest {
        url: url.into(),
        headers,
    })
}

pub fn bearer_headers(token: &str) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    map.insert(AUTHORIZATION, value);
    map.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(map)
}

/// List the placeholder names used by `template`, validating its syntax.
pub fn template_placeholders(template: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    scan_template(template, |segment| {
        if let Segment::Placeholder(name) = segment {
            names.push(name.to_string());
        }
        Ok(())
    })?;
    Ok(names)
}

pub fn render_template(template: &str, replacements: &HashMap<String, String>) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    scan_template(template, |segment| {
        match segment {
            Segment::Literal(ch) => result.push(ch),
            Segment::Placeholder(key) => {
                let value = replacements.get(key).ok_or_else(|| {
                    AppError::message(format!(
                        "No replacement provided for placeholder `{}` in template",
                        key
                    ))
                })?;
                result.push_str(value);
            }
        }
        Ok(())
    })?;
    Ok(result)
}

enum Segment<'a> {
    Literal(char),
    Placeholder(&'a str),
}

fn scan_template<'a, F>(template: &'a str, mut visit: F) -> Result<()>
where
    F: FnMut(Segment<'a>) -> Result<()>,
{
    let mut chars = template.char_indices();

    while let Some((start, ch)) = chars.next() {
        if ch != '{' {
            visit(Segment::Literal(ch))?;
            continue;
        }

        let mut end = None;
        for (idx, next) in chars.by_ref() {
            if next == '}' {
                end = Some(idx);
                break;
            }
        }

        let Some(end) = end else {
            return Err(AppError::message(format!(
                "Unterminated placeholder in template: {}",
                &template[start..]
            )));
        };

        let key = &template[start + 1..end];
        if key.is_empty() {
            return Err(AppError::message(
                "Encountered empty placeholder `{}` in template",
            ));
        }
        visit(Segment::Placeholder(key))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_delete_path_with_encoded_id() {
        let prepared = prepare_request(
            "https://api.example.com/",
            "/api/expenses/delete/{id}",
            &[("id", Cow::Borrowed("65a1 b/2"))],
            "secret",
        )
        .expect("request prepares");

        assert_eq!(
            prepared.url,
            "https://api.example.com/api/expenses/delete/65a1%20b%2F2"
        );
        assert_eq!(
            prepared.headers.get(AUTHORIZATION).unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn keeps_base_path_prefix_and_trailing_slash() {
        let prepared = prepare_request("http://localhost:5000/v1/", "/api/expenses/", &[], "t")
            .expect("request prepares");
        assert_eq!(prepared.url, "http://localhost:5000/v1/api/expenses/");
    }

    #[test]
    fn reports_unterminated_placeholder() {
        let err = template_placeholders("/api/{id").expect_err("should fail");
        assert!(err.to_string().contains("Unterminated placeholder"));
    }

    #[test]
    fn reports_missing_replacement() {
        let err = render_template("/api/{id}", &HashMap::new()).expect_err("should fail");
        assert!(err.to_string().contains("`id`"));
    }

    #[test]
    fn lists_placeholders_in_order() {
        let names = template_placeholders("/a/{first}/b/{second}").unwrap();
        assert_eq!(names, vec!["first".to_string(), "second".to_string()]);
    }
}
