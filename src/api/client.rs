use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};

use crate::config::{Config, EndpointConfig};
use crate::error::{AppError, Context, Result};

use super::models::{Envelope, Expense, PictureUpdated, PictureUpload, UserDetails};
use super::request::{prepare_request, PreparedRequest};

/// Multipart field name the profile endpoint expects.
pub const PROFILE_PICTURE_FIELD: &str = "profile_picture";

/// Remote operations consumed by the workflows. Every call carries the bearer token it should use.
#[async_trait]
pub trait ExpenseApi: Send + Sync {
    async fn list_expenses(&self, token: &str) -> Result<Vec<Expense>>;

    async fn delete_expense(&self, token: &str, id: &str) -> Result<()>;

    async fn user_details(&self, token: &str) -> Result<UserDetails>;

    async fn update_profile_picture(
        &self,
        token: &str,
        upload: PictureUpload,
    ) -> Result<PictureUpdated>;
}

/// reqwest-backed implementation talking to the configured API host.
pub struct HttpClient {
    client: Client,
    base_url: String,
    endpoints: EndpointConfig,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("expense-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to construct HTTP client")?;
        Ok(Self::with_client(client, config))
    }

    /// Use a caller-built reqwest client, e.g. one with custom proxy settings.
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url().to_string(),
            endpoints: config.endpoints.clone(),
        }
    }

    fn prepare(
        &self,
        template: &str,
        params: &[(&str, Cow<'_, str>)],
        token: &str,
    ) -> Result<PreparedRequest> {
        prepare_request(&self.base_url, template, params, token)
    }
}

#[async_trait]
impl ExpenseApi for HttpClient {
    async fn list_expenses(&self, token: &str) -> Result<Vec<Expense>> {
        let request = self.prepare(&self.endpoints.list_expenses, &[], token)?;
        log::debug!("GET {}", request.url);

        let response = self
            .client
            .get(&request.url)
            .headers(request.headers)
            .send()
            .await?;
        let response = ensure_success(response, &request.url)?;

        let envelope: Envelope<Vec<Expense>> = response
            .json()
            .await
            .context("Failed to decode expense list")?;
        Ok(envelope.data)
    }

    async fn delete_expense(&self, token: &str, id: &str) -> Result<()> {
        let request = self.prepare(
            &self.endpoints.delete_expense,
            &[("id", Cow::Borrowed(id))],
            token,
        )?;
        log::debug!("DELETE {}", request.url);

        let response = self
            .client
            .delete(&request.url)
            .headers(request.headers)
            .send()
            .await?;
        ensure_success(response, &request.url)?;
        Ok(())
    }

    async fn user_details(&self, token: &str) -> Result<UserDetails> {
        let request = self.prepare(&self.endpoints.user_details, &[], token)?;
        log::debug!("GET {}", request.url);

        let response = self
            .client
            .get(&request.url)
            .headers(request.headers)
            .send()
            .await?;
        let response = ensure_success(response, &request.url)?;

        let envelope: Envelope<UserDetails> = response
            .json()
            .await
            .context("Failed to decode user details")?;
        Ok(envelope.data)
    }

    async fn update_profile_picture(
        &self,
        token: &str,
        upload: PictureUpload,
    ) -> Result<PictureUpdated> {
        let request = self.prepare(&self.endpoints.update_profile_picture, &[], token)?;
        log::debug!(
            "POST {} ({} bytes, {})",
            request.url,
            upload.bytes.len(),
            upload.mime_type
        );

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new().part(PROFILE_PICTURE_FIELD, part);

        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .multipart(form)
            .send()
            .await?;

        // Only a plain 200 counts as an accepted upload.
        if response.status() != StatusCode::OK {
            return Err(AppError::Status {
                url: request.url,
                status: response.status(),
            });
        }

        // The body is informational; a 200 without readable JSON still counts.
        match response.json::<serde_json::Value>().await {
            Ok(body) => Ok(PictureUpdated::from_json(&body)),
            Err(err) => {
                log::debug!("Profile picture response carried no JSON body: {}", err);
                Ok(PictureUpdated::default())
            }
        }
    }
}

fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::UNAUTHORIZED {
        Err(AppError::Unauthorized)
    } else {
        Err(AppError::Status {
            url: url.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ProfileWorkflow, MSG_UPLOAD_OK};
    use crate::session::MemoryTokenStore;
    use crate::status::Status;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Accept one connection, capture the raw request, answer with the given reply.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> (HttpClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            request
        });

        let config = Config::builtin()
            .with_api_url(format!("http://{addr}"))
            .unwrap();
        let client = Client::builder().no_proxy().build().unwrap();
        (HttpClient::with_client(client, &config), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok());
            let done = match length {
                Some(length) => buf.len() >= end + 4 + length,
                None if head.contains("transfer-encoding: chunked") => {
                    buf.ends_with(b"0\r\n\r\n")
                }
                None => true,
            };
            if done {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn upload() -> PictureUpload {
        PictureUpload {
            file_name: "me.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: b"png-bytes".to_vec(),
        }
    }

    #[tokio::test]
    async fn list_sends_bearer_and_decodes_envelope() {
        let (client, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"data":[{"_id":"1","title":"Coffee","category":{"name":"Food"},"amount":5,"date":"2024-01-01"}]}"#,
        )
        .await;

        let expenses = client.list_expenses("tok-1").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].title, "Coffee");
        assert!(request.starts_with("GET /api/expenses/ HTTP/1.1"), "{request}");
        assert!(request.to_lowercase().contains("authorization: bearer tok-1"));
    }

    #[tokio::test]
    async fn delete_hits_single_slash_path_with_encoded_id() {
        let (client, server) = serve_once("200 OK", "application/json", "{}").await;

        client.delete_expense("tok-2", "abc 123").await.unwrap();
        let request = server.await.unwrap();

        assert!(
            request.starts_with("DELETE /api/expenses/delete/abc%20123 HTTP/1.1"),
            "{request}"
        );
        assert!(request.to_lowercase().contains("authorization: bearer tok-2"));
    }

    #[tokio::test]
    async fn user_details_sends_bearer() {
        let (client, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"data":{"name":"Ada","email":"ada@example.com"}}"#,
        )
        .await;

        let details = client.user_details("tok-3").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(details.name.as_deref(), Some("Ada"));
        assert!(request.starts_with("GET /api/users/users/mydetails HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer tok-3"));
    }

    #[tokio::test]
    async fn upload_posts_profile_picture_field() {
        let (client, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"profilePicture":"https://cdn/new.png"}"#,
        )
        .await;

        let updated = client.update_profile_picture("tok-4", upload()).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(updated.profile_picture.as_deref(), Some("https://cdn/new.png"));
        assert!(request.starts_with("POST /api/users/update-profile-picture HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer tok-4"));
        assert!(request.contains(r#"name="profile_picture""#), "{request}");
        assert!(request.contains("png-bytes"));
    }

    #[tokio::test]
    async fn upload_with_plain_text_200_is_a_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let (client, server) = serve_once("200 OK", "text/plain", "OK").await;
        let mut profile = ProfileWorkflow::new(
            Arc::new(client),
            Arc::new(MemoryTokenStore::with_token("tok")),
            "https://cdn/default.jpg",
        );

        profile.upload(Some(&path)).await;
        server.await.unwrap();

        assert_eq!(profile.status(), Some(&Status::success(MSG_UPLOAD_OK)));
    }

    #[tokio::test]
    async fn upload_rejects_non_200_success_codes() {
        let (client, server) = serve_once("201 Created", "application/json", "{}").await;

        let err = client
            .update_profile_picture("tok", upload())
            .await
            .expect_err("201 is not accepted");
        server.await.unwrap();

        assert!(matches!(err, AppError::Status { status, .. } if status == StatusCode::CREATED));
    }

    #[tokio::test]
    async fn unauthorized_and_server_errors_are_mapped() {
        let (client, server) = serve_once("401 Unauthorized", "application/json", "{}").await;
        let err = client.list_expenses("stale").await.expect_err("401");
        server.await.unwrap();
        assert!(matches!(err, AppError::Unauthorized));

        let (client, server) =
            serve_once("500 Internal Server Error", "application/json", "{}").await;
        let err = client.delete_expense("tok", "1").await.expect_err("500");
        server.await.unwrap();
        assert!(
            matches!(err, AppError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
