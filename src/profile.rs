use std::path::Path;
use std::sync::Arc;

use crate::api::{ExpenseApi, PictureUpload, UserDetails};
use crate::session::{current_token, TokenStore};
use crate::status::{Navigation, Status, MSG_TOKEN_MISSING};

pub const MSG_DETAILS_FAILED: &str = "Failed to fetch user data";
pub const MSG_NO_PHOTO: &str = "No photo selected";
pub const MSG_UPLOAD_FAILED: &str = "Failed to update profile picture";
pub const MSG_UPLOAD_OK: &str = "Profile picture updated successfully!";

/// Profile details plus the picture currently shown for the signed-in user.
pub struct ProfileWorkflow {
    api: Arc<dyn ExpenseApi>,
    tokens: Arc<dyn TokenStore>,
    default_avatar_url: String,
    details: Option<UserDetails>,
    picture: Option<String>,
    status: Option<Status>,
}

impl ProfileWorkflow {
    pub fn new(
        api: Arc<dyn ExpenseApi>,
        tokens: Arc<dyn TokenStore>,
        default_avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            api,
            tokens,
            default_avatar_url: default_avatar_url.into(),
            details: None,
            picture: None,
            status: None,
        }
    }

    pub async fn load(&mut self) -> Navigation {
        self.status = None;

        let Some(token) = current_token(self.tokens.as_ref()) else {
            log::warn!("No session token; redirecting to sign-in before loading profile");
            self.status = Some(Status::error(MSG_TOKEN_MISSING));
            return Navigation::Login;
        };

        match self.api.user_details(&token).await {
            Ok(details) => {
                self.picture = Some(
                    details
                        .profile_picture
                        .clone()
                        .filter(|url| !url.trim().is_empty())
                        .unwrap_or_else(|| self.default_avatar_url.clone()),
                );
                self.details = Some(details);
            }
            Err(err) => {
                log::error!("Failed to fetch user data: {}", err);
                self.status = Some(Status::error(MSG_DETAILS_FAILED));
            }
        }
        Navigation::Stay
    }

    /// Upload the image at `path` as the new profile picture.
    pub async fn upload(&mut self, path: Option<&Path>) -> Navigation {
        self.status = None;

        let Some(path) = path else {
            self.status = Some(Status::error(MSG_NO_PHOTO));
            return Navigation::Stay;
        };

        let upload = match read_upload(path).await {
            Ok(upload) => upload,
            Err(err) => {
                log::error!("Cannot read {}: {}", path.display(), err);
                self.status = Some(Status::error(MSG_NO_PHOTO));
                return Navigation::Stay;
            }
        };

        let Some(token) = current_token(self.tokens.as_ref()) else {
            log::warn!("No session token; redirecting to sign-in before uploading picture");
            self.status = Some(Status::error(MSG_TOKEN_MISSING));
            return Navigation::Login;
        };

        match self.api.update_profile_picture(&token, upload).await {
            Ok(updated) => {
                if let Some(url) = updated.profile_picture {
                    self.picture = Some(url);
                }
                self.status = Some(Status::success(MSG_UPLOAD_OK));
            }
            Err(err) => {
                log::error!("Failed to update profile picture: {}", err);
                self.status = Some(Status::error(MSG_UPLOAD_FAILED));
            }
        }
        Navigation::Stay
    }

    pub fn details(&self) -> Option<&UserDetails> {
        self.details.as_ref()
    }

    pub fn picture_url(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }
}

async fn read_upload(path: &Path) -> std::io::Result<PictureUpload> {
    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "image file is empty",
        ));
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("profile_picture.jpg")
        .to_string();

    Ok(PictureUpload {
        file_name,
        mime_type: mime_for(path).to_string(),
        bytes,
    })
}

pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
