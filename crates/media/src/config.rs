/// Default Cloudinary API base (the cloud name is appended per request).
pub const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";

/// Credentials and endpoint for the Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// API base without trailing slash (default: [`DEFAULT_BASE_URL`]).
    pub base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

impl CloudinaryConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Default                           |
    /// |--------------------------|-----------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`  | required                          |
    /// | `CLOUDINARY_API_KEY`     | required                          |
    /// | `CLOUDINARY_API_SECRET`  | required                          |
    /// | `CLOUDINARY_BASE_URL`    | `https://api.cloudinary.com/v1_1` |
    pub fn from_env() -> Result<Self, MediaConfigError> {
        let required = |name: &'static str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or(MediaConfigError::Missing(name))
        };

        Ok(Self {
            cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            api_key: required("CLOUDINARY_API_KEY")?,
            api_secret: required("CLOUDINARY_API_SECRET")?,
            base_url: std::env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}
