use super::{
    user::{User, UserId},
    user_source::{FetchError, UserSource},
};

/// Fetches users with one `GET <base_url>/<id>` each.
#[derive(Debug, Clone)]
pub struct HttpUserSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn user_url(&self, id: UserId) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id)
    }
}

#[async_trait::async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_user(&self, id: UserId) -> Result<User, FetchError> {
        let url = self.user_url(id);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
