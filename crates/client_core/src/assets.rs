use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::surface::SpriteImage;

#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self) -> Result<SpriteImage>;
}

/// Fetches and decodes the sprite on every call; nothing is cached.
pub struct HttpImageLoader {
    http: Client,
    url: String,
}

impl HttpImageLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self) -> Result<SpriteImage> {
        let bytes = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("failed to fetch sprite from {}", self.url))?
            .error_for_status()
            .with_context(|| format!("sprite request to {} failed", self.url))?
            .bytes()
            .await
            .context("failed to read sprite body")?;
        SpriteImage::decode(&bytes).with_context(|| format!("failed to decode sprite {}", self.url))
    }
}
