//! Figma REST API client
//!
//! Downloads file JSON and resolves remote component keys to the name of
//! the library file that publishes them.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use iconscan::{Document, LibraryCatalog};

const API_BASE: &str = "https://api.figma.com/v1";

/// Environment variable holding a personal access token.
pub const TOKEN_ENV: &str = "FIGMA_TOKEN";

type ApiResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Deserialize)]
struct ComponentResponse {
    meta: ComponentMeta,
}

#[derive(Deserialize)]
struct ComponentMeta {
    file_key: String,
}

#[derive(Deserialize)]
struct FileSummary {
    name: String,
}

/// Authenticated Figma API client.
pub struct FigmaClient {
    http: Client,
    token: String,
}

impl FigmaClient {
    /// Create a client with the given personal access token.
    pub fn new(token: impl Into<String>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("iconscan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token: token.into(),
        })
    }

    async fn get(&self, path: &str) -> ApiResult<reqwest::Response> {
        let url = format!("{}{}", API_BASE, path);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("X-Figma-Token", &self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!(
                "Figma API error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )
            .into());
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Ok(self.get(path).await?.json().await?)
    }

    /// Download the full file JSON.
    pub async fn file(&self, file_key: &str) -> ApiResult<Vec<u8>> {
        let path = format!("/files/{}", urlencoding::encode(file_key));
        Ok(self.get(&path).await?.bytes().await?.to_vec())
    }

    /// Key of the file that publishes a component.
    pub async fn component_file_key(&self, component_key: &str) -> ApiResult<String> {
        let path = format!("/components/{}", urlencoding::encode(component_key));
        let response: ComponentResponse = self.get_json(&path).await?;
        Ok(response.meta.file_key)
    }

    /// Display name of a file.
    pub async fn file_name(&self, file_key: &str) -> ApiResult<String> {
        let path = format!("/files/{}?depth=1", urlencoding::encode(file_key));
        let summary: FileSummary = self.get_json(&path).await?;
        Ok(summary.name)
    }

    /// Resolve every remote component of a document to its library name.
    ///
    /// Components that cannot be resolved are logged and left out.
    pub async fn library_catalog(&self, doc: &Document) -> LibraryCatalog {
        let mut catalog = LibraryCatalog::new();
        let mut names: HashMap<String, String> = HashMap::new();

        let mut keys: Vec<&str> = doc
            .components
            .values()
            .filter(|meta| meta.remote)
            .filter_map(|meta| meta.key.as_deref())
            .collect();
        keys.sort_unstable();
        keys.dedup();

        for key in keys {
            let file_key = match self.component_file_key(key).await {
                Ok(file_key) => file_key,
                Err(e) => {
                    log::warn!("Could not resolve component {}: {}", key, e);
                    continue;
                }
            };

            if let Some(name) = names.get(&file_key) {
                catalog.insert(key, name.clone());
                continue;
            }

            match self.file_name(&file_key).await {
                Ok(name) => {
                    names.insert(file_key, name.clone());
                    catalog.insert(key, name);
                }
                Err(e) => log::warn!("Could not read library file {}: {}", file_key, e),
            }
        }

        catalog
    }
}
