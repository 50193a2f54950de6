use crate::catalog::{Project, Version};
use crate::{Error, Result};
use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct HttpCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpCatalog {
    pub fn new(base_url: String, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn send(&self, url: &str, what: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_connect() {
                Error::Other(format!(
                    "Cannot connect to catalog at {}\n\
                        Please check your network connection and the catalog URL.",
                    self.base_url
                ))
            } else if e.is_timeout() {
                Error::Other("Catalog request timed out. Please try again.".to_string())
            } else {
                Error::Other(format!("Failed to fetch {}: {}", what, e))
            }
        })?;

        let status = response.status();

        if status == 404 {
            return Err(Error::PackageNotFound(format!(
                "{} not found in catalog",
                what
            )));
        }

        if !status.is_success() {
            let error_msg = match status.as_u16() {
                429 => "Catalog rate limit reached. Please wait a minute and try again.".to_string(),
                500 | 502 | 503 | 504 => format!(
                    "Catalog server error (HTTP {}).\n\
                    The catalog is experiencing issues. Please try again later.",
                    status.as_u16()
                ),
                _ => format!("Catalog error for {}: HTTP {}", what, status.as_u16()),
            };
            return Err(Error::Other(error_msg));
        }

        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        self.send(url, what)?
            .json()
            .map_err(|e| Error::Other(format!("Failed to parse {}: {}", what, e)))
    }

    /// Get a project by id or slug
    pub fn get_project(&self, id_or_slug: &str) -> Result<Project> {
        let url = format!(
            "{}/project/{}",
            self.base_url,
            urlencoding::encode(id_or_slug)
        );
        self.get_json(&url, &format!("Project '{}'", id_or_slug))
    }

    /// Versions of a project filtered by game version and loaders
    pub fn get_versions(
        &self,
        project_id: &str,
        game_version: Option<&str>,
        loaders: &[String],
    ) -> Result<Vec<Version>> {
        let mut params = Vec::new();
        if !loaders.is_empty() {
            let list = serde_json::to_string(loaders)?;
            params.push(format!("loaders={}", urlencoding::encode(&list)));
        }
        if let Some(game_version) = game_version {
            let list = serde_json::to_string(&[game_version])?;
            params.push(format!("game_versions={}", urlencoding::encode(&list)));
        }

        let mut url = format!(
            "{}/project/{}/version",
            self.base_url,
            urlencoding::encode(project_id)
        );
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        self.get_json(&url, &format!("Versions of '{}'", project_id))
    }

    pub fn get_version(&self, version_id: &str) -> Result<Version> {
        let url = format!(
            "{}/version/{}",
            self.base_url,
            urlencoding::encode(version_id)
        );
        self.get_json(&url, &format!("Version '{}'", version_id))
    }

    /// Download an artifact from an absolute URL
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .send(url, url)?
            .bytes()
            .map_err(|e| Error::Other(format!("Failed to read response: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
