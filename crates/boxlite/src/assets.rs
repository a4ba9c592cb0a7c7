//! Remote asset resolution.
//!
//! Box notes reference images by file identifier; the binary content lives
//! behind the Box content API and requires an access token. Resolution is
//! cached per conversion run so an asset referenced twice is fetched once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ecow::EcoString;
use log::debug;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::BoxliteFeat;
use crate::diagnostics::WarningCollector;
use crate::error::AssetError;

const BOX_API_BASE: &str = "https://api.box.com/2.0";

/// An opaque reference to a remote asset, created unresolved during parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// The Box file identifier.
    pub id: EcoString,
    /// The file name recorded in the document, possibly empty.
    pub file_name: EcoString,
}

impl AssetRef {
    pub fn new(id: impl Into<EcoString>, file_name: impl Into<EcoString>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
        }
    }

    /// A human-readable name for placeholders and warnings.
    pub fn display_name(&self) -> &str {
        if self.file_name.is_empty() {
            &self.id
        } else {
            &self.file_name
        }
    }
}

/// The binary payload of a resolved asset. Immutable once cached.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub bytes: Arc<Vec<u8>>,
    pub mime: EcoString,
}

impl ResolvedAsset {
    pub fn new(bytes: Vec<u8>, mime: impl Into<EcoString>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            mime: mime.into(),
        }
    }

    /// File extension implied by the MIME type, for staged asset names.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Fetches asset content by identifier. The seam exists so tests can
/// resolve against canned data instead of the network.
pub trait AssetFetcher {
    fn fetch(&self, id: &str, token: &str) -> Result<ResolvedAsset, AssetError>;
}

/// Fetcher backed by the Box content API.
pub struct BoxApiFetcher {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl BoxApiFetcher {
    pub fn new() -> Self {
        Self::with_base_url(BOX_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for BoxApiFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for BoxApiFetcher {
    fn fetch(&self, id: &str, token: &str) -> Result<ResolvedAsset, AssetError> {
        let url = format!("{}/files/{}/content", self.base_url, id);
        debug!("fetching asset {id} from {url}");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .map_err(|err| AssetError::Network {
                id: id.into(),
                message: err.to_string(),
            })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AssetError::Unauthorized(id.into()));
            }
            StatusCode::NOT_FOUND => return Err(AssetError::NotFound(id.into())),
            status if !status.is_success() => {
                return Err(AssetError::Network {
                    id: id.into(),
                    message: format!("unexpected status {status}"),
                });
            }
            _ => {}
        }

        let mime: EcoString = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .into();

        let bytes = response
            .bytes()
            .map_err(|err| AssetError::Network {
                id: id.into(),
                message: err.to_string(),
            })?
            .to_vec();

        Ok(ResolvedAsset::new(bytes, mime))
    }
}

/// Per-run conversion state: the access token, the staging directory, the
/// asset cache, and the warning collector. Owned by one invocation and
/// discarded with it.
pub struct ConversionContext {
    token: Option<String>,
    work_dir: PathBuf,
    embed_assets: bool,
    cache: HashMap<EcoString, Result<ResolvedAsset, AssetError>>,
    fetcher: Box<dyn AssetFetcher>,
    warnings: WarningCollector,
}

impl ConversionContext {
    pub fn new(feat: &BoxliteFeat) -> Self {
        Self::with_fetcher(feat, Box::new(BoxApiFetcher::new()))
    }

    pub fn with_fetcher(feat: &BoxliteFeat, fetcher: Box<dyn AssetFetcher>) -> Self {
        Self {
            token: feat.token.clone(),
            work_dir: feat.work_dir.clone(),
            embed_assets: feat.embed_assets,
            cache: HashMap::new(),
            fetcher,
            warnings: WarningCollector::default(),
        }
    }

    /// Resolve an asset, consulting the per-run cache first. Each distinct
    /// identifier is fetched at most once per run; failures are cached too,
    /// so a broken reference repeated across the document is not retried.
    pub fn resolve(&mut self, asset: &AssetRef) -> Result<ResolvedAsset, AssetError> {
        if let Some(hit) = self.cache.get(&asset.id) {
            return hit.clone();
        }

        let outcome = match self.token.as_deref() {
            Some(token) => self.fetcher.fetch(&asset.id, token),
            None => Err(AssetError::Unauthorized(asset.id.clone())),
        };
        self.cache.insert(asset.id.clone(), outcome.clone());
        outcome
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Whether writers should inline asset bytes rather than stage files.
    pub fn embed_assets(&self) -> bool {
        self.embed_assets
    }

    pub fn warnings(&self) -> &WarningCollector {
        &self.warnings
    }
}
