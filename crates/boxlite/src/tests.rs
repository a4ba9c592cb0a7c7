use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ecow::EcoString;

use super::*;
use crate::assets::{AssetFetcher, ConversionContext, ResolvedAsset};
use crate::error::AssetError;

mod rendering;
mod resolver;

/// PNG magic followed by junk: enough for format sniffing, not decodable.
pub(crate) const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfakedata";

/// Initialize logging once, so warnings from degraded runs show up under
/// `RUST_LOG` when a test fails.
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fetcher backed by canned data, counting fetches.
pub(crate) struct StaticFetcher {
    assets: HashMap<String, ResolvedAsset>,
    calls: Arc<AtomicUsize>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self {
            assets: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_asset(mut self, id: &str, bytes: &[u8], mime: &str) -> Self {
        self.assets
            .insert(id.to_string(), ResolvedAsset::new(bytes.to_vec(), mime));
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl AssetFetcher for StaticFetcher {
    fn fetch(&self, id: &str, _token: &str) -> Result<ResolvedAsset, AssetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.assets
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(id.into()))
    }
}

pub(crate) fn feat_with_token() -> BoxliteFeat {
    BoxliteFeat {
        token: Some("test-token".into()),
        ..Default::default()
    }
}

pub(crate) fn ctx_with_fetcher(fetcher: StaticFetcher) -> ConversionContext {
    init_test_logging();
    ConversionContext::with_fetcher(&feat_with_token(), Box::new(fetcher))
}

pub(crate) const HEADING_DOC: &str = r#"{"doc":{"content":[{"type":"heading","attrs":{"level":1},"content":[{"type":"text","text":"Title"}]}]}}"#;

pub(crate) fn image_doc(id: &str) -> String {
    format!(
        r#"{{"doc":{{"content":[
            {{"type":"image","attrs":{{"boxFileId":"{id}","fileName":"photo.png"}}}},
            {{"type":"paragraph","content":[{{"type":"text","text":"after"}}]}}
        ]}}}}"#
    )
}
