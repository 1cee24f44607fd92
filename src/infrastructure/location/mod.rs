//! Share link - URL-backed location for decode sessions

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::domain::location::{UrlParams, UrlSync, CALLDATA_PARAM, SIGNATURE_PARAM};

/// A shareable URL carrying the session inputs in its query string
///
/// The link can optionally be mirrored to a file after every update, so the
/// last session can be reopened later.
#[derive(Debug, Clone)]
pub struct ShareLink {
    url: Url,
    persist_path: Option<PathBuf>,
}

impl ShareLink {
    /// Parse an absolute URL
    pub fn parse(link: &str) -> Result<Self> {
        let url = Url::parse(link.trim()).with_context(|| format!("invalid share link '{}'", link.trim()))?;
        Ok(Self {
            url,
            persist_path: None,
        })
    }

    /// Load a link previously written with [`ShareLink::with_persist_path`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::parse(&content)
    }

    /// Mirror the link to `path` after every update
    pub fn with_persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Raw `key=value` pairs of the query, excluding the session params
    fn foreign_pairs(&self) -> Vec<String> {
        self.url
            .query()
            .unwrap_or("")
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| {
                let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
                key != SIGNATURE_PARAM && key != CALLDATA_PARAM
            })
            .map(str::to_string)
            .collect()
    }

    fn raw_param(&self, name: &str) -> Option<String> {
        self.url.query()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then(|| value.to_string())
        })
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(path, self.url.as_str()).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}

impl UrlSync for ShareLink {
    fn update_url_params(&mut self, signature: &str, calldata: &str) {
        let mut pairs = self.foreign_pairs();
        pairs.push(format!("{}={}", SIGNATURE_PARAM, urlencoding::encode(signature)));
        pairs.push(format!("{}={}", CALLDATA_PARAM, urlencoding::encode(calldata)));
        self.url.set_query(Some(&pairs.join("&")));

        if let Err(err) = self.persist() {
            tracing::warn!(error = %format!("{err:#}"), "failed to persist share link");
        }
    }

    fn url_params(&self) -> UrlParams {
        UrlParams {
            signature: self.raw_param(SIGNATURE_PARAM),
            calldata: self.raw_param(CALLDATA_PARAM),
        }
    }
}
