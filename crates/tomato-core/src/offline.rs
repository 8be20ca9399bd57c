//! Versioned, cache-first asset store for offline use.
//!
//! Install fetches every listed asset into the cache named by the current
//! version. Activation drops every other version. Requests are answered
//! from any cache first, then from the network (storing a copy), and with a
//! synthetic `503 Offline` when both fail.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            status_text: "OK".into(),
            body: body.into(),
        }
    }

    pub fn offline() -> Self {
        Self {
            status: 503,
            status_text: "Offline".into(),
            body: b"Offline".to_vec(),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network unreachable")]
    Unreachable,
    #[error("fetch of {url} failed: {message}")]
    Failed { url: String, message: String },
}

pub trait Fetcher {
    fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

/// Named caches of url -> response.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: BTreeMap<String, HashMap<String, Response>>,
}

impl CacheStorage {
    pub fn names(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// First match across all caches.
    pub fn lookup(&self, url: &str) -> Option<&Response> {
        self.caches.values().find_map(|cache| cache.get(url))
    }

    pub fn put(&mut self, cache: &str, url: &str, response: Response) {
        self.caches
            .entry(cache.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    pub fn delete(&mut self, cache: &str) -> bool {
        self.caches.remove(cache).is_some()
    }

    pub fn len(&self, cache: &str) -> usize {
        self.caches.get(cache).map_or(0, HashMap::len)
    }
}

#[derive(Debug, Clone)]
pub struct AssetCache {
    version: String,
    origin: String,
    assets: Vec<String>,
}

impl AssetCache {
    /// `assets` are paths relative to `origin`, e.g. `/index.html`.
    pub fn new(version: impl Into<String>, origin: impl Into<String>, assets: Vec<String>) -> Self {
        Self {
            version: version.into(),
            origin: origin.into(),
            assets,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Pre-cache every asset. Nothing is stored unless all fetches succeed.
    pub fn install(&self, storage: &mut CacheStorage, fetcher: &dyn Fetcher) -> Result<usize, FetchError> {
        let mut fetched = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            let url = self.absolute(asset);
            let response = fetcher.fetch(&Request::get(url.clone()))?;
            fetched.push((url, response));
        }
        let count = fetched.len();
        for (url, response) in fetched {
            storage.put(&self.version, &url, response);
        }
        info!(version = %self.version, count, "asset cache installed");
        Ok(count)
    }

    /// Delete every cache that is not the current version.
    pub fn activate(&self, storage: &mut CacheStorage) -> Vec<String> {
        let stale: Vec<String> = storage
            .names()
            .into_iter()
            .filter(|name| *name != self.version)
            .collect();
        for name in &stale {
            storage.delete(name);
        }
        if !stale.is_empty() {
            info!(version = %self.version, dropped = stale.len(), "old asset caches removed");
        }
        stale
    }

    /// Answer a request, or `None` when it is not ours to intercept.
    pub fn respond(
        &self,
        storage: &mut CacheStorage,
        request: &Request,
        fetcher: &dyn Fetcher,
    ) -> Option<Response> {
        if request.method != "GET" || !self.same_origin(&request.url) {
            return None;
        }
        if let Some(cached) = storage.lookup(&request.url) {
            return Some(cached.clone());
        }
        match fetcher.fetch(request) {
            Ok(response) => {
                storage.put(&self.version, &request.url, response.clone());
                Some(response)
            }
            Err(e) => {
                debug!(url = %request.url, error = %e, "offline fallback");
                Some(Response::offline())
            }
        }
    }

    fn absolute(&self, asset: &str) -> String {
        if asset.starts_with("http://") || asset.starts_with("https://") {
            asset.to_string()
        } else {
            format!("{}{}", self.origin.trim_end_matches('/'), asset)
        }
    }

    fn same_origin(&self, url: &str) -> bool {
        let origin = self.origin.trim_end_matches('/');
        url == origin
            || url
                .strip_prefix(origin)
                .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
    }
}
