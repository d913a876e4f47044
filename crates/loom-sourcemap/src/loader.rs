// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collaborators the engine consumes: map loading and URL resolution.

use std::collections::HashMap;

use url::Url;

use crate::error::{DecodeError, Result};

/// Who asked for a source map to be loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadInitiator {
	/// URL of the script or document that referenced the map.
	pub initiator_url: Option<String>,
}

impl LoadInitiator {
	pub fn for_url(url: impl Into<String>) -> Self {
		Self {
			initiator_url: Some(url.into()),
		}
	}
}

/// Fetches raw source map bytes.
///
/// Retrying is the loader's responsibility; the engine calls `load` once.
pub trait SourceMapLoader: Send + Sync {
	fn load(&self, url: &str, initiator: &LoadInitiator) -> Result<Vec<u8>>;
}

/// Joins a relative URL against a base URL.
pub trait UrlResolver: Send + Sync {
	/// Returns `None` when `relative` cannot be resolved against `base`.
	fn resolve(&self, base: &str, relative: &str) -> Option<String>;
}

/// [`UrlResolver`] backed by WHATWG URL parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardUrlResolver;

impl UrlResolver for StandardUrlResolver {
	fn resolve(&self, base: &str, relative: &str) -> Option<String> {
		let base = Url::parse(base).ok()?;
		base.join(relative).ok().map(String::from)
	}
}

/// Whether `href` lacks a scheme and therefore needs a base to be resolved.
pub fn is_relative_url(href: &str) -> bool {
	Url::parse(href).is_err()
}

/// In-memory map store, keyed by map URL.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
	maps: HashMap<String, Vec<u8>>,
}

impl InMemoryLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, url: impl Into<String>, data: Vec<u8>) {
		self.maps.insert(url.into(), data);
	}
}

impl SourceMapLoader for InMemoryLoader {
	fn load(&self, url: &str, _initiator: &LoadInitiator) -> Result<Vec<u8>> {
		self.maps
			.get(url)
			.cloned()
			.ok_or_else(|| DecodeError::LoadFailed {
				url: url.to_string(),
				reason: "not found".to_string(),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_standard_resolver_joins_relative() {
		let resolver = StandardUrlResolver;
		assert_eq!(
			resolver.resolve("https://example.com/static/app.js.map", "src/app.ts"),
			Some("https://example.com/static/src/app.ts".to_string())
		);
		assert_eq!(
			resolver.resolve("https://example.com/static/app.js.map", "/root.ts"),
			Some("https://example.com/root.ts".to_string())
		);
	}

	#[test]
	fn test_standard_resolver_requires_absolute_base() {
		assert_eq!(StandardUrlResolver.resolve("app.js.map", "src/app.ts"), None);
	}

	#[test]
	fn test_is_relative_url() {
		assert!(is_relative_url("src/app.ts"));
		assert!(is_relative_url("/abs/app.ts"));
		assert!(!is_relative_url("webpack:///src/app.ts"));
		assert!(!is_relative_url("https://example.com/app.ts"));
	}

	#[test]
	fn test_in_memory_loader() {
		let mut loader = InMemoryLoader::new();
		loader.add("https://example.com/app.js.map", b"{}".to_vec());

		let initiator = LoadInitiator::for_url("https://example.com/app.js");
		assert_eq!(
			loader.load("https://example.com/app.js.map", &initiator).unwrap(),
			b"{}".to_vec()
		);
		assert!(matches!(
			loader.load("https://example.com/missing.map", &initiator),
			Err(DecodeError::LoadFailed { .. })
		));
	}
}
