// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw source map JSON structures.
//!
//! Covers Source Map v3, the sectioned "index map" variant, the Google
//! extensions (`x_google_linecount`, `x_google_ignoreList`) and the fields of
//! the Scopes extension.

use serde::Deserialize;

use crate::config::DecodeOptions;
use crate::error::{DecodeError, Result};
use crate::position::Position;

/// Prefix of the guard line some servers put in front of JSON responses.
const XSSI_PREFIX: &str = ")]}";

/// Raw source map JSON structure.
///
/// Both plain maps and index maps deserialize into this type; an index map
/// has `sections` and (usually) no `mappings`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
	#[serde(default)]
	pub version: Option<u32>,
	#[serde(default)]
	pub file: Option<String>,
	#[serde(default)]
	pub source_root: Option<String>,
	#[serde(default)]
	pub sources: Vec<Option<String>>,
	#[serde(default)]
	pub sources_content: Option<Vec<Option<String>>>,
	#[serde(default)]
	pub names: Vec<String>,
	#[serde(default)]
	pub mappings: String,
	#[serde(default)]
	pub ignore_list: Option<Vec<u32>>,
	#[serde(default, rename = "x_google_ignoreList")]
	pub x_google_ignore_list: Option<Vec<u32>>,
	#[serde(default, rename = "x_google_linecount")]
	pub x_google_linecount: Option<u32>,
	#[serde(default)]
	pub original_scopes: Option<Vec<Option<String>>>,
	#[serde(default)]
	pub generated_ranges: Option<String>,
	#[serde(default)]
	pub sections: Option<Vec<RawSection>>,
}

/// One section of an index map.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
	pub offset: RawOffset,
	#[serde(default)]
	pub map: Option<Box<RawSourceMap>>,
	#[serde(default)]
	pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawOffset {
	pub line: u32,
	pub column: u32,
}

impl From<RawOffset> for Position {
	fn from(offset: RawOffset) -> Self {
		Position::new(offset.line, offset.column)
	}
}

impl RawSourceMap {
	pub fn is_sectioned(&self) -> bool {
		self.sections.is_some()
	}

	/// Indices of sources hinted as third-party; `ignoreList` wins over the
	/// older `x_google_ignoreList`.
	pub fn ignore_list(&self) -> &[u32] {
		self.ignore_list
			.as_deref()
			.or(self.x_google_ignore_list.as_deref())
			.unwrap_or(&[])
	}

	/// Embedded content for the source at `index`, if any.
	pub fn source_content(&self, index: usize) -> Option<&str> {
		self.sources_content
			.as_ref()
			.and_then(|contents| contents.get(index))
			.and_then(|content| content.as_deref())
	}

	pub fn has_scopes(&self) -> bool {
		self.original_scopes.is_some() && self.generated_ranges.is_some()
	}
}

/// Remove a leading `)]}'`-style guard line.
pub fn strip_xssi_prefix(text: &str) -> &str {
	if !text.starts_with(XSSI_PREFIX) {
		return text;
	}
	match text.find('\n') {
		Some(newline) => &text[newline + 1..],
		None => "",
	}
}

/// Parse source map JSON text into a [`RawSourceMap`].
pub fn parse_payload(text: &str, options: &DecodeOptions) -> Result<RawSourceMap> {
	let body = if options.strip_xssi_prefix {
		strip_xssi_prefix(text)
	} else {
		text
	};
	let raw: RawSourceMap = serde_json::from_str(body)?;

	if options.require_version_3 {
		if let Some(version) = raw.version.filter(|&v| v != 3) {
			return Err(DecodeError::InvalidVersion(version));
		}
	}

	Ok(raw)
}
