// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source map decoding.

use thiserror::Error;

/// Errors that can occur while decoding a source map or its Scopes extension.
///
/// Structural errors (`MalformedVlq`, `MalformedMappings`, the unbalanced
/// tree errors and dangling cross-references) abort the whole decode.
/// `UnsupportedSectionUrl` and `NestedSections` are only ever recorded as
/// compatibility warnings on a decoded index.
#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("malformed VLQ at offset {offset}: {reason}")]
	MalformedVlq { offset: usize, reason: &'static str },

	#[error("malformed mappings at offset {offset}: {reason}")]
	MalformedMappings { offset: usize, reason: &'static str },

	#[error("original scope items not nested properly: {0}")]
	UnbalancedScopeItems(String),

	#[error("generated range items not nested properly: {0}")]
	UnbalancedRangeItems(String),

	#[error("invalid source index: {0}")]
	InvalidSourceIndex(i64),

	#[error("invalid original scope index: {0}")]
	InvalidScopeIndex(i64),

	#[error("invalid name index: {0}")]
	InvalidNameIndex(i64),

	#[error("invalid source map JSON: {0}")]
	JsonParse(#[from] serde_json::Error),

	#[error("source map section url is not supported: {0}")]
	UnsupportedSectionUrl(String),

	#[error("nested index map in section at line {line}, column {column} is not supported")]
	NestedSections { line: u32, column: u32 },

	#[error("invalid source map version: expected 3, got {0}")]
	InvalidVersion(u32),

	#[error("source map is not valid UTF-8: {0}")]
	InvalidUtf8(#[from] std::str::Utf8Error),

	#[error("failed to load {url}: {reason}")]
	LoadFailed { url: String, reason: String },
}

impl DecodeError {
	/// Whether this error describes a degraded piece of a map rather than a
	/// failed decode.
	pub fn is_compatibility_warning(&self) -> bool {
		matches!(
			self,
			DecodeError::UnsupportedSectionUrl(_) | DecodeError::NestedSections { .. }
		)
	}
}

pub type Result<T> = std::result::Result<T, DecodeError>;
