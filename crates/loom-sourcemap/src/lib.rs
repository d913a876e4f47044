// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map v3 decoding and position lookup for Loom.
//!
//! This crate provides functionality for:
//! - Parsing source map v3 JSON, including index maps with sections
//! - Mapping generated positions to original ones and back
//! - Decoding the Scopes extension (`originalScopes` / `generatedRanges`)
//!
//! # Example
//!
//! ```
//! use loom_sourcemap::SourceMapIndex;
//!
//! let json = r#"{
//!     "version": 3,
//!     "sources": ["src/app.ts"],
//!     "names": [],
//!     "mappings": "AAAA;AACA"
//! }"#;
//!
//! let index = SourceMapIndex::parse("bundle.js", "", json).unwrap();
//!
//! let entry = index.find_entry(1, 10).unwrap();
//! assert_eq!(entry.source_url(), Some("src/app.ts"));
//! assert_eq!(entry.original.as_ref().unwrap().source_line, 1);
//!
//! let back = index.find_reverse_entries("src/app.ts", 1, 0);
//! assert_eq!(back[0].generated_line, 1);
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod mappings;
pub mod payload;
pub mod position;
pub mod scopes;
pub mod segments;
pub mod vlq;

// Re-export main types
pub use config::DecodeOptions;
pub use error::{DecodeError, Result};
pub use index::{EntryRanges, SourceInfo, SourceMapIndex};
pub use loader::{InMemoryLoader, LoadInitiator, SourceMapLoader, StandardUrlResolver, UrlResolver};
pub use mappings::{MappingEntry, OriginalLocation};
pub use payload::{parse_payload, RawSourceMap};
pub use position::{Position, TextRange, RANGE_END};
pub use scopes::{
	decode_scopes, BindingValue, Callsite, GeneratedRange, OriginalScope, OriginalScopeRef,
	OriginalScopeTree, ScopeId, ScopeInfo, SubRangeBinding,
};
pub use segments::{parse_segments, MappingKind, RawSegment, SegmentParser};
pub use vlq::{decode_vlq, encode_vlq};
