// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Queryable source map index.
//!
//! Forward queries (generated -> original) binary-search the sorted mapping
//! table. Backward queries (original -> generated) go through a per-source
//! reverse index that is built on first use and then shared by all readers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tracing::{debug, instrument, warn};

use crate::config::DecodeOptions;
use crate::error::{DecodeError, Result};
use crate::loader::{LoadInitiator, SourceMapLoader, StandardUrlResolver, UrlResolver};
use crate::mappings::{MappingEntry, MappingTableBuilder};
use crate::payload::{parse_payload, RawSourceMap};
use crate::position::{Position, TextRange};
use crate::scopes::ScopeInfo;

/// Per-source data of a decoded map.
#[derive(Debug)]
pub struct SourceInfo {
	url: Arc<str>,
	embedded_content: Option<String>,
	ignore_list_hint: bool,
	/// Indices into the mapping table, ordered by original then generated position.
	reverse_index: OnceLock<Vec<usize>>,
}

impl SourceInfo {
	pub(crate) fn new(url: Arc<str>, embedded_content: Option<String>, ignore_list_hint: bool) -> Self {
		Self {
			url,
			embedded_content,
			ignore_list_hint,
			reverse_index: OnceLock::new(),
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn embedded_content(&self) -> Option<&str> {
		self.embedded_content.as_deref()
	}

	pub fn ignore_list_hint(&self) -> bool {
		self.ignore_list_hint
	}

	pub fn is_reverse_index_built(&self) -> bool {
		self.reverse_index.get().is_some()
	}
}

/// Generated and original extent of the mapping entry covering a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRanges {
	pub range: TextRange,
	pub source_range: TextRange,
	pub source_url: Arc<str>,
}

/// Immutable, thread-safe index over one decoded source map.
#[derive(Debug)]
pub struct SourceMapIndex {
	compiled_url: String,
	map_url: String,
	mappings: Vec<MappingEntry>,
	sources: Vec<SourceInfo>,
	source_slots: HashMap<Arc<str>, usize>,
	line_count: Option<u32>,
	warnings: Vec<DecodeError>,
	scope_info: Option<ScopeInfo>,
	reverse_index_builds: AtomicUsize,
}

impl SourceMapIndex {
	/// Decode source map JSON with default options.
	pub fn parse(compiled_url: &str, map_url: &str, text: &str) -> Result<Self> {
		Self::parse_with(
			compiled_url,
			map_url,
			text,
			&DecodeOptions::default(),
			&StandardUrlResolver,
		)
	}

	pub fn parse_with(
		compiled_url: &str,
		map_url: &str,
		text: &str,
		options: &DecodeOptions,
		resolver: &dyn UrlResolver,
	) -> Result<Self> {
		let payload = parse_payload(text, options)?;
		Self::from_payload(compiled_url, map_url, &payload, options, resolver)
	}

	/// Build the index from an already parsed payload.
	#[instrument(skip_all, fields(compiled_url = %compiled_url, map_url = %map_url))]
	pub fn from_payload(
		compiled_url: &str,
		map_url: &str,
		payload: &RawSourceMap,
		options: &DecodeOptions,
		resolver: &dyn UrlResolver,
	) -> Result<Self> {
		let table = MappingTableBuilder::new(map_url, resolver, options).build(payload)?;

		debug!(
			mappings = table.entries.len(),
			sources = table.sources.len(),
			scopes = table.scope_info.is_some(),
			"decoded source map"
		);

		Ok(Self {
			compiled_url: compiled_url.to_string(),
			map_url: map_url.to_string(),
			mappings: table.entries,
			sources: table.sources,
			source_slots: table.source_slots,
			line_count: table.line_count,
			warnings: table.warnings,
			scope_info: table.scope_info,
			reverse_index_builds: AtomicUsize::new(0),
		})
	}

	/// Fetch `map_url` through `loader` and decode it.
	#[instrument(skip(loader, resolver, initiator, options))]
	pub fn load(
		loader: &dyn SourceMapLoader,
		resolver: &dyn UrlResolver,
		compiled_url: &str,
		map_url: &str,
		initiator: &LoadInitiator,
		options: &DecodeOptions,
	) -> Result<Self> {
		let bytes = loader.load(map_url, initiator).map_err(|e| {
			warn!(error = %e, "failed to load source map");
			e
		})?;
		let text = std::str::from_utf8(&bytes)?;
		Self::parse_with(compiled_url, map_url, text, options, resolver)
	}

	pub fn compiled_url(&self) -> &str {
		&self.compiled_url
	}

	pub fn map_url(&self) -> &str {
		&self.map_url
	}

	/// All entries, sorted by generated position.
	pub fn mappings(&self) -> &[MappingEntry] {
		&self.mappings
	}

	/// Generated line count from `x_google_linecount`, if the map declared one.
	pub fn line_count(&self) -> Option<u32> {
		self.line_count
	}

	/// Non-fatal compatibility problems met while decoding.
	pub fn warnings(&self) -> &[DecodeError] {
		&self.warnings
	}

	/// Distinct source URLs in first-seen order.
	pub fn source_urls(&self) -> impl Iterator<Item = &str> + '_ {
		self.sources.iter().map(SourceInfo::url)
	}

	pub fn source_info(&self, source_url: &str) -> Option<&SourceInfo> {
		self.source_slots.get(source_url).map(|&slot| &self.sources[slot])
	}

	pub fn embedded_content(&self, source_url: &str) -> Option<&str> {
		self.source_info(source_url)?.embedded_content()
	}

	pub fn has_ignore_list_hint(&self, source_url: &str) -> bool {
		self.source_info(source_url)
			.is_some_and(SourceInfo::ignore_list_hint)
	}

	/// True when the first entry starts at line 0 or column 0.
	pub fn maps_origin(&self) -> bool {
		self.mappings
			.first()
			.is_some_and(|entry| entry.generated_line == 0 || entry.generated_column == 0)
	}

	/// Entry covering generated `(line, column)`.
	///
	/// Among entries at the same generated position the last one encoded wins.
	pub fn find_entry(&self, line: u32, column: u32) -> Option<&MappingEntry> {
		let end = self.upper_bound_generated(Position::new(line, column));
		end.checked_sub(1).map(|i| &self.mappings[i])
	}

	/// Generated and original ranges of the entry covering `(line, column)`.
	pub fn find_entry_ranges(&self, line: u32, column: u32) -> Option<EntryRanges> {
		let end = self.upper_bound_generated(Position::new(line, column));
		let start = end.checked_sub(1)?;
		let original = self.mappings[start].original.as_ref()?;
		let range = self.generated_range(start, end);

		let source_start = original.position();
		let reverse = self.reverse_index_for(&original.source_url)?;
		let next = reverse.partition_point(|&i| self.original_at(i) <= source_start);
		let source_end = reverse
			.get(next)
			.map_or(Position::open_end(), |&i| self.original_at(i));

		Some(EntryRanges {
			range,
			source_range: TextRange::new(source_start, source_end),
			source_url: original.source_url.clone(),
		})
	}

	/// Every entry carrying `name`, in table order.
	pub fn mappings_with_name(&self, name: &str) -> Vec<&MappingEntry> {
		self.mappings
			.iter()
			.filter(|entry| entry.name.as_deref() == Some(name))
			.collect()
	}

	/// Reverse index of `source_url`, built on first use.
	///
	/// Concurrent first calls build it exactly once; every caller sees the
	/// same slice. `None` for an unknown source.
	pub fn reverse_index_for(&self, source_url: &str) -> Option<&[usize]> {
		let info = self.source_info(source_url)?;
		let index = info
			.reverse_index
			.get_or_init(|| self.build_reverse_index(&info.url));
		Some(index.as_slice())
	}

	/// Number of reverse indices built so far.
	pub fn reverse_index_builds(&self) -> usize {
		self.reverse_index_builds.load(Ordering::Acquire)
	}

	fn build_reverse_index(&self, source_url: &str) -> Vec<usize> {
		let mut indices: Vec<usize> = self
			.mappings
			.iter()
			.enumerate()
			.filter(|(_, entry)| entry.source_url() == Some(source_url))
			.map(|(i, _)| i)
			.collect();
		indices.sort_by_key(|&i| (self.original_at(i), self.mappings[i].generated_position()));

		self.reverse_index_builds.fetch_add(1, Ordering::AcqRel);
		debug!(source = %source_url, entries = indices.len(), "built reverse index");
		indices
	}

	/// Best entry for original `(line, column)` of `source_url`.
	///
	/// Picks the last entry on `line` at or before `column`, or the first
	/// entry of the line when `column` precedes them all. `None` when the
	/// line has no entries.
	pub fn source_line_mapping(&self, source_url: &str, line: u32, column: u32) -> Option<&MappingEntry> {
		let reverse = self.reverse_index_for(source_url)?;
		let first = reverse.partition_point(|&i| self.original_at(i).line < line);
		let last = reverse.partition_point(|&i| self.original_at(i).line <= line);
		let on_line = &reverse[first..last];

		let after = on_line.partition_point(|&i| self.original_at(i).column <= column);
		let slot = match after.checked_sub(1) {
			Some(before) => on_line[before],
			None => *on_line.first()?,
		};
		Some(&self.mappings[slot])
	}

	/// Table indices of entries mapped exactly to original `(line, column)`.
	pub fn find_reverse_indices(&self, source_url: &str, line: u32, column: u32) -> Vec<usize> {
		let Some(reverse) = self.reverse_index_for(source_url) else {
			return Vec::new();
		};
		let target = Position::new(line, column);
		let lower = reverse.partition_point(|&i| self.original_at(i) < target);
		let upper = reverse.partition_point(|&i| self.original_at(i) <= target);
		reverse[lower..upper].to_vec()
	}

	pub fn find_reverse_entries(&self, source_url: &str, line: u32, column: u32) -> Vec<&MappingEntry> {
		self.find_reverse_indices(source_url, line, column)
			.into_iter()
			.map(|i| &self.mappings[i])
			.collect()
	}

	/// Generated ranges of the entries mapped exactly to original
	/// `(line, column)`. Entries adjacent in the table become one range.
	pub fn find_reverse_ranges(&self, source_url: &str, line: u32, column: u32) -> Vec<TextRange> {
		let indices = self.find_reverse_indices(source_url, line, column);
		let mut ranges = Vec::new();

		let mut i = 0;
		while i < indices.len() {
			let start = indices[i];
			let mut end = start + 1;
			while i + 1 < indices.len() && indices[i + 1] == end {
				end += 1;
				i += 1;
			}
			ranges.push(self.generated_range(start, end));
			i += 1;
		}
		ranges
	}

	/// Generated ranges covering the original half-open `text_range`.
	///
	/// Partial coverage counts as none: when no entry starts after the end
	/// of `text_range`, the result is empty.
	pub fn reverse_map_text_ranges(&self, source_url: &str, text_range: TextRange) -> Vec<TextRange> {
		let Some(reverse) = self.reverse_index_for(source_url) else {
			return Vec::new();
		};
		let start = reverse.partition_point(|&i| self.original_at(i) < text_range.start);
		let end = reverse.partition_point(|&i| self.original_at(i) <= text_range.end);
		if end >= reverse.len() {
			return Vec::new();
		}

		let mut ranges: Vec<TextRange> = reverse[start..end]
			.iter()
			.map(|&i| self.generated_range(i, i + 1))
			.collect();
		ranges.sort();

		let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
		for range in ranges {
			match merged.last_mut() {
				Some(last) if last.immediately_precedes(&range) => last.end = range.end,
				_ => merged.push(range),
			}
		}
		merged
	}

	pub fn has_scope_info(&self) -> bool {
		self.scope_info.is_some()
	}

	pub fn scope_info(&self) -> Option<&ScopeInfo> {
		self.scope_info.as_ref()
	}

	/// Name of the original function executing at generated `(line, column)`.
	pub fn find_original_function_name(&self, line: u32, column: u32) -> Option<&str> {
		self.scope_info
			.as_ref()?
			.find_original_function_name(Position::new(line, column))
	}

	fn upper_bound_generated(&self, target: Position) -> usize {
		self.mappings
			.partition_point(|entry| entry.generated_position() <= target)
	}

	/// Original position of table entry `i`; only called for reverse-index members.
	fn original_at(&self, i: usize) -> Position {
		self.mappings[i].original_position().unwrap_or_default()
	}

	/// `[entry start, entry end)` in generated coordinates; open ended past
	/// the last entry.
	fn generated_range(&self, start: usize, end: usize) -> TextRange {
		let range_end = self
			.mappings
			.get(end)
			.map_or(Position::open_end(), MappingEntry::generated_position);
		TextRange::new(self.mappings[start].generated_position(), range_end)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::position::RANGE_END;

	fn index(json: &str) -> SourceMapIndex {
		SourceMapIndex::parse("out.js", "", json).unwrap()
	}

	fn sample_source_map() -> &'static str {
		r#"{
			"version": 3,
			"file": "out.js",
			"sourceRoot": "",
			"sources": ["src/index.ts"],
			"sourcesContent": ["function hello() {\n  console.log('Hello, World!');\n}\n\nhello();\n"],
			"names": ["hello", "console", "log"],
			"mappings": "AAAA,SAASA,KAAKT,CAAC;AACXC,OAAQ,CAACC,GAAG,CAAC,eAAe,CAAC,CAAC;AAClC,CAAC;AAEDF,KAAK,EAAE,CAAC"
		}"#
	}

	// Generated line 0: (0,0)->(0,0), (0,4)->(1,0), (0,8)->(0,0).
	// Generated line 1: (1,0)->(1,0), (1,6)->(1,4).
	fn reverse_fixture() -> SourceMapIndex {
		index(r#"{"version": 3, "sources": ["a.js"], "mappings": "AAAA,IACA,IADA;AACA,MAAI"}"#)
	}

	fn pos(line: u32, column: u32) -> Position {
		Position::new(line, column)
	}

	#[test]
	fn test_parse_sample_map() {
		let sm = index(sample_source_map());
		assert_eq!(sm.compiled_url(), "out.js");
		assert_eq!(sm.source_urls().collect::<Vec<_>>(), vec!["src/index.ts"]);
		assert!(sm.embedded_content("src/index.ts").unwrap().starts_with("function hello()"));
		assert!(sm.embedded_content("missing.ts").is_none());
		assert!(sm.maps_origin());
	}

	#[test]
	fn test_find_entry() {
		let sm = index(sample_source_map());

		let entry = sm.find_entry(0, 0).unwrap();
		assert_eq!(entry.source_url(), Some("src/index.ts"));
		assert_eq!(entry.original_position(), Some(pos(0, 0)));

		// Column 12 falls in the entry that starts at column 9 and names `hello`.
		let entry = sm.find_entry(0, 12).unwrap();
		assert_eq!(entry.generated_column, 9);
		assert_eq!(entry.original_position(), Some(pos(0, 9)));
		assert_eq!(entry.name.as_deref(), Some("hello"));
	}

	#[test]
	fn test_find_entry_before_first_mapping() {
		let sm = index(r#"{"version": 3, "sources": ["a.js"], "mappings": ";KAAA"}"#);
		assert!(sm.find_entry(0, 100).is_none());
		assert!(sm.find_entry(1, 4).is_none());
		assert_eq!(sm.find_entry(1, 5).unwrap().generated_column, 5);
		assert!(!sm.maps_origin());
	}

	#[test]
	fn test_find_entry_prefers_last_of_equal_positions() {
		// Two entries at generated (0,0): original columns 1 then 2.
		let sm = index(r#"{"version": 3, "sources": ["a.js"], "mappings": "AAAC,AAAC"}"#);
		let entry = sm.find_entry(0, 0).unwrap();
		assert_eq!(entry.original_position(), Some(pos(0, 2)));
	}

	#[test]
	fn test_empty_table() {
		let sm = index(r#"{"version": 3, "sources": [], "mappings": ""}"#);
		assert!(sm.find_entry(0, 0).is_none());
		assert!(sm.find_entry_ranges(0, 0).is_none());
		assert!(!sm.maps_origin());
	}

	#[test]
	fn test_reverse_index_order() {
		let sm = reverse_fixture();
		let reverse = sm.reverse_index_for("a.js").unwrap();
		// Table: 0:(0,0) 1:(0,4) 2:(0,8) 3:(1,0) 4:(1,6)
		// Original keys: 0:(0,0) 1:(1,0) 2:(0,0) 3:(1,0) 4:(1,4)
		assert_eq!(reverse, &[0, 2, 1, 3, 4]);
		assert!(sm.reverse_index_for("unknown.js").is_none());
	}

	#[test]
	fn test_reverse_index_built_once() {
		let sm = reverse_fixture();
		assert!(!sm.source_info("a.js").unwrap().is_reverse_index_built());
		let first = sm.reverse_index_for("a.js").unwrap().as_ptr();
		let second = sm.reverse_index_for("a.js").unwrap().as_ptr();
		assert_eq!(first, second);
		assert_eq!(sm.reverse_index_builds(), 1);
		assert!(sm.source_info("a.js").unwrap().is_reverse_index_built());
	}

	#[test]
	fn test_source_line_mapping() {
		let sm = reverse_fixture();

		// Line 1 has entries at columns 0 (twice) and 4.
		let entry = sm.source_line_mapping("a.js", 1, 2).unwrap();
		assert_eq!(entry.generated_position(), pos(1, 0));
		let entry = sm.source_line_mapping("a.js", 1, 9).unwrap();
		assert_eq!(entry.generated_position(), pos(1, 6));

		assert!(sm.source_line_mapping("a.js", 7, 0).is_none());
		assert!(sm.source_line_mapping("b.js", 0, 0).is_none());
	}

	#[test]
	fn test_source_line_mapping_falls_back_to_first_on_line() {
		let sm = index(r#"{"version": 3, "sources": ["a.js"], "mappings": "AAKA"}"#);
		let entry = sm.source_line_mapping("a.js", 0, 1).unwrap();
		assert_eq!(entry.original_position(), Some(pos(0, 5)));
	}

	#[test]
	fn test_find_reverse_entries_exact_match() {
		let sm = reverse_fixture();

		let entries = sm.find_reverse_entries("a.js", 0, 0);
		let generated: Vec<Position> = entries.iter().map(|e| e.generated_position()).collect();
		assert_eq!(generated, vec![pos(0, 0), pos(0, 8)]);

		assert!(sm.find_reverse_entries("a.js", 0, 1).is_empty());
		assert!(sm.find_reverse_entries("b.js", 0, 0).is_empty());
	}

	#[test]
	fn test_find_reverse_ranges_merges_adjacent_entries() {
		let sm = reverse_fixture();

		// Entries 0 and 2 are not adjacent in the table.
		assert_eq!(
			sm.find_reverse_ranges("a.js", 0, 0),
			vec![
				TextRange::new(pos(0, 0), pos(0, 4)),
				TextRange::new(pos(0, 8), pos(1, 0)),
			]
		);

		// Entries 1 and 3 map to (1,0); entry 2 sits between them.
		assert_eq!(sm.find_reverse_ranges("a.js", 1, 0).len(), 2);

		// The last entry is open ended.
		assert_eq!(
			sm.find_reverse_ranges("a.js", 1, 4),
			vec![TextRange::new(pos(1, 6), Position::new(RANGE_END, RANGE_END))]
		);
	}

	#[test]
	fn test_find_reverse_ranges_adjacent_merge() {
		// Generated (0,0) and (0,3) both map to original (0,0).
		let sm = index(r#"{"version": 3, "sources": ["a.js"], "mappings": "AAAA,GAAA,GAAC"}"#);
		assert_eq!(
			sm.find_reverse_ranges("a.js", 0, 0),
			vec![TextRange::new(pos(0, 0), pos(0, 6))]
		);
	}

	#[test]
	fn test_reverse_map_text_ranges() {
		let sm = reverse_fixture();

		// Original [ (0,0), (1,0) ] covers slots for keys (0,0), (0,0), (1,0), (1,0).
		let ranges = sm.reverse_map_text_ranges("a.js", TextRange::new(pos(0, 0), pos(1, 0)));
		assert_eq!(
			ranges,
			vec![TextRange::new(pos(0, 0), pos(1, 6))]
		);
	}

	#[test]
	fn test_reverse_map_text_ranges_partial_coverage_is_empty() {
		let sm = reverse_fixture();
		// The upper bound of (1,4) is the end of the reverse index.
		let ranges = sm.reverse_map_text_ranges("a.js", TextRange::new(pos(0, 0), pos(1, 4)));
		assert!(ranges.is_empty());
	}

	#[test]
	fn test_reverse_map_text_ranges_without_mappings() {
		let sm = index(r#"{"version": 3, "sources": ["a.js", "b.js"], "mappings": "AAAA"}"#);
		let range = TextRange::new(pos(0, 0), pos(10, 0));
		assert!(sm.reverse_map_text_ranges("b.js", range).is_empty());
		assert!(sm.reverse_map_text_ranges("c.js", range).is_empty());
	}

	#[test]
	fn test_find_entry_ranges() {
		let sm = reverse_fixture();

		let ranges = sm.find_entry_ranges(0, 5).unwrap();
		assert_eq!(ranges.range, TextRange::new(pos(0, 4), pos(0, 8)));
		assert_eq!(ranges.source_range, TextRange::new(pos(1, 0), pos(1, 4)));
		assert_eq!(&*ranges.source_url, "a.js");

		let ranges = sm.find_entry_ranges(1, 7).unwrap();
		assert_eq!(ranges.range.end, Position::open_end());
		assert_eq!(ranges.source_range.end, Position::open_end());
	}

	#[test]
	fn test_find_entry_ranges_unmapped_entry() {
		let sm = index(r#"{"version": 3, "sources": ["a.js"], "mappings": "AAAA,E"}"#);
		assert!(sm.find_entry_ranges(0, 3).is_none());
	}

	#[test]
	fn test_mappings_with_name() {
		let sm = index(
			r#"{"version": 3, "sources": ["a.js"], "names": ["hello", "world"], "mappings": "AAAAA,EAAEC,EAAED"}"#,
		);
		let hello: Vec<u32> = sm
			.mappings_with_name("hello")
			.iter()
			.map(|e| e.generated_column)
			.collect();
		assert_eq!(hello, vec![0, 4]);
		assert_eq!(sm.mappings_with_name("world").len(), 1);
		assert!(sm.mappings_with_name("missing").is_empty());
	}

	#[test]
	fn test_ignore_list_hint() {
		let sm = index(
			r#"{"version": 3, "sources": ["app.js", "node_modules/lib.js"], "ignoreList": [1], "mappings": "AAAA"}"#,
		);
		assert!(!sm.has_ignore_list_hint("app.js"));
		assert!(sm.has_ignore_list_hint("node_modules/lib.js"));
		assert!(!sm.has_ignore_list_hint("unknown.js"));
	}

	#[test]
	fn test_line_count_and_warnings() {
		let sm = index(
			r#"{
				"version": 3,
				"x_google_linecount": 42,
				"sections": [{"offset": {"line": 0, "column": 0}, "url": "other.js.map"}]
			}"#,
		);
		assert_eq!(sm.line_count(), Some(42));
		assert_eq!(sm.warnings().len(), 1);
		assert!(sm.mappings().is_empty());
	}

	#[test]
	fn test_scope_info_attached() {
		let sm = index(
			r#"{
				"version": 3,
				"sources": ["a.js"],
				"names": ["foo", "function", "x", "y"],
				"mappings": "AAAA",
				"originalScopes": ["AAA,CEOACEC,GC,CA"],
				"generatedRanges": "ACAA;ISACEFGAMD;G,E"
			}"#,
		);
		assert!(sm.has_scope_info());
		assert_eq!(sm.find_original_function_name(1, 5), Some("foo"));
		assert_eq!(sm.find_original_function_name(0, 1), None);
	}

	#[test]
	fn test_scope_decoding_can_be_disabled() {
		let options = DecodeOptions {
			decode_scopes: false,
			..DecodeOptions::default()
		};
		let sm = SourceMapIndex::parse_with(
			"out.js",
			"",
			r#"{"version": 3, "sources": ["a.js"], "names": [], "mappings": "AAAA", "originalScopes": ["A"], "generatedRanges": "A"}"#,
			&options,
			&StandardUrlResolver,
		)
		.unwrap();
		assert!(!sm.has_scope_info());
	}

	#[test]
	fn test_malformed_scopes_are_fatal() {
		let result = SourceMapIndex::parse(
			"out.js",
			"",
			r#"{"version": 3, "sources": ["a.js"], "names": [], "mappings": "AAAA", "originalScopes": ["AAA"], "generatedRanges": ""}"#,
		);
		assert!(matches!(result, Err(DecodeError::UnbalancedScopeItems(_))));
	}

	#[test]
	fn test_malformed_mappings_are_fatal() {
		let result = SourceMapIndex::parse("out.js", "", r#"{"version": 3, "sources": ["a.js"], "mappings": "AAAA,AA"}"#);
		assert!(matches!(result, Err(DecodeError::MalformedMappings { .. })));
	}

	#[test]
	fn test_index_is_send_and_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<SourceMapIndex>();
	}
}
