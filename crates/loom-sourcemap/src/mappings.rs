// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mapping table construction.
//!
//! Turns decoded segments of one plain map, or of every section of an index
//! map, into a single table of [`MappingEntry`] values sorted by generated
//! position.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::DecodeOptions;
use crate::error::{DecodeError, Result};
use crate::index::SourceInfo;
use crate::loader::{is_relative_url, UrlResolver};
use crate::payload::{RawSection, RawSourceMap};
use crate::position::Position;
use crate::scopes::{decode_scopes_at, ScopeInfo};
use crate::segments::{MappingKind, RawSegment, SegmentParser};

/// Position in an original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalLocation {
	/// Global source index; sections of an index map are numbered consecutively.
	pub source_index: u32,
	pub source_url: Arc<str>,
	pub source_line: u32,
	pub source_column: u32,
}

impl OriginalLocation {
	pub fn position(&self) -> Position {
		Position::new(self.source_line, self.source_column)
	}
}

/// A single generated-to-original correspondence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
	/// Line in the generated file (0-indexed).
	pub generated_line: u32,
	/// Column in the generated file (0-indexed).
	pub generated_column: u32,
	/// `None` when the generated range has no original counterpart.
	pub original: Option<OriginalLocation>,
	/// Original identifier name, if the segment carried one.
	pub name: Option<Arc<str>>,
}

impl MappingEntry {
	pub fn generated_position(&self) -> Position {
		Position::new(self.generated_line, self.generated_column)
	}

	pub fn original_position(&self) -> Option<Position> {
		self.original.as_ref().map(OriginalLocation::position)
	}

	pub fn source_url(&self) -> Option<&str> {
		self.original.as_ref().map(|o| o.source_url.as_ref())
	}
}

/// Output of [`MappingTableBuilder::build`].
#[derive(Debug, Default)]
pub struct MappingTable {
	/// Sorted by generated position; equal positions keep encoded order.
	pub entries: Vec<MappingEntry>,
	/// One record per distinct source URL, in first-seen order.
	pub sources: Vec<SourceInfo>,
	pub source_slots: HashMap<Arc<str>, usize>,
	pub line_count: Option<u32>,
	pub warnings: Vec<DecodeError>,
	pub scope_info: Option<ScopeInfo>,
}

/// Builds a [`MappingTable`] from a parsed payload.
pub struct MappingTableBuilder<'a> {
	map_url: &'a str,
	resolver: &'a dyn UrlResolver,
	options: &'a DecodeOptions,
	/// URL for every global source index, duplicates included.
	source_urls: Vec<Arc<str>>,
	table: MappingTable,
}

impl<'a> MappingTableBuilder<'a> {
	pub fn new(map_url: &'a str, resolver: &'a dyn UrlResolver, options: &'a DecodeOptions) -> Self {
		Self {
			map_url,
			resolver,
			options,
			source_urls: Vec::new(),
			table: MappingTable::default(),
		}
	}

	pub fn build(mut self, payload: &RawSourceMap) -> Result<MappingTable> {
		self.table.line_count = payload.x_google_linecount;

		match &payload.sections {
			Some(sections) => {
				for section in sections {
					self.add_section(section)?;
				}
			}
			None => self.add_map(payload, Position::default())?,
		}

		self.table.entries.sort_by_key(MappingEntry::generated_position);

		debug!(
			mappings = self.table.entries.len(),
			sources = self.table.sources.len(),
			warnings = self.table.warnings.len(),
			"built mapping table"
		);
		Ok(self.table)
	}

	fn add_section(&mut self, section: &RawSection) -> Result<()> {
		let offset = Position::from(section.offset);

		let Some(map) = section.map.as_deref() else {
			let url = section.url.clone().unwrap_or_default();
			warn!(url = %url, line = offset.line, column = offset.column, "source map section url is not supported");
			self.table.warnings.push(DecodeError::UnsupportedSectionUrl(url));
			return Ok(());
		};

		if map.is_sectioned() {
			warn!(line = offset.line, column = offset.column, "nested index map is not supported");
			self.table.warnings.push(DecodeError::NestedSections {
				line: offset.line,
				column: offset.column,
			});
			return Ok(());
		}

		self.add_map(map, offset)
	}

	fn add_map(&mut self, map: &RawSourceMap, offset: Position) -> Result<()> {
		let source_base = self.source_urls.len();
		self.add_sources(map);

		let names: Vec<Arc<str>> = map.names.iter().map(|n| Arc::from(n.as_str())).collect();
		let source_count = map.sources.len();

		for segment in SegmentParser::new(&map.mappings, offset) {
			let entry = self.resolve_segment(segment?, source_base, source_count, &names)?;
			self.table.entries.push(entry);
		}

		if self.options.decode_scopes && map.has_scopes() {
			let info = decode_scopes_at(map, offset, source_base)?;
			self.table
				.scope_info
				.get_or_insert_with(ScopeInfo::default)
				.merge(info, source_base);
		}

		trace!(source_base, source_count, "added map");
		Ok(())
	}

	fn add_sources(&mut self, map: &RawSourceMap) {
		let source_root = map.source_root.as_deref().unwrap_or("");
		let ignore_list = map.ignore_list();

		for (index, source) in map.sources.iter().enumerate() {
			// A null source keeps its index but never resolves to the map URL.
			let url: Arc<str> = match source.as_deref() {
				Some(source) => Arc::from(self.resolve_source_url(source_root, source)),
				None => Arc::from(""),
			};
			self.source_urls.push(url.clone());

			if self.table.source_slots.contains_key(&url) {
				continue;
			}

			let hint = u32::try_from(index).is_ok_and(|i| ignore_list.contains(&i));
			let content = map.source_content(index).map(str::to_string);
			self.table.source_slots.insert(url.clone(), self.table.sources.len());
			self.table.sources.push(SourceInfo::new(url, content, hint));
		}
	}

	/// Join `source` with `source_root` when it is relative, then complete it
	/// against the map URL.
	fn resolve_source_url(&self, source_root: &str, source: &str) -> String {
		let href = if !is_relative_url(source) {
			source.to_string()
		} else if !source_root.is_empty()
			&& !source_root.ends_with('/')
			&& !source.is_empty()
			&& !source.starts_with('/')
		{
			format!("{source_root}/{source}")
		} else {
			format!("{source_root}{source}")
		};

		self.resolver.resolve(self.map_url, &href).unwrap_or(href)
	}

	fn resolve_segment(
		&self,
		segment: RawSegment,
		source_base: usize,
		source_count: usize,
		names: &[Arc<str>],
	) -> Result<MappingEntry> {
		let (source, name_index) = match segment.kind {
			MappingKind::ColumnOnly => {
				return Ok(MappingEntry {
					generated_line: segment.generated_line,
					generated_column: segment.generated_column,
					original: None,
					name: None,
				});
			}
			MappingKind::WithSource {
				source_index,
				source_line,
				source_column,
			} => ((source_index, source_line, source_column), None),
			MappingKind::WithName {
				source_index,
				source_line,
				source_column,
				name_index,
			} => ((source_index, source_line, source_column), Some(name_index)),
		};
		let (source_index, source_line, source_column) = source;

		let local = usize::try_from(source_index)
			.ok()
			.filter(|&i| i < source_count)
			.ok_or(DecodeError::InvalidSourceIndex(source_index))?;
		let global = source_base + local;
		let source_url = self.source_urls[global].clone();

		let name = name_index
			.and_then(|i| usize::try_from(i).ok())
			.and_then(|i| names.get(i).cloned());

		Ok(MappingEntry {
			generated_line: segment.generated_line,
			generated_column: segment.generated_column,
			original: Some(OriginalLocation {
				source_index: u32::try_from(global).map_err(|_| DecodeError::InvalidSourceIndex(source_index))?,
				source_url,
				source_line,
				source_column,
			}),
			name,
		})
	}
}
