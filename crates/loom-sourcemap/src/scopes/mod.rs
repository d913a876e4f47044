// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scopes extension: original lexical scopes and the generated ranges that
//! implement them.
//!
//! The two encodings are independent of `mappings`. Generated ranges refer to
//! original scopes by source index and item index, so original scopes are
//! always decoded first.

pub mod generated;
pub mod original;

use tracing::debug;

use crate::error::{DecodeError, Result};
use crate::payload::RawSourceMap;
use crate::position::Position;

pub use generated::{
	decode_generated_ranges, BindingValue, Callsite, GeneratedRange, OriginalScopeRef,
	SubRangeBinding,
};
pub use original::{decode_original_scope, OriginalScope, OriginalScopeTree, ScopeId};

/// Resolve a name table index.
pub(crate) fn resolve_name(index: i64, names: &[String]) -> Result<String> {
	usize::try_from(index)
		.ok()
		.and_then(|i| names.get(i))
		.cloned()
		.ok_or(DecodeError::InvalidNameIndex(index))
}

/// Resolve a binding's name index; `-1` marks an unavailable variable.
pub(crate) fn resolve_binding_name(index: i64, names: &[String]) -> Result<Option<String>> {
	if index == -1 {
		return Ok(None);
	}
	resolve_name(index, names).map(Some)
}

/// Decoded Scopes extension of a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeInfo {
	/// One tree per source index; `None` where a source has no scopes.
	original_scopes: Vec<Option<OriginalScopeTree>>,
	generated_ranges: Vec<GeneratedRange>,
}

impl ScopeInfo {
	pub fn original_scopes(&self) -> &[Option<OriginalScopeTree>] {
		&self.original_scopes
	}

	pub fn generated_ranges(&self) -> &[GeneratedRange] {
		&self.generated_ranges
	}

	pub fn into_parts(self) -> (Vec<Option<OriginalScopeTree>>, Vec<GeneratedRange>) {
		(self.original_scopes, self.generated_ranges)
	}

	pub fn tree(&self, source_index: usize) -> Option<&OriginalScopeTree> {
		self.original_scopes.get(source_index).and_then(Option::as_ref)
	}

	/// Follow a reference stored in a [`GeneratedRange`].
	pub fn original_scope(&self, reference: &OriginalScopeRef) -> Option<&OriginalScope> {
		self.tree(reference.source_index)?.get(reference.scope)
	}

	/// Append the scopes of a later index-map section whose sources start at
	/// `source_base`.
	pub(crate) fn merge(&mut self, other: ScopeInfo, source_base: usize) {
		let ScopeInfo {
			original_scopes,
			generated_ranges,
		} = other;
		self.original_scopes.resize_with(source_base, || None);
		self.original_scopes
			.extend(original_scopes.into_iter().skip(source_base));
		self.generated_ranges.extend(generated_ranges);
		self.generated_ranges.sort_by_key(|range| range.start);
	}

	/// Original scope of the innermost generated range around `position`
	/// that has one.
	pub fn find_innermost_original_scope(&self, position: Position) -> Option<OriginalScopeRef> {
		let mut found = None;
		let mut ranges = self.generated_ranges.as_slice();
		while let Some(range) = ranges.iter().find(|r| r.contains(position)) {
			if range.original_scope.is_some() {
				found = range.original_scope;
			}
			ranges = &range.children;
		}
		found
	}

	/// Name of the original function executing at generated `position`.
	///
	/// Walks outwards from the innermost original scope to the nearest stack
	/// frame. Anonymous frames yield `Some("")`.
	pub fn find_original_function_name(&self, position: Position) -> Option<&str> {
		let reference = self.find_innermost_original_scope(position)?;
		let tree = self.tree(reference.source_index)?;
		tree.ancestors(reference.scope)
			.find(|scope| scope.is_stack_frame)
			.map(|scope| scope.name.as_deref().unwrap_or(""))
	}
}

/// Decode the Scopes extension fields of `map`.
///
/// `base_position` is where this map starts in the generated file (the
/// section offset for index maps).
pub fn decode_scopes(map: &RawSourceMap, base_position: Position) -> Result<ScopeInfo> {
	decode_scopes_at(map, base_position, 0)
}

/// Like [`decode_scopes`], numbering this map's sources from `source_base`.
///
/// The returned original scopes are placed at their global source indices.
pub(crate) fn decode_scopes_at(
	map: &RawSourceMap,
	base_position: Position,
	source_base: usize,
) -> Result<ScopeInfo> {
	let encoded_scopes = map.original_scopes.as_deref().unwrap_or(&[]);
	let trees = encoded_scopes
		.iter()
		.map(|encoded| match encoded.as_deref() {
			None | Some("") => Ok(None),
			Some(encoded) => decode_original_scope(encoded, &map.names).map(Some),
		})
		.collect::<Result<Vec<_>>>()?;

	let generated_ranges = match map.generated_ranges.as_deref() {
		Some(encoded) => {
			decode_generated_ranges(encoded, &trees, map.sources.len(), &map.names, base_position, source_base)?
		}
		None => Vec::new(),
	};

	debug!(
		sources = trees.iter().filter(|t| t.is_some()).count(),
		ranges = generated_ranges.len(),
		"decoded scopes"
	);

	let mut original_scopes = Vec::with_capacity(source_base + trees.len());
	original_scopes.resize_with(source_base, || None);
	original_scopes.extend(trees);

	Ok(ScopeInfo {
		original_scopes,
		generated_ranges,
	})
}
