// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Generated range trees.
//!
//! The `generatedRanges` string uses `;` to advance the generated line and
//! `,` to separate items. An item with only a column closes the innermost
//! open range. A start item continues with flags, an optional definition
//! (reference into an [`OriginalScopeTree`]), an optional callsite and one
//! bindings entry per variable of the referenced scope.

use tracing::trace;

use crate::error::{DecodeError, Result};
use crate::position::{Position, TextRange};
use crate::scopes::original::{OriginalScopeTree, ScopeId};
use crate::scopes::resolve_binding_name;
use crate::vlq::VlqCursor;

const HAS_DEFINITION: i64 = 0x1;
const HAS_CALLSITE: i64 = 0x2;
const IS_HIDDEN: i64 = 0x4;
const IS_STACK_FRAME: i64 = 0x8;

/// Reference to a scope of a decoded original scope tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginalScopeRef {
	pub source_index: usize,
	pub scope: ScopeId,
}

/// Original location a range was inlined from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Callsite {
	pub source_index: usize,
	pub line: u32,
	pub column: u32,
}

/// Part of a range during which a variable is bound to one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRangeBinding {
	pub range: TextRange,
	/// `None` while the variable is unavailable.
	pub value: Option<String>,
}

/// Value of one variable slot over a generated range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingValue {
	/// One expression (or unavailable) for the whole range.
	Constant(Option<String>),
	/// Consecutive sub-ranges covering the whole range.
	SubRanges(Vec<SubRangeBinding>),
}

/// A range of generated code, nested like the original scopes it maps to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedRange {
	pub start: Position,
	pub end: Position,
	pub is_stack_frame: bool,
	pub is_hidden: bool,
	pub original_scope: Option<OriginalScopeRef>,
	pub callsite: Option<Callsite>,
	pub values: Vec<BindingValue>,
	pub children: Vec<GeneratedRange>,
}

impl GeneratedRange {
	pub fn contains(&self, position: Position) -> bool {
		TextRange::new(self.start, self.end).contains(position)
	}
}

#[derive(Debug, Clone, Copy)]
struct RawBinding {
	position: Position,
	name_index: i64,
}

/// A range whose end item has not been seen yet. Bindings need the end
/// position, so they stay raw until the range closes.
struct OpenRange {
	range: GeneratedRange,
	bindings: Vec<Vec<RawBinding>>,
}

/// Running totals; most fields are relative to the preceding start item.
struct DecoderState {
	line: u32,
	column: i64,
	item_line: u32,
	definition_source: i64,
	definition_scope: i64,
	callsite_source: i64,
	callsite_line: i64,
	callsite_column: i64,
}

fn unbalanced(reason: impl Into<String>) -> DecodeError {
	DecodeError::UnbalancedRangeItems(reason.into())
}

fn to_position(line: i64, column: i64) -> Result<Position> {
	match (u32::try_from(line), u32::try_from(column)) {
		(Ok(line), Ok(column)) => Ok(Position::new(line, column)),
		_ => Err(unbalanced("item position out of range")),
	}
}

fn add(total: i64, delta: i64) -> Result<i64> {
	total
		.checked_add(delta)
		.ok_or_else(|| unbalanced("running total overflow"))
}

fn lookup_tree<'t>(
	trees: &'t [Option<OriginalScopeTree>],
	source_index: i64,
) -> Result<(usize, &'t OriginalScopeTree)> {
	usize::try_from(source_index)
		.ok()
		.and_then(|i| trees.get(i).and_then(Option::as_ref).map(|tree| (i, tree)))
		.ok_or(DecodeError::InvalidSourceIndex(source_index))
}

/// Decode `generatedRanges` against the original scope trees of the same map.
///
/// Decoding starts at `base` in the generated file; `source_base` is added to
/// every source index stored in the result. Callsites may point at any of the
/// map's `source_count` sources. Multiple top-level ranges are allowed.
pub fn decode_generated_ranges(
	encoded: &str,
	trees: &[Option<OriginalScopeTree>],
	source_count: usize,
	names: &[String],
	base: Position,
	source_base: usize,
) -> Result<Vec<GeneratedRange>> {
	let mut cursor = VlqCursor::new(encoded);
	let mut stack = vec![OpenRange {
		range: GeneratedRange::default(),
		bindings: Vec::new(),
	}];
	let mut state = DecoderState {
		line: base.line,
		column: i64::from(base.column),
		item_line: base.line,
		definition_source: 0,
		definition_scope: 0,
		callsite_source: 0,
		callsite_line: 0,
		callsite_column: 0,
	};

	while let Some(ch) = cursor.peek() {
		match ch {
			b';' => {
				cursor.next_char();
				state.line = state
					.line
					.checked_add(1)
					.ok_or_else(|| unbalanced("generated line overflow"))?;
				continue;
			}
			b',' => {
				cursor.next_char();
				continue;
			}
			_ => {}
		}

		let column_delta = cursor.next_vlq()?;
		state.column = add(if state.line == state.item_line { state.column } else { 0 }, column_delta)?;
		state.item_line = state.line;
		let position = to_position(i64::from(state.line), state.column)?;

		if cursor.at_item_end() {
			// The pseudo-root at the bottom of the stack is never closed.
			let mut open = match stack.pop() {
				Some(open) if !stack.is_empty() => open,
				_ => return Err(unbalanced("end item without a matching start item")),
			};
			open.range.end = position;
			open.range.values = resolve_bindings(&open.range, &open.bindings, names)?;
			if let Some(parent) = stack.last_mut() {
				parent.range.children.push(open.range);
			}
			continue;
		}

		let flags = cursor.next_vlq()?;
		let mut range = GeneratedRange {
			start: position,
			end: position,
			is_stack_frame: flags & IS_STACK_FRAME != 0,
			is_hidden: flags & IS_HIDDEN != 0,
			..GeneratedRange::default()
		};

		if flags & HAS_DEFINITION != 0 {
			let source_delta = cursor.next_vlq()?;
			let scope_delta = cursor.next_vlq()?;
			state.definition_scope = add(if source_delta == 0 { state.definition_scope } else { 0 }, scope_delta)?;
			state.definition_source = add(state.definition_source, source_delta)?;

			let (source_index, tree) = lookup_tree(trees, state.definition_source)?;
			let scope = usize::try_from(state.definition_scope)
				.ok()
				.and_then(|item| tree.scope_for_item(item))
				.ok_or(DecodeError::InvalidScopeIndex(state.definition_scope))?;
			range.original_scope = Some(OriginalScopeRef {
				source_index: source_base + source_index,
				scope,
			});
		}

		if flags & HAS_CALLSITE != 0 {
			let source_delta = cursor.next_vlq()?;
			let line = cursor.next_vlq()?;
			let column = cursor.next_vlq()?;
			state.callsite_column = add(
				if line == 0 && source_delta == 0 { state.callsite_column } else { 0 },
				column,
			)?;
			state.callsite_line = add(if source_delta == 0 { state.callsite_line } else { 0 }, line)?;
			state.callsite_source = add(state.callsite_source, source_delta)?;

			let source_index = usize::try_from(state.callsite_source)
				.ok()
				.filter(|&i| i < source_count)
				.ok_or(DecodeError::InvalidSourceIndex(state.callsite_source))?;
			let callsite = to_position(state.callsite_line, state.callsite_column)?;
			range.callsite = Some(Callsite {
				source_index: source_base + source_index,
				line: callsite.line,
				column: callsite.column,
			});
		}

		let mut bindings = Vec::new();
		while !cursor.at_item_end() {
			bindings.push(decode_variable_bindings(&mut cursor, position)?);
		}

		stack.push(OpenRange { range, bindings });
	}

	if stack.len() != 1 {
		return Err(unbalanced(format!("{} range(s) left open", stack.len() - 1)));
	}
	let ranges = stack.pop().map(|root| root.range.children).unwrap_or_default();
	trace!(count = ranges.len(), "decoded generated ranges");
	Ok(ranges)
}

/// Decode the bindings of one variable slot of a start item at `start`.
fn decode_variable_bindings(cursor: &mut VlqCursor<'_>, start: Position) -> Result<Vec<RawBinding>> {
	let first = cursor.next_vlq()?;
	if first >= -1 {
		return Ok(vec![RawBinding {
			position: start,
			name_index: first,
		}]);
	}

	let count = first.unsigned_abs();
	let mut bindings = vec![RawBinding {
		position: start,
		name_index: cursor.next_vlq()?,
	}];
	let mut last = start;
	for _ in 1..count {
		let line_delta = cursor.next_vlq()?;
		let column = cursor.next_vlq()?;
		let name_index = cursor.next_vlq()?;

		let line = add(i64::from(last.line), line_delta)?;
		let column = add(if line_delta == 0 { i64::from(last.column) } else { 0 }, column)?;
		last = to_position(line, column)?;
		bindings.push(RawBinding {
			position: last,
			name_index,
		});
	}
	Ok(bindings)
}

/// Turn raw bindings into values once `range.end` is known.
fn resolve_bindings(
	range: &GeneratedRange,
	bindings: &[Vec<RawBinding>],
	names: &[String],
) -> Result<Vec<BindingValue>> {
	bindings
		.iter()
		.map(|variable| match variable.as_slice() {
			[single] => Ok(BindingValue::Constant(resolve_binding_name(single.name_index, names)?)),
			_ => {
				let mut sub_ranges = Vec::with_capacity(variable.len());
				for (i, binding) in variable.iter().enumerate() {
					let end = variable.get(i + 1).map_or(range.end, |next| next.position);
					sub_ranges.push(SubRangeBinding {
						range: TextRange::new(binding.position, end),
						value: resolve_binding_name(binding.name_index, names)?,
					});
				}
				Ok(BindingValue::SubRanges(sub_ranges))
			}
		})
		.collect()
}
