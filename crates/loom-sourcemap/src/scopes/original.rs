// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Original scope trees.
//!
//! Each source's `originalScopes` string is a comma-separated list of items.
//! Every item starts with a line delta and an absolute column. A start item
//! continues with flags, an optional name index delta, an optional kind
//! index delta and any number of variable name index deltas. An item with
//! only the position closes the innermost open scope.

use std::collections::HashMap;

use crate::error::{DecodeError, Result};
use crate::position::Position;
use crate::scopes::resolve_name;
use crate::vlq::VlqCursor;

const HAS_NAME: i64 = 0x1;
const HAS_KIND: i64 = 0x2;
const IS_STACK_FRAME: i64 = 0x4;

/// Handle of a scope inside its [`OriginalScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
	pub fn index(self) -> usize {
		self.0
	}
}

/// A lexical scope in an original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalScope {
	pub start: Position,
	pub end: Position,
	pub kind: Option<String>,
	pub name: Option<String>,
	pub is_stack_frame: bool,
	pub variables: Vec<String>,
	pub children: Vec<ScopeId>,
	/// Enclosing scope; `None` for the root.
	pub parent: Option<ScopeId>,
}

/// Arena holding every scope of one source, owned top-down from `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalScopeTree {
	scopes: Vec<OriginalScope>,
	root: ScopeId,
	scope_for_item: HashMap<usize, ScopeId>,
}

impl OriginalScopeTree {
	pub fn root(&self) -> ScopeId {
		self.root
	}

	pub fn root_scope(&self) -> &OriginalScope {
		&self.scopes[self.root.0]
	}

	pub fn get(&self, id: ScopeId) -> Option<&OriginalScope> {
		self.scopes.get(id.0)
	}

	/// Scope started by the item at `item_index` in the encoded stream.
	pub fn scope_for_item(&self, item_index: usize) -> Option<ScopeId> {
		self.scope_for_item.get(&item_index).copied()
	}

	/// `id` and its enclosing scopes, innermost first.
	pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = &OriginalScope> + '_ {
		std::iter::successors(self.get(id), move |scope| scope.parent.and_then(|p| self.get(p)))
	}

	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}
}

fn unbalanced(reason: impl Into<String>) -> DecodeError {
	DecodeError::UnbalancedScopeItems(reason.into())
}

fn add(total: i64, delta: i64) -> Result<i64> {
	total
		.checked_add(delta)
		.ok_or_else(|| unbalanced("running total overflow"))
}

/// Decode one source's encoded original scopes.
///
/// Only the first top-level scope is kept. Top-level scopes after it are
/// skipped, but must still be balanced.
pub fn decode_original_scope(encoded: &str, names: &[String]) -> Result<OriginalScopeTree> {
	let mut cursor = VlqCursor::new(encoded);
	let mut scopes: Vec<OriginalScope> = Vec::new();
	let mut scope_for_item = HashMap::new();
	let mut stack: Vec<ScopeId> = Vec::new();
	let mut root: Option<ScopeId> = None;
	let mut skipped_depth = 0usize;

	let mut line = 0i64;
	let mut prev_column = 0i64;
	let mut name_index = 0i64;
	let mut kind_index = 0i64;
	let mut variable_index = 0i64;
	let mut item_index = 0usize;

	while cursor.has_next() {
		if cursor.peek() == Some(b',') {
			cursor.next_char();
			continue;
		}

		let line_delta = cursor.next_vlq()?;
		let column = cursor.next_vlq()?;
		if line_delta == 0 && column < prev_column {
			return Err(unbalanced("items are not ordered by source position"));
		}
		prev_column = column;
		line = add(line, line_delta)?;

		let position = match (u32::try_from(line), u32::try_from(column)) {
			(Ok(line), Ok(column)) => Position::new(line, column),
			_ => return Err(unbalanced("item position out of range")),
		};

		if cursor.at_item_end() {
			item_index += 1;
			if root.is_some() {
				skipped_depth = skipped_depth
					.checked_sub(1)
					.ok_or_else(|| unbalanced("end item without a matching start item"))?;
				continue;
			}

			let id = stack
				.pop()
				.ok_or_else(|| unbalanced("end item without a matching start item"))?;
			scopes[id.0].end = position;
			match stack.last() {
				Some(&parent) => {
					scopes[id.0].parent = Some(parent);
					scopes[parent.0].children.push(id);
				}
				None => root = Some(id),
			}
			continue;
		}

		let flags = cursor.next_vlq()?;
		let mut name = None;
		if flags & HAS_NAME != 0 {
			name_index = add(name_index, cursor.next_vlq()?)?;
			name = Some(resolve_name(name_index, names)?);
		}
		let mut kind = None;
		if flags & HAS_KIND != 0 {
			kind_index = add(kind_index, cursor.next_vlq()?)?;
			kind = Some(resolve_name(kind_index, names)?);
		}
		let mut variables = Vec::new();
		while !cursor.at_item_end() {
			variable_index = add(variable_index, cursor.next_vlq()?)?;
			variables.push(resolve_name(variable_index, names)?);
		}

		if root.is_some() {
			skipped_depth += 1;
			item_index += 1;
			continue;
		}

		let id = ScopeId(scopes.len());
		scopes.push(OriginalScope {
			start: position,
			end: position,
			kind,
			name,
			is_stack_frame: flags & IS_STACK_FRAME != 0,
			variables,
			children: Vec::new(),
			parent: None,
		});
		stack.push(id);
		scope_for_item.insert(item_index, id);
		item_index += 1;
	}

	match root {
		Some(root) if skipped_depth == 0 => Ok(OriginalScopeTree {
			scopes,
			root,
			scope_for_item,
		}),
		Some(_) => Err(unbalanced("trailing top-level scope left open")),
		None if stack.is_empty() => Err(unbalanced("no top-level scope")),
		None => Err(unbalanced(format!("{} scope(s) left open", stack.len()))),
	}
}
