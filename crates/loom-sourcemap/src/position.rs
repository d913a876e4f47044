// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Zero-based line/column positions and half-open text ranges.

use serde::{Deserialize, Serialize};

/// Line and column used for range ends that run past the last mapping.
///
/// Source maps carry no end positions, so the final entry of a file is open
/// ended. The largest signed 32-bit integer is larger than any script we
/// would ever map.
pub const RANGE_END: u32 = i32::MAX as u32;

/// A zero-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
	pub line: u32,
	pub column: u32,
}

impl Position {
	pub const fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}

	/// The open end used by [`RANGE_END`].
	pub const fn open_end() -> Self {
		Self::new(RANGE_END, RANGE_END)
	}
}

/// A half-open range `[start, end)` of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextRange {
	pub start: Position,
	pub end: Position,
}

impl TextRange {
	pub const fn new(start: Position, end: Position) -> Self {
		Self { start, end }
	}

	pub fn is_empty(&self) -> bool {
		self.start >= self.end
	}

	/// Whether `position` lies inside `[start, end)`.
	pub fn contains(&self, position: Position) -> bool {
		self.start <= position && position < self.end
	}

	/// Whether this range ends exactly where `other` begins.
	pub fn immediately_precedes(&self, other: &TextRange) -> bool {
		self.end == other.start
	}
}
