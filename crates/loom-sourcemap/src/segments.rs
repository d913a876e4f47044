// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Segment stream parser for the `mappings` field.
//!
//! The mappings string format:
//! - Lines are separated by semicolons (`;`)
//! - Segments within a line are separated by commas (`,`)
//! - Each segment contains 1, 4, or 5 VLQ-encoded values
//!
//! All values are deltas. The generated column restarts at 0 on every line;
//! source index, original line, original column and name index are running
//! totals over the entire stream.

use crate::error::{DecodeError, Result};
use crate::position::Position;
use crate::vlq::VlqCursor;

/// Which optional fields a segment carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
	/// Generated column only: this generated range has no original counterpart.
	ColumnOnly,
	/// Generated column plus source index, original line and original column.
	WithSource {
		source_index: i64,
		source_line: u32,
		source_column: u32,
	},
	/// All five fields.
	WithName {
		source_index: i64,
		source_line: u32,
		source_column: u32,
		name_index: i64,
	},
}

/// A decoded segment with the running totals applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSegment {
	pub generated_line: u32,
	pub generated_column: u32,
	pub kind: MappingKind,
}

/// Iterator over the segments of one `mappings` string.
///
/// After the first error the iterator is exhausted.
pub struct SegmentParser<'a> {
	cursor: VlqCursor<'a>,
	line: u32,
	column: i64,
	source_index: i64,
	source_line: i64,
	source_column: i64,
	name_index: i64,
	failed: bool,
}

impl<'a> SegmentParser<'a> {
	/// Start parsing `mappings` at `offset` in the generated file.
	///
	/// `offset` is nonzero only for the non-first sections of an index map;
	/// its column only applies to the first line.
	pub fn new(mappings: &'a str, offset: Position) -> Self {
		Self {
			cursor: VlqCursor::new(mappings),
			line: offset.line,
			column: i64::from(offset.column),
			source_index: 0,
			source_line: 0,
			source_column: 0,
			name_index: 0,
			failed: false,
		}
	}

	fn malformed(&self, reason: &'static str) -> DecodeError {
		DecodeError::MalformedMappings {
			offset: self.cursor.offset(),
			reason,
		}
	}

	fn accumulate(&self, total: i64, delta: i64) -> Result<i64> {
		total
			.checked_add(delta)
			.ok_or_else(|| self.malformed("running total overflow"))
	}

	fn position_field(&self, value: i64, reason: &'static str) -> Result<u32> {
		u32::try_from(value).map_err(|_| self.malformed(reason))
	}

	/// Skip separators; returns false at end of input.
	fn advance_to_item(&mut self) -> Result<bool> {
		loop {
			match self.cursor.peek() {
				None => return Ok(false),
				Some(b';') => {
					self.cursor.next_char();
					self.line = self
						.line
						.checked_add(1)
						.ok_or_else(|| self.malformed("generated line overflow"))?;
					self.column = 0;
				}
				Some(b',') => {
					self.cursor.next_char();
				}
				Some(_) => return Ok(true),
			}
		}
	}

	fn parse_segment(&mut self) -> Result<RawSegment> {
		let delta = self.cursor.next_vlq()?;
		self.column = self.accumulate(self.column, delta)?;
		let generated_column = self.position_field(self.column, "negative generated column")?;

		if self.cursor.at_item_end() {
			return Ok(RawSegment {
				generated_line: self.line,
				generated_column,
				kind: MappingKind::ColumnOnly,
			});
		}

		let delta = self.cursor.next_vlq()?;
		self.source_index = self.accumulate(self.source_index, delta)?;
		if self.cursor.at_item_end() {
			return Err(self.malformed("segment ends after the source index"));
		}
		let delta = self.cursor.next_vlq()?;
		self.source_line = self.accumulate(self.source_line, delta)?;
		if self.cursor.at_item_end() {
			return Err(self.malformed("segment ends after the original line"));
		}
		let delta = self.cursor.next_vlq()?;
		self.source_column = self.accumulate(self.source_column, delta)?;

		let source_line = self.position_field(self.source_line, "negative original line")?;
		let source_column = self.position_field(self.source_column, "negative original column")?;

		if self.cursor.at_item_end() {
			return Ok(RawSegment {
				generated_line: self.line,
				generated_column,
				kind: MappingKind::WithSource {
					source_index: self.source_index,
					source_line,
					source_column,
				},
			});
		}

		let delta = self.cursor.next_vlq()?;
		self.name_index = self.accumulate(self.name_index, delta)?;
		if !self.cursor.at_item_end() {
			return Err(self.malformed("trailing data after the name index"));
		}

		Ok(RawSegment {
			generated_line: self.line,
			generated_column,
			kind: MappingKind::WithName {
				source_index: self.source_index,
				source_line,
				source_column,
				name_index: self.name_index,
			},
		})
	}
}

impl Iterator for SegmentParser<'_> {
	type Item = Result<RawSegment>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}

		let result = match self.advance_to_item() {
			Ok(false) => return None,
			Ok(true) => self.parse_segment(),
			Err(e) => Err(e),
		};

		if result.is_err() {
			self.failed = true;
		}
		Some(result)
	}
}

/// Decode every segment of `mappings` starting at `offset`.
pub fn parse_segments(mappings: &str, offset: Position) -> Result<Vec<RawSegment>> {
	SegmentParser::new(mappings, offset).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(mappings: &str) -> Result<Vec<RawSegment>> {
		parse_segments(mappings, Position::default())
	}

	fn with_source(line: u32, column: u32, source: i64, src_line: u32, src_column: u32) -> RawSegment {
		RawSegment {
			generated_line: line,
			generated_column: column,
			kind: MappingKind::WithSource {
				source_index: source,
				source_line: src_line,
				source_column: src_column,
			},
		}
	}

	#[test]
	fn test_single_segment() {
		let segments = parse("AAAA").unwrap();
		assert_eq!(segments, vec![with_source(0, 0, 0, 0, 0)]);
	}

	#[test]
	fn test_running_totals_within_line() {
		let segments = parse("AAAA,SAAA,CAAC").unwrap();
		assert_eq!(
			segments,
			vec![
				with_source(0, 0, 0, 0, 0),
				with_source(0, 9, 0, 0, 0),
				with_source(0, 10, 0, 0, 1),
			]
		);
	}

	#[test]
	fn test_column_resets_but_source_totals_do_not() {
		// Line 1: column delta 2 from a fresh 0, original line +1 from the previous segment.
		let segments = parse("EAEE;EACA").unwrap();
		assert_eq!(
			segments,
			vec![with_source(0, 2, 0, 2, 2), with_source(1, 2, 0, 3, 2)]
		);
	}

	#[test]
	fn test_segment_kinds() {
		let segments = parse("A,CAAAC;E").unwrap();
		assert_eq!(segments[0].kind, MappingKind::ColumnOnly);
		assert_eq!(
			segments[1].kind,
			MappingKind::WithName {
				source_index: 0,
				source_line: 0,
				source_column: 0,
				name_index: 1,
			}
		);
		assert_eq!(segments[2].generated_line, 1);
		assert_eq!(segments[2].generated_column, 2);
		assert_eq!(segments[2].kind, MappingKind::ColumnOnly);
	}

	#[test]
	fn test_empty_lines_and_items() {
		let segments = parse(";;AAAA,,CAAC;").unwrap();
		assert_eq!(segments.len(), 2);
		assert_eq!(segments[0].generated_line, 2);
		assert_eq!(segments[1].generated_column, 1);
	}

	#[test]
	fn test_offset_applies_to_first_line_only() {
		let segments = parse_segments("CAAA;CAAA", Position::new(5, 10)).unwrap();
		assert_eq!(segments[0].generated_line, 5);
		assert_eq!(segments[0].generated_column, 11);
		assert_eq!(segments[1].generated_line, 6);
		assert_eq!(segments[1].generated_column, 1);
	}

	#[test]
	fn test_truncated_segments_rejected() {
		assert!(matches!(parse("AA"), Err(DecodeError::MalformedMappings { .. })));
		assert!(matches!(parse("AAA,AAAA"), Err(DecodeError::MalformedMappings { .. })));
		assert!(matches!(parse("AAAAAA"), Err(DecodeError::MalformedMappings { .. })));
	}

	#[test]
	fn test_negative_column_rejected() {
		assert!(matches!(parse("D"), Err(DecodeError::MalformedMappings { .. })));
	}

	#[test]
	fn test_bad_character_is_vlq_error() {
		assert!(matches!(parse("AA!A"), Err(DecodeError::MalformedVlq { offset: 2, .. })));
	}

	#[test]
	fn test_running_total_overflow_rejected() {
		let mut mappings = String::from("K,");
		crate::vlq::encode_vlq(i64::MAX, &mut mappings);
		assert!(matches!(parse(&mappings), Err(DecodeError::MalformedMappings { .. })));

		let mut mappings = String::from("AACA,AA");
		crate::vlq::encode_vlq(i64::MAX, &mut mappings);
		mappings.push('A');
		assert!(matches!(parse(&mappings), Err(DecodeError::MalformedMappings { .. })));
	}

	#[test]
	fn test_iterator_stops_after_error() {
		let mut parser = SegmentParser::new("D;AAAA", Position::default());
		assert!(parser.next().unwrap().is_err());
		assert!(parser.next().is_none());
	}
}
