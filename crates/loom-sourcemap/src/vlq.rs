// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Base64 VLQ (Variable-Length Quantity) codec.
//!
//! Every numeric field of a source map `mappings` string and of the Scopes
//! extension is stored as a Base64 VLQ. Each Base64 digit carries 5 data bits
//! and a continuation bit, least significant group first. The sign lives in
//! the lowest bit of the assembled value (1 = negative), it is not two's
//! complement.

use crate::error::{DecodeError, Result};

/// Base64 character set used in VLQ encoding.
const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const CONTINUATION_BIT: u8 = 0b10_0000;
const DATA_MASK: u8 = 0b01_1111;

/// Decode a Base64 character to its 6-bit value.
fn decode_char(ch: u8) -> Option<u8> {
	match ch {
		b'A'..=b'Z' => Some(ch - b'A'),
		b'a'..=b'z' => Some(ch - b'a' + 26),
		b'0'..=b'9' => Some(ch - b'0' + 52),
		b'+' => Some(62),
		b'/' => Some(63),
		_ => None,
	}
}

/// Decode one VLQ value starting at `start`; error offsets are absolute.
fn decode_at(input: &[u8], start: usize) -> Result<(i64, usize)> {
	let mut result = 0u64;
	let mut shift = 0u32;
	let mut pos = start;

	loop {
		let Some(&ch) = input.get(pos) else {
			return Err(DecodeError::MalformedVlq {
				offset: pos,
				reason: if pos == start {
					"expected a VLQ value"
				} else {
					"unexpected end of input inside a VLQ value"
				},
			});
		};
		let digit = decode_char(ch).ok_or(DecodeError::MalformedVlq {
			offset: pos,
			reason: "character outside the Base64 alphabet",
		})?;
		pos += 1;

		let data = u64::from(digit & DATA_MASK);
		if shift >= 64 || (shift > 59 && data >> (64 - shift) != 0) {
			return Err(DecodeError::MalformedVlq {
				offset: pos - 1,
				reason: "value does not fit in 64 bits",
			});
		}
		result |= data << shift;
		shift += 5;

		if digit & CONTINUATION_BIT == 0 {
			break;
		}
	}

	let magnitude = (result >> 1) as i64;
	let value = if result & 1 != 0 { -magnitude } else { magnitude };
	Ok((value, pos - start))
}

/// Decode a single VLQ value from the front of `input`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_vlq(input: &[u8]) -> Result<(i64, usize)> {
	decode_at(input, 0)
}

/// Append the VLQ encoding of `value` to `out`.
///
/// `i64::MIN` has no sign-in-low-bit representation and encodes as `0`.
pub fn encode_vlq(value: i64, out: &mut String) {
	let mut vlq = match value {
		i64::MIN => 0,
		v if v < 0 => (v.unsigned_abs() << 1) | 1,
		v => (v as u64) << 1,
	};

	loop {
		let mut digit = (vlq & u64::from(DATA_MASK)) as u8;
		vlq >>= 5;
		if vlq > 0 {
			digit |= CONTINUATION_BIT;
		}
		out.push(BASE64_CHARS[digit as usize] as char);
		if vlq == 0 {
			break;
		}
	}
}

/// Cursor over an encoded mappings or scopes string.
///
/// Separators (`,` and `;`) are left to the caller; `next_vlq` only ever
/// consumes Base64 digits.
#[derive(Debug, Clone)]
pub struct VlqCursor<'a> {
	input: &'a [u8],
	pos: usize,
}

impl<'a> VlqCursor<'a> {
	pub fn new(input: &'a str) -> Self {
		Self {
			input: input.as_bytes(),
			pos: 0,
		}
	}

	/// Byte offset of the next unread character.
	pub fn offset(&self) -> usize {
		self.pos
	}

	pub fn has_next(&self) -> bool {
		self.pos < self.input.len()
	}

	pub fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	/// Consume and return the next raw character.
	pub fn next_char(&mut self) -> Option<u8> {
		let ch = self.peek()?;
		self.pos += 1;
		Some(ch)
	}

	/// True at end of input or when the next character is `,` or `;`.
	pub fn at_item_end(&self) -> bool {
		matches!(self.peek(), None | Some(b',') | Some(b';'))
	}

	pub fn next_vlq(&mut self) -> Result<i64> {
		let (value, consumed) = decode_at(self.input, self.pos)?;
		self.pos += consumed;
		Ok(value)
	}
}
