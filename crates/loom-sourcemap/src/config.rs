// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decode options.

use serde::{Deserialize, Serialize};

/// Options controlling how a source map payload is decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
	/// Reject payloads that declare a `version` other than 3.
	pub require_version_3: bool,
	/// Strip a leading `)]}'` guard line before parsing the JSON body.
	pub strip_xssi_prefix: bool,
	/// Decode `originalScopes`/`generatedRanges` when both are present.
	pub decode_scopes: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			require_version_3: true,
			strip_xssi_prefix: true,
			decode_scopes: true,
		}
	}
}
