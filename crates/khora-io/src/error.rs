// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors raised by the asset I/O layer.

use khora_core::asset::AssetId;
use thiserror::Error;

/// An error raised while locating, reading or decoding an asset file.
#[derive(Debug, Error)]
pub enum AssetIoError {
    /// No file exists for the asset.
    #[error("asset '{0}' was not found")]
    NotFound(AssetId),

    /// The file exists but could not be read.
    #[error("failed to read asset '{id}': {source}")]
    Io {
        /// The asset being read.
        id: AssetId,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file ends before the data its header announces.
    #[error("asset file is truncated: expected {expected} more bytes, found {actual}")]
    Truncated {
        /// The number of bytes required.
        expected: u64,
        /// The number of bytes available.
        actual: u64,
    },

    /// The header is not valid bincode.
    #[error("failed to decode asset file header: {0}")]
    HeaderDecode(#[from] bincode::error::DecodeError),

    /// The header could not be serialized.
    #[error("failed to encode asset file header: {0}")]
    HeaderEncode(#[from] bincode::error::EncodeError),

    /// The file was produced for another format revision.
    #[error("unsupported asset file version {found} (expected {expected})")]
    UnsupportedVersion {
        /// The version found in the header.
        found: u32,
        /// The version this build understands.
        expected: u32,
    },

    /// The LZ4 body is corrupt.
    #[error("failed to decompress asset body: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    /// The header declares more data than the compressed body can expand to.
    #[error("asset body of {stored} compressed bytes cannot expand to the declared {declared}")]
    ImplausibleBodySize {
        /// The size declared in the header.
        declared: u64,
        /// The size of the compressed body.
        stored: u64,
    },

    /// The decoded body does not have the size declared in the header.
    #[error("asset body is {actual} bytes, header declares {expected}")]
    BodySizeMismatch {
        /// The size declared in the header.
        expected: u64,
        /// The size actually decoded.
        actual: u64,
    },

    /// The body is too large for the header's 32-bit size field.
    #[error("asset body of {0} bytes exceeds the 32-bit size limit")]
    BodyTooLarge(usize),
}
