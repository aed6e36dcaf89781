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

//! The binary asset file layout.
//!
//! ```text
//! +----------------------------------------------+
//! | header (bincode, standard config)            |
//! |   version: u32                               |
//! |   type_id: [u8; 4]                           |
//! |   dependencies: [asset path strings]         |
//! |   compression: None | Lz4                    |
//! |   uncompressed_body_size: u32                |
//! +----------------------------------------------+
//! | body_size: u64 (little-endian)               |
//! +----------------------------------------------+
//! | body: body_size bytes                        |
//! +----------------------------------------------+
//! ```
//!
//! Only the header is meaningful to the pipeline. The body is handed, already
//! decompressed, to the loader registered for `type_id`.

use crate::error::AssetIoError;
use khora_core::asset::{AssetId, AssetTypeId};
use serde::{Deserialize, Serialize};

/// The asset file revision understood by this build.
pub const ASSET_FILE_VERSION: u32 = 1;

const BODY_SIZE_BYTES: usize = std::mem::size_of::<u64>();

/// The largest expansion an LZ4 block can encode.
const MAX_LZ4_RATIO: u64 = 255;

/// How the body of an asset file is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompressionMode {
    /// The body is stored as-is.
    #[default]
    None,
    /// The body is a raw LZ4 block.
    Lz4,
}

/// The header at the start of every asset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFileHeader {
    /// The file format revision.
    pub version: u32,
    /// The type of the asset stored in the file.
    pub type_id: AssetTypeId,
    /// The assets that must be loaded before this one can be installed.
    pub dependencies: Vec<AssetId>,
    /// How the body is stored.
    pub compression: CompressionMode,
    /// The size of the body once decompressed.
    pub uncompressed_body_size: u32,
}

/// A decoded asset file: its header and its uncompressed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    header: AssetFileHeader,
    body: Vec<u8>,
}

impl AssetFile {
    /// The file's header.
    pub fn header(&self) -> &AssetFileHeader {
        &self.header
    }

    /// The uncompressed body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Splits the file into its header and body.
    pub fn into_parts(self) -> (AssetFileHeader, Vec<u8>) {
        (self.header, self.body)
    }

    /// Serializes an asset file.
    ///
    /// # Errors
    /// Returns an error if the body exceeds 4 GiB or the header cannot be encoded.
    pub fn encode(
        type_id: AssetTypeId,
        dependencies: Vec<AssetId>,
        body: &[u8],
        compression: CompressionMode,
    ) -> Result<Vec<u8>, AssetIoError> {
        let uncompressed_body_size =
            u32::try_from(body.len()).map_err(|_| AssetIoError::BodyTooLarge(body.len()))?;

        let header = AssetFileHeader {
            version: ASSET_FILE_VERSION,
            type_id,
            dependencies,
            compression,
            uncompressed_body_size,
        };

        let stored_body = match compression {
            CompressionMode::None => body.to_vec(),
            CompressionMode::Lz4 => lz4_flex::block::compress(body),
        };

        let mut bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())?;
        bytes.reserve(BODY_SIZE_BYTES + stored_body.len());
        bytes.extend_from_slice(&(stored_body.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&stored_body);
        Ok(bytes)
    }

    /// Parses an asset file and decompresses its body.
    ///
    /// # Errors
    /// Returns an error if the header is malformed or of another version, if the
    /// file is truncated, or if the body does not decode to the declared size.
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetIoError> {
        let (header, consumed): (AssetFileHeader, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;

        if header.version != ASSET_FILE_VERSION {
            return Err(AssetIoError::UnsupportedVersion {
                found: header.version,
                expected: ASSET_FILE_VERSION,
            });
        }

        let rest = &bytes[consumed..];
        if rest.len() < BODY_SIZE_BYTES {
            return Err(AssetIoError::Truncated {
                expected: BODY_SIZE_BYTES as u64,
                actual: rest.len() as u64,
            });
        }
        let (size_bytes, rest) = rest.split_at(BODY_SIZE_BYTES);
        let mut size = [0u8; BODY_SIZE_BYTES];
        size.copy_from_slice(size_bytes);
        let body_size = u64::from_le_bytes(size);

        if (rest.len() as u64) < body_size {
            return Err(AssetIoError::Truncated {
                expected: body_size,
                actual: rest.len() as u64,
            });
        }
        let stored_body = &rest[..body_size as usize];

        let body = match header.compression {
            CompressionMode::None => stored_body.to_vec(),
            CompressionMode::Lz4 => {
                let declared = u64::from(header.uncompressed_body_size);
                if declared > body_size.saturating_mul(MAX_LZ4_RATIO) {
                    return Err(AssetIoError::ImplausibleBodySize {
                        declared,
                        stored: body_size,
                    });
                }
                lz4_flex::block::decompress(stored_body, header.uncompressed_body_size as usize)?
            }
        };

        if body.len() as u64 != u64::from(header.uncompressed_body_size) {
            return Err(AssetIoError::BodySizeMismatch {
                expected: u64::from(header.uncompressed_body_size),
                actual: body.len() as u64,
            });
        }

        Ok(Self { header, body })
    }
}
