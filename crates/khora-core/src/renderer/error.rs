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

//! Errors reported by GPU upload contexts.

use std::fmt;

/// An error raised while staging or submitting an upload to the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The staging area could not hold the requested data.
    StagingExhausted {
        /// The label of the upload.
        label: String,
        /// The number of bytes requested.
        requested: usize,
    },
    /// The image description does not match the size of the provided data.
    InvalidImageSize {
        /// The label of the upload.
        label: String,
        /// The number of bytes implied by the image description.
        expected: usize,
        /// The number of bytes provided.
        actual: usize,
    },
    /// The backend rejected the submission.
    SubmissionFailed(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::StagingExhausted { label, requested } => {
                write!(
                    f,
                    "Staging memory exhausted while uploading '{label}' ({requested} bytes)"
                )
            }
            UploadError::InvalidImageSize {
                label,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Image upload '{label}' expected {expected} bytes but got {actual}"
                )
            }
            UploadError::SubmissionFailed(details) => {
                write!(f, "GPU submission failed: {details}")
            }
        }
    }
}

impl std::error::Error for UploadError {}
