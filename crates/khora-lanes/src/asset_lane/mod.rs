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

//! The contract between the asset pipeline and type-specific loaders.
//!
//! A loader is a strategy object implementing [`AssetLoader`] for one asset type.
//! The pipeline drives it through four steps: `create` an empty instance, `load`
//! it from the decoded asset file, `install` it once its dependencies are
//! loaded, and `unload` it when the last reference goes away.

mod context;
mod loader;

pub use context::{InstallContext, LoadContext};
pub use loader::{AssetLoader, LoaderError};
