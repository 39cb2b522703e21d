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

//! Provides the backend-agnostic rendering contracts of the Stellar renderer.
//!
//! This module defines what the frame graph needs from the outside world:
//! the shader model (shaders, variations, variables and their instances),
//! render targets, the draw-level vocabulary shared with the scene, and the
//! [`RenderDevice`] / [`SceneSource`] capability traits. Concrete backends
//! implement the traits; the frame graph only ever sees the traits.

pub mod draw;
pub mod error;
pub mod shader;
pub mod target;
pub mod traits;

pub use self::draw::{BatchFilter, BatchType, DrawItem, LightingMode, MeshId, SortingMode};
pub use self::error::{RenderError, ResourceError, ShaderError};
pub use self::target::{
    ClearFlags, RenderTarget, RenderTargetDescriptor, RenderTargetId, SharedRenderTarget,
    TextureFormat,
};
pub use self::traits::{RenderDevice, SceneSource};
