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

use stellar_core::renderer::shader::ShaderValueType;
use stellar_core::renderer::{ResourceError, ShaderError};
use thiserror::Error;

/// Errors raised while turning a [`FrameShaderDescription`](crate::FrameShaderDescription)
/// into a live [`FrameShader`](crate::FrameShader).
#[derive(Error, Debug)]
pub enum FrameSetupError {
    /// The RON text could not be parsed.
    #[error("Invalid frame shader description: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The description could not be written as RON.
    #[error("Failed to serialize frame shader description: {0}")]
    Serialize(#[from] ron::Error),

    /// Two render targets share a name.
    #[error("Render target '{0}' is declared twice")]
    DuplicateRenderTarget(String),

    /// More than one render target is marked as the main target.
    #[error("Render targets '{first}' and '{second}' are both marked as main")]
    MultipleMainTargets {
        /// The target marked first.
        first: String,
        /// The target marked second.
        second: String,
    },

    /// A pass or post effect names a render target that is not declared.
    #[error("Unknown render target '{target}' referenced by '{user}'")]
    UnknownRenderTarget {
        /// The missing target name.
        target: String,
        /// The pass or post effect referencing it.
        user: String,
    },

    /// A variable is neither declared by the owner's shader nor shared.
    #[error("No variable named '{variable}' is visible from '{user}'")]
    UnknownVariable {
        /// The missing variable name.
        variable: String,
        /// The frame, pass, batch or post effect referencing it.
        user: String,
    },

    /// A value does not have the type or size its variable is declared with.
    #[error(
        "Value for '{variable}' does not match its declaration: expected {expected_count} {expected}, got {found_count} {found}"
    )]
    ValueMismatch {
        /// The variable name.
        variable: String,
        /// The declared element type.
        expected: ShaderValueType,
        /// The declared element count.
        expected_count: usize,
        /// The element type of the provided value.
        found: ShaderValueType,
        /// The element count of the provided value.
        found_count: usize,
    },

    /// A shader could not be resolved or a feature string was invalid.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// A render target could not be created.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
