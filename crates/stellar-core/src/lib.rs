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

//! # Stellar Core
//!
//! Foundational crate for the Stellar frame renderer: the math types used by
//! the transform pipeline, the lazily evaluated [`TransformSet`] and the
//! [`MatrixStack`], and the backend-agnostic rendering contracts (shaders,
//! shader variables, render targets, and the [`RenderDevice`] trait) that the
//! frame graph in `stellar-frame` is written against.

#![warn(missing_docs)]

pub mod math;
pub mod renderer;
pub mod transform;
pub mod utils;

pub use renderer::traits::{RenderDevice, SceneSource};
pub use transform::{MatrixStack, TransformKind, TransformSet};
