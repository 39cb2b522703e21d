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

//! Transform caching for rendering.
//!
//! - [`TransformSet`] holds the Model, View and Projection matrices and derives
//!   the inverses and products shaders consume, lazily and at most once per
//!   change of the inputs.
//! - [`MatrixStack`] accumulates hierarchical transforms during a depth-first
//!   scene walk.

mod matrix_stack;
mod transform_set;

pub use self::matrix_stack::{MatrixStack, MatrixStackError};
pub use self::transform_set::{DirtyFlags, TransformKind, TransformSet, DEPENDENTS, PREREQUISITES};
