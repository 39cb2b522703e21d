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

//! The shader model: shaders with feature-keyed variations, typed variables,
//! per-object shader instances, and the library that owns them.
//!
//! A [`Shader`] is a template. Rendering always goes through a
//! [`ShaderInstance`], which carries the live variable values and the
//! currently selected [`ShaderVariation`]. A [`ShaderVariableInstance`] is a
//! pending value that is pushed into its variable with `apply()`, so a single
//! variable can be driven by several owners, each applying its own value when
//! it renders.

mod definition;
mod feature;
mod instance;
mod library;
mod value;
mod variable;

pub use self::definition::{Shader, ShaderVariation};
pub use self::feature::FeatureMask;
pub use self::instance::ShaderInstance;
pub use self::library::ShaderLibrary;
pub use self::value::{ShaderValue, ShaderValueType};
pub use self::variable::{ShaderVariable, ShaderVariableDesc, ShaderVariableInstance};
