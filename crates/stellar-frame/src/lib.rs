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

//! # Stellar Frame
//!
//! The frame graph of the Stellar renderer. A [`FrameShader`] describes how
//! one frame is rendered: it owns named render targets, frame-wide shader
//! variables, an ordered list of [`FramePass`]es and an ordered list of
//! [`FramePostEffect`]s. Each pass draws a sequence of [`FrameBatch`]es,
//! each batch draws the scene items the [`SceneSource`] selects for it.
//!
//! Frame shaders are usually built from a RON [`FrameShaderDescription`]
//! with [`FrameShader::from_description`].
//!
//! [`SceneSource`]: stellar_core::SceneSource

#![warn(missing_docs)]

mod batch;
mod builder;
mod context;
pub mod description;
mod error;
mod frame_shader;
mod pass;
mod post_effect;

pub use self::batch::FrameBatch;
pub use self::context::FrameContext;
pub use self::description::FrameShaderDescription;
pub use self::error::FrameSetupError;
pub use self::frame_shader::FrameShader;
pub use self::pass::FramePass;
pub use self::post_effect::FramePostEffect;
