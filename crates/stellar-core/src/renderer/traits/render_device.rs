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

use crate::renderer::draw::{BatchType, DrawItem};
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::shader::ShaderInstance;
use crate::renderer::target::{RenderTarget, RenderTargetDescriptor, RenderTargetId};
use std::fmt::Debug;

/// The device that owns render target resources and executes the frame graph.
///
/// Calls arrive strictly nested: `begin_pass`, then any number of
/// `begin_batch` / `draw` / `end_batch` sequences or a single
/// `draw_fullscreen_quad`, then `end_pass`.
pub trait RenderDevice: Debug {
    /// Creates a render target resource.
    /// ## Arguments
    /// * `descriptor` - The size, format and attachments of the target.
    /// ## Returns
    /// The handle of the new resource.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot create the resource.
    fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<RenderTargetId, ResourceError>;

    /// Destroys the render target resource associated with the given handle.
    /// ## Errors
    /// * `ResourceError` - If the handle is unknown to the device.
    fn destroy_render_target(&mut self, id: RenderTargetId) -> Result<(), ResourceError>;

    /// Begins a pass drawing into `target`.
    ///
    /// The target's clear flags and values are applied here. `shader` is the
    /// pass-level shader instance, if the pass has one.
    fn begin_pass(
        &mut self,
        target: &RenderTarget,
        shader: Option<&ShaderInstance>,
    ) -> Result<(), RenderError>;

    /// Begins a batch of the given type inside the current pass.
    fn begin_batch(&mut self, batch_type: BatchType) -> Result<(), RenderError>;

    /// Draws one item with the shader instance and its active variation.
    fn draw(&mut self, item: &DrawItem, shader: &ShaderInstance) -> Result<(), RenderError>;

    /// Draws a quad covering the whole target with the given shader instance.
    fn draw_fullscreen_quad(&mut self, shader: &ShaderInstance) -> Result<(), RenderError>;

    /// Ends the current batch.
    fn end_batch(&mut self) -> Result<(), RenderError>;

    /// Ends the current pass.
    fn end_pass(&mut self) -> Result<(), RenderError>;
}
