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

//! A render device that validates and logs the calls it receives instead of
//! talking to a GPU.

use std::collections::HashMap;
use stellar_core::renderer::shader::ShaderInstance;
use stellar_core::renderer::{
    BatchType, DrawItem, RenderDevice, RenderError, RenderTarget, RenderTargetDescriptor,
    RenderTargetId, ResourceError,
};

/// Counters for one frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameStats {
    pub passes: usize,
    pub batches: usize,
    pub draws: usize,
    pub fullscreen_quads: usize,
    pub constant_bytes: usize,
}

#[derive(Debug, Default)]
pub struct HeadlessDevice {
    targets: HashMap<RenderTargetId, RenderTargetDescriptor>,
    next_id: usize,
    in_pass: bool,
    in_batch: bool,
    stats: FrameStats,
    scratch: Vec<u8>,
}

impl HeadlessDevice {
    /// Returns the counters gathered since the last call and resets them.
    pub fn take_stats(&mut self) -> FrameStats {
        std::mem::take(&mut self.stats)
    }

    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    fn upload_constants(&mut self, shader: &ShaderInstance) {
        self.scratch.clear();
        shader.pack_constants(&mut self.scratch);
        self.stats.constant_bytes += self.scratch.len();
    }

    fn require_pass(&self, call: &str) -> Result<(), RenderError> {
        if self.in_pass {
            Ok(())
        } else {
            Err(RenderError::RenderingFailed(format!(
                "{call} issued outside of a pass"
            )))
        }
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<RenderTargetId, ResourceError> {
        let id = RenderTargetId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "HeadlessDevice: created render target '{}' ({}x{} {:?}) as {:?}",
            descriptor.label,
            descriptor.width,
            descriptor.height,
            descriptor.format,
            id
        );
        self.targets.insert(id, descriptor.clone());
        Ok(id)
    }

    fn destroy_render_target(&mut self, id: RenderTargetId) -> Result<(), ResourceError> {
        let descriptor = self
            .targets
            .remove(&id)
            .ok_or(ResourceError::InvalidHandle(id))?;
        log::debug!(
            "HeadlessDevice: destroyed render target '{}'",
            descriptor.label
        );
        Ok(())
    }

    fn begin_pass(
        &mut self,
        target: &RenderTarget,
        shader: Option<&ShaderInstance>,
    ) -> Result<(), RenderError> {
        if self.in_pass {
            return Err(RenderError::RenderingFailed(
                "begin_pass issued inside a pass".to_string(),
            ));
        }
        match target.id() {
            Some(id) if self.targets.contains_key(&id) => {}
            _ => return Err(RenderError::InvalidRenderTarget(target.name().to_string())),
        }
        log::trace!(
            "HeadlessDevice: begin pass on '{}' clearing {:?}",
            target.name(),
            target.clear_flags()
        );
        if let Some(shader) = shader {
            self.upload_constants(shader);
        }
        self.in_pass = true;
        self.stats.passes += 1;
        Ok(())
    }

    fn begin_batch(&mut self, batch_type: BatchType) -> Result<(), RenderError> {
        self.require_pass("begin_batch")?;
        log::trace!("HeadlessDevice: begin {batch_type:?} batch");
        self.in_batch = true;
        self.stats.batches += 1;
        Ok(())
    }

    fn draw(&mut self, item: &DrawItem, shader: &ShaderInstance) -> Result<(), RenderError> {
        if !self.in_batch {
            return Err(RenderError::RenderingFailed(
                "draw issued outside of a batch".to_string(),
            ));
        }
        let passes = shader.active_variation().map_or(1, |v| v.num_passes());
        log::trace!(
            "HeadlessDevice: draw {:?} with '{}' in {} pass(es)",
            item.mesh,
            shader.name(),
            passes
        );
        self.upload_constants(shader);
        self.stats.draws += passes;
        Ok(())
    }

    fn draw_fullscreen_quad(&mut self, shader: &ShaderInstance) -> Result<(), RenderError> {
        self.require_pass("draw_fullscreen_quad")?;
        self.upload_constants(shader);
        self.stats.fullscreen_quads += 1;
        Ok(())
    }

    fn end_batch(&mut self) -> Result<(), RenderError> {
        self.in_batch = false;
        Ok(())
    }

    fn end_pass(&mut self) -> Result<(), RenderError> {
        self.require_pass("end_pass")?;
        self.in_pass = false;
        self.in_batch = false;
        Ok(())
    }
}
