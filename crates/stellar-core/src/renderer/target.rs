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

//! Render targets and their device-side lifecycle.

use crate::math::LinearRgba;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::RenderDevice;
use crate::stellar_bitflags;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// A render target shared between a frame shader and the passes drawing into it.
pub type SharedRenderTarget = Rc<RefCell<RenderTarget>>;

/// An opaque handle to a render target resource owned by a [`RenderDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub usize);

/// The color format of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8-bit normalized RGBA.
    #[default]
    Rgba8Unorm,
    /// 8-bit normalized RGBA in sRGB space.
    Rgba8UnormSrgb,
    /// 16-bit float RGBA, for HDR rendering.
    Rgba16Float,
    /// A single 32-bit float channel.
    R32Float,
}

stellar_bitflags! {
    /// Which aspects of a render target are cleared when a pass begins.
    pub struct ClearFlags: u8 {
        /// Clear the color attachment.
        const COLOR = 1 << 0;
        /// Clear the depth attachment.
        const DEPTH = 1 << 1;
        /// Clear the stencil attachment.
        const STENCIL = 1 << 2;
        /// Clear every attachment.
        const ALL = (1 << 0) | (1 << 1) | (1 << 2);
    }
}

/// Describes a render target to create on a device.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetDescriptor {
    /// Debug label, also used as the target's name.
    pub label: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// The color format.
    pub format: TextureFormat,
    /// Whether a depth/stencil attachment is created alongside the color one.
    pub depth_stencil: bool,
}

/// A named render target together with the clear state used when a pass begins.
#[derive(Debug)]
pub struct RenderTarget {
    name: String,
    id: Option<RenderTargetId>,
    width: u32,
    height: u32,
    format: TextureFormat,
    depth_stencil: bool,
    clear_flags: ClearFlags,
    clear_color: LinearRgba,
    clear_depth: f32,
    clear_stencil: u32,
}

impl RenderTarget {
    /// Creates the device resource described by `descriptor`.
    pub fn setup(
        device: &mut dyn RenderDevice,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<Self, ResourceError> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(ResourceError::InvalidExtent {
                label: descriptor.label.clone(),
            });
        }
        let id = device.create_render_target(descriptor)?;
        Ok(Self {
            name: descriptor.label.clone(),
            id: Some(id),
            width: descriptor.width,
            height: descriptor.height,
            format: descriptor.format,
            depth_stencil: descriptor.depth_stencil,
            clear_flags: ClearFlags::EMPTY,
            clear_color: LinearRgba::BLACK,
            clear_depth: 1.0,
            clear_stencil: 0,
        })
    }

    /// Wraps the result of [`RenderTarget::setup`] in a [`SharedRenderTarget`].
    pub fn setup_shared(
        device: &mut dyn RenderDevice,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<SharedRenderTarget, ResourceError> {
        Self::setup(device, descriptor).map(|target| Rc::new(RefCell::new(target)))
    }

    /// Releases the device resource. The target is invalid afterwards.
    pub fn discard(&mut self, device: &mut dyn RenderDevice) -> Result<(), ResourceError> {
        match self.id.take() {
            Some(id) => device.destroy_render_target(id),
            None => Ok(()),
        }
    }

    /// Returns `true` while the device resource exists.
    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    /// The device handle, if the target has not been discarded.
    pub fn id(&self) -> Option<RenderTargetId> {
        self.id
    }

    /// The name of the target.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width and height in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The color format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Whether the target has a depth/stencil attachment.
    pub fn has_depth_stencil(&self) -> bool {
        self.depth_stencil
    }

    /// Selects which aspects are cleared when a pass begins.
    pub fn set_clear_flags(&mut self, flags: ClearFlags) {
        self.clear_flags = flags;
    }

    /// The aspects cleared when a pass begins.
    pub fn clear_flags(&self) -> ClearFlags {
        self.clear_flags
    }

    /// Sets the color written by a color clear.
    pub fn set_clear_color(&mut self, color: LinearRgba) {
        self.clear_color = color;
    }

    /// The color written by a color clear.
    pub fn clear_color(&self) -> LinearRgba {
        self.clear_color
    }

    /// Sets the depth written by a depth clear.
    pub fn set_clear_depth(&mut self, depth: f32) {
        self.clear_depth = depth;
    }

    /// The depth written by a depth clear.
    pub fn clear_depth(&self) -> f32 {
        self.clear_depth
    }

    /// Sets the stencil value written by a stencil clear.
    pub fn set_clear_stencil(&mut self, stencil: u32) {
        self.clear_stencil = stencil;
    }

    /// The stencil value written by a stencil clear.
    pub fn clear_stencil(&self) -> u32 {
        self.clear_stencil
    }
}
