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

use stellar_core::renderer::{RenderDevice, SceneSource};
use stellar_core::TransformSet;

/// Everything a frame shader needs while it renders.
pub struct FrameContext<'a> {
    /// The device executing passes and draws.
    pub device: &'a mut dyn RenderDevice,
    /// The scene supplying batch contents.
    pub scene: &'a dyn SceneSource,
    /// The camera and per-object transforms.
    pub transforms: &'a mut TransformSet,
}

impl<'a> FrameContext<'a> {
    /// Bundles the device, scene and transforms of one frame.
    pub fn new(
        device: &'a mut dyn RenderDevice,
        scene: &'a dyn SceneSource,
        transforms: &'a mut TransformSet,
    ) -> Self {
        Self {
            device,
            scene,
            transforms,
        }
    }
}
