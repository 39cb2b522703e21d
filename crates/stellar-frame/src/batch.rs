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

use crate::context::FrameContext;
use stellar_core::renderer::shader::{FeatureMask, ShaderInstance, ShaderVariableInstance};
use stellar_core::renderer::{
    BatchFilter, BatchType, DrawItem, LightingMode, RenderError, SortingMode,
};

/// A group of scene items drawn with one shader inside a pass.
///
/// Rendering binds the batch's shader variables, asks the scene for the
/// matching items and draws them in the requested order. For every item the
/// shader variation for the batch features combined with the item features
/// is selected, and the per-object transforms are written before the draw.
#[derive(Debug)]
pub struct FrameBatch {
    batch_type: BatchType,
    shader: Option<ShaderInstance>,
    features: FeatureMask,
    lighting: LightingMode,
    sorting: SortingMode,
    variables: Vec<ShaderVariableInstance>,
    items: Vec<DrawItem>,
}

impl FrameBatch {
    /// Creates a batch drawing `batch_type` items with `shader`.
    pub fn new(batch_type: BatchType, shader: ShaderInstance) -> Self {
        Self {
            batch_type,
            shader: Some(shader),
            features: FeatureMask::EMPTY,
            lighting: LightingMode::None,
            sorting: SortingMode::None,
            variables: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Sets the features every item of the batch is drawn with.
    pub fn with_features(mut self, features: FeatureMask) -> Self {
        self.features = features;
        self
    }

    /// Sets the lighting mode requested from the scene.
    pub fn with_lighting(mut self, lighting: LightingMode) -> Self {
        self.lighting = lighting;
        self
    }

    /// Sets the order in which items are drawn.
    pub fn with_sorting(mut self, sorting: SortingMode) -> Self {
        self.sorting = sorting;
        self
    }

    /// Adds a variable instance applied each time the batch renders.
    pub fn add_variable(&mut self, variable: ShaderVariableInstance) {
        self.variables.push(variable);
    }

    /// The kind of geometry the batch draws.
    pub fn batch_type(&self) -> BatchType {
        self.batch_type
    }

    /// The batch features.
    pub fn features(&self) -> FeatureMask {
        self.features
    }

    /// The lighting mode.
    pub fn lighting(&self) -> LightingMode {
        self.lighting
    }

    /// The sorting mode.
    pub fn sorting(&self) -> SortingMode {
        self.sorting
    }

    /// The shader instance, until the batch is discarded.
    pub fn shader(&self) -> Option<&ShaderInstance> {
        self.shader.as_ref()
    }

    /// The variable instances, in application order.
    pub fn variables(&self) -> &[ShaderVariableInstance] {
        &self.variables
    }

    /// Draws the batch.
    ///
    /// `end_batch` is issued even if a draw fails; the first error is returned.
    ///
    /// # Panics
    ///
    /// Panics if the batch has been discarded.
    pub fn render(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), RenderError> {
        let shader = self
            .shader
            .as_mut()
            .unwrap_or_else(|| panic!("FrameBatch: {:?} batch rendered after discard", self.batch_type));

        ctx.device.begin_batch(self.batch_type)?;
        ctx.transforms.apply_view_transforms(shader);
        for variable in &self.variables {
            variable.apply();
        }

        let filter = BatchFilter {
            batch_type: self.batch_type,
            features: self.features,
            lighting: self.lighting,
        };
        self.items.clear();
        ctx.scene.gather(&filter, self.sorting, &mut self.items);
        log::trace!(
            "FrameBatch: drawing {} {:?} item(s) with '{}'",
            self.items.len(),
            self.batch_type,
            shader.name()
        );

        let mut drawn = Ok(());
        for item in &self.items {
            shader.select_active_variation(self.features | item.features);
            ctx.transforms.set_model(item.model);
            ctx.transforms.apply_model_transforms(shader);
            drawn = ctx.device.draw(item, shader);
            if drawn.is_err() {
                break;
            }
        }
        let end = ctx.device.end_batch();
        drawn.and(end)
    }

    /// Releases the shader instance and variable instances.
    pub fn discard(&mut self) {
        self.shader = None;
        self.variables.clear();
        self.items.clear();
    }
}
