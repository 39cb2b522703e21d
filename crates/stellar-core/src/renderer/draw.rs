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

//! Draw-level vocabulary shared between the frame graph and the scene.

use crate::math::Mat4;
use crate::renderer::shader::FeatureMask;
use serde::{Deserialize, Serialize};

/// The kind of geometry a batch draws.
///
/// The scene uses this to decide which of its objects belong to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchType {
    /// Depth-only geometry, typically used for a depth pre-pass.
    Depth,
    /// Opaque geometry.
    Solid,
    /// Alpha-blended geometry.
    Alpha,
    /// Shadow casters.
    Shadow,
    /// Screen-space user interface geometry.
    Ui,
}

/// How the scene should light the items of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LightingMode {
    /// The items are drawn unlit.
    #[default]
    None,
    /// All lights affecting an item are evaluated in a single draw.
    SinglePass,
    /// Each light affecting an item is drawn in its own additive pass.
    MultiPass,
}

/// The order in which the scene returns the items of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortingMode {
    /// No particular order.
    #[default]
    None,
    /// Grouped by mesh and features to minimize state changes.
    ByState,
    /// Ordered by view depth, nearest first.
    ByDepth,
}

/// An opaque handle to a mesh owned by the scene or the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

/// The selection criteria a batch passes to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchFilter {
    /// The kind of geometry requested.
    pub batch_type: BatchType,
    /// Features every returned item must be drawable with.
    pub features: FeatureMask,
    /// The lighting mode of the batch.
    pub lighting: LightingMode,
}

/// A single drawable returned by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// The mesh to draw.
    pub mesh: MeshId,
    /// The object-to-world matrix of the item.
    pub model: Mat4,
    /// Features contributed by the item itself, such as skinning.
    pub features: FeatureMask,
}

impl DrawItem {
    /// Creates a draw item without item-specific features.
    pub fn new(mesh: MeshId, model: Mat4) -> Self {
        Self {
            mesh,
            model,
            features: FeatureMask::EMPTY,
        }
    }

    /// Returns the same item with the given item-specific features.
    pub fn with_features(mut self, features: FeatureMask) -> Self {
        self.features = features;
        self
    }
}
