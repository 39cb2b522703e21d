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

//! A small animated scene flattened with a matrix stack every frame.

use stellar_core::math::{Mat4, Vec3};
use stellar_core::renderer::shader::FeatureMask;
use stellar_core::renderer::{BatchFilter, BatchType, DrawItem, MeshId, SceneSource, SortingMode};
use stellar_core::transform::MatrixStackError;
use stellar_core::MatrixStack;

struct Drawable {
    mesh: MeshId,
    batches: &'static [BatchType],
    features: FeatureMask,
}

struct Node {
    local: Mat4,
    /// Radians per second around the local Y axis.
    spin: f32,
    drawable: Option<Drawable>,
    children: Vec<Node>,
}

impl Node {
    fn new(local: Mat4) -> Self {
        Self {
            local,
            spin: 0.0,
            drawable: None,
            children: Vec::new(),
        }
    }

    fn spinning(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    fn drawing(mut self, mesh: usize, batches: &'static [BatchType], features: FeatureMask) -> Self {
        self.drawable = Some(Drawable {
            mesh: MeshId(mesh),
            batches,
            features,
        });
        self
    }

    fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

const OPAQUE: &[BatchType] = &[BatchType::Depth, BatchType::Solid];
const TRANSLUCENT: &[BatchType] = &[BatchType::Alpha];

pub struct DemoScene {
    roots: Vec<Node>,
    stack: MatrixStack,
    items: Vec<(BatchType, DrawItem)>,
    eye: Vec3,
}

impl DemoScene {
    pub fn new(skinned: FeatureMask) -> Self {
        let floor = Node::new(Mat4::from_scale(Vec3::new(10.0, 0.1, 10.0))).drawing(
            0,
            OPAQUE,
            FeatureMask::EMPTY,
        );
        let moon = Node::new(Mat4::from_translation(Vec3::new(2.0, 1.0, 0.0)))
            .spinning(2.0)
            .drawing(3, OPAQUE, FeatureMask::EMPTY);
        let statue = Node::new(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
            .drawing(1, OPAQUE, skinned)
            .with_child(moon);
        let glass = Node::new(Mat4::from_translation(Vec3::new(-3.0, 1.0, 1.0))).drawing(
            2,
            TRANSLUCENT,
            FeatureMask::EMPTY,
        );
        let turntable = Node::new(Mat4::IDENTITY)
            .spinning(0.5)
            .with_child(statue)
            .with_child(glass);

        Self {
            roots: vec![floor, turntable],
            stack: MatrixStack::new(),
            items: Vec::new(),
            eye: Vec3::ZERO,
        }
    }

    /// Recomputes the world transform of every drawable at `time` seconds.
    pub fn update(&mut self, time: f32, eye: Vec3) -> Result<(), MatrixStackError> {
        self.eye = eye;
        self.items.clear();
        self.stack.reset();
        flatten(&self.roots, time, &mut self.stack, &mut self.items)?;
        debug_assert!(self.stack.is_at_base());
        Ok(())
    }
}

fn flatten(
    nodes: &[Node],
    time: f32,
    stack: &mut MatrixStack,
    out: &mut Vec<(BatchType, DrawItem)>,
) -> Result<(), MatrixStackError> {
    for node in nodes {
        stack.push(node.local * Mat4::from_rotation_y(node.spin * time));
        if let Some(drawable) = &node.drawable {
            let item = DrawItem::new(drawable.mesh, stack.top()).with_features(drawable.features);
            out.extend(drawable.batches.iter().map(|&batch| (batch, item)));
        }
        flatten(&node.children, time, stack, out)?;
        stack.pop()?;
    }
    Ok(())
}

impl SceneSource for DemoScene {
    fn gather(&self, filter: &BatchFilter, sorting: SortingMode, out: &mut Vec<DrawItem>) {
        let start = out.len();
        out.extend(
            self.items
                .iter()
                .filter(|(batch, _)| *batch == filter.batch_type)
                .map(|(_, item)| *item),
        );
        let selected = &mut out[start..];
        match sorting {
            SortingMode::None => {}
            SortingMode::ByState => selected.sort_by_key(|item| (item.mesh, item.features)),
            SortingMode::ByDepth => {
                let eye = self.eye;
                selected.sort_by(|a, b| {
                    let da = (a.model.translation() - eye).length_squared();
                    let db = (b.model.translation() - eye).length_squared();
                    da.total_cmp(&db)
                });
            }
        }
    }
}
