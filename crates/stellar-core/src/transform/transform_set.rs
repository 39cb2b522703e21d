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

//! Lazily derived rendering transforms.
//!
//! A [`TransformSet`] stores three base matrices (Model, View, Projection) and
//! seven matrices derived from them. Setting a base matrix only marks the
//! derived slots that depend on it as dirty; a derived slot is recomputed the
//! next time it is read, after any dirty prerequisite has been recomputed.
//!
//! The dependency graph is kept as two explicit tables: [`PREREQUISITES`]
//! (what each derived slot is computed from) and [`DEPENDENTS`] (what each
//! base slot invalidates). A test checks that the second is the transitive
//! closure of the first.
//!
//! Matrices multiply column vectors, so the products read right to left:
//! `ViewProj = Proj * View`, `ModelView = View * Model`,
//! `ModelViewProj = Proj * ModelView`, `InvModelView = InvModel * InvView`.

use crate::math::{Mat4, Vec3, Vec4};
use crate::renderer::shader::ShaderInstance;
use crate::stellar_bitflags;

/// Identifies one slot of a [`TransformSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransformKind {
    /// Object-to-world transform. Base slot.
    Model = 0,
    /// World-to-camera transform. Base slot.
    View,
    /// Camera-to-clip transform. Base slot.
    Proj,
    /// Inverse of `Model`.
    InvModel,
    /// Inverse of `View`, i.e. the camera's world transform.
    InvView,
    /// Inverse of `Proj`.
    InvProj,
    /// `Proj * View`.
    ViewProj,
    /// `View * Model`.
    ModelView,
    /// Inverse of `ModelView`, computed as `InvModel * InvView`.
    InvModelView,
    /// `Proj * View * Model`.
    ModelViewProj,
}

impl TransformKind {
    /// Number of slots in a [`TransformSet`].
    pub const COUNT: usize = 10;

    /// Every slot, in index order.
    pub const ALL: [TransformKind; Self::COUNT] = [
        TransformKind::Model,
        TransformKind::View,
        TransformKind::Proj,
        TransformKind::InvModel,
        TransformKind::InvView,
        TransformKind::InvProj,
        TransformKind::ViewProj,
        TransformKind::ModelView,
        TransformKind::InvModelView,
        TransformKind::ModelViewProj,
    ];

    /// Slots that only depend on the camera.
    pub const VIEW_DEPENDENT: [TransformKind; 5] = [
        TransformKind::View,
        TransformKind::InvView,
        TransformKind::Proj,
        TransformKind::InvProj,
        TransformKind::ViewProj,
    ];

    /// Slots that change with every object.
    pub const MODEL_DEPENDENT: [TransformKind; 5] = [
        TransformKind::Model,
        TransformKind::InvModel,
        TransformKind::ModelView,
        TransformKind::InvModelView,
        TransformKind::ModelViewProj,
    ];

    /// Returns the slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for Model, View and Proj.
    #[inline]
    pub const fn is_base(self) -> bool {
        matches!(
            self,
            TransformKind::Model | TransformKind::View | TransformKind::Proj
        )
    }

    /// The dirty bit of this slot.
    #[inline]
    pub const fn flag(self) -> DirtyFlags {
        DirtyFlags::from_bits_truncate(1 << self as u16)
    }

    /// The shader variable semantic this slot is bound to.
    pub const fn semantic(self) -> &'static str {
        match self {
            TransformKind::Model => "Model",
            TransformKind::View => "View",
            TransformKind::Proj => "Projection",
            TransformKind::InvModel => "InvModel",
            TransformKind::InvView => "InvView",
            TransformKind::InvProj => "InvProjection",
            TransformKind::ViewProj => "ViewProjection",
            TransformKind::ModelView => "ModelView",
            TransformKind::InvModelView => "InvModelView",
            TransformKind::ModelViewProj => "ModelViewProjection",
        }
    }
}

stellar_bitflags! {
    /// A set of [`TransformKind`] bits, one per slot index.
    pub struct DirtyFlags: u16 {
        const MODEL = 1 << 0;
        const VIEW = 1 << 1;
        const PROJ = 1 << 2;
        const INV_MODEL = 1 << 3;
        const INV_VIEW = 1 << 4;
        const INV_PROJ = 1 << 5;
        const VIEW_PROJ = 1 << 6;
        const MODEL_VIEW = 1 << 7;
        const INV_MODEL_VIEW = 1 << 8;
        const MODEL_VIEW_PROJ = 1 << 9;
    }
}

const fn flags_of(kinds: &[TransformKind]) -> DirtyFlags {
    let mut bits = 0;
    let mut i = 0;
    while i < kinds.len() {
        bits |= kinds[i].flag().bits();
        i += 1;
    }
    DirtyFlags::from_bits_truncate(bits)
}

/// Direct inputs of every derived slot, indexed by [`TransformKind::index`].
pub const PREREQUISITES: [&[TransformKind]; TransformKind::COUNT] = {
    use TransformKind::*;
    [
        &[],
        &[],
        &[],
        &[Model],
        &[View],
        &[Proj],
        &[View, Proj],
        &[Model, View],
        &[InvModel, InvView],
        &[ModelView, Proj],
    ]
};

/// Derived slots invalidated when a base slot is set.
pub const DEPENDENTS: [(TransformKind, DirtyFlags); 3] = {
    use TransformKind::*;
    [
        (
            Model,
            flags_of(&[InvModel, ModelView, InvModelView, ModelViewProj]),
        ),
        (
            View,
            flags_of(&[InvView, ViewProj, ModelView, InvModelView, ModelViewProj]),
        ),
        (Proj, flags_of(&[InvProj, ViewProj, ModelViewProj])),
    ]
};

const ALL_DERIVED: DirtyFlags = {
    use TransformKind::*;
    flags_of(&[
        InvModel,
        InvView,
        InvProj,
        ViewProj,
        ModelView,
        InvModelView,
        ModelViewProj,
    ])
};

/// The transforms of one rendering context, with lazily derived slots.
///
/// Reads of derived slots take `&mut self` because they may refresh the cache.
/// Inverting a singular base matrix yields the identity; no error is raised,
/// so callers must not feed degenerate transforms.
///
/// # Examples
///
/// ```
/// use stellar_core::math::{Mat4, Vec3};
/// use stellar_core::{TransformKind, TransformSet};
///
/// let mut transforms = TransformSet::new();
/// transforms.set_model(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
/// let mvp = transforms.get(TransformKind::ModelViewProj);
/// assert_eq!(mvp.translation(), Vec3::new(1.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct TransformSet {
    matrices: [Mat4; TransformKind::COUNT],
    dirty: DirtyFlags,
    recomputations: u64,
}

impl TransformSet {
    /// Creates a set with identity base matrices.
    pub fn new() -> Self {
        Self {
            matrices: [Mat4::IDENTITY; TransformKind::COUNT],
            dirty: ALL_DERIVED,
            recomputations: 0,
        }
    }

    /// Replaces a base matrix and invalidates everything derived from it.
    ///
    /// # Panics
    /// Panics if `kind` is a derived slot.
    pub fn set(&mut self, kind: TransformKind, matrix: Mat4) {
        assert!(
            kind.is_base(),
            "TransformSet: {kind:?} is derived and cannot be set directly"
        );
        self.matrices[kind.index()] = matrix;
        for (base, dependents) in DEPENDENTS {
            if base == kind {
                self.dirty |= dependents;
            }
        }
    }

    /// Replaces the Model matrix.
    pub fn set_model(&mut self, matrix: Mat4) {
        self.set(TransformKind::Model, matrix);
    }

    /// Replaces the View matrix.
    pub fn set_view(&mut self, matrix: Mat4) {
        self.set(TransformKind::View, matrix);
    }

    /// Replaces the Projection matrix.
    pub fn set_proj(&mut self, matrix: Mat4) {
        self.set(TransformKind::Proj, matrix);
    }

    /// Returns the up-to-date value of any slot.
    pub fn get(&mut self, kind: TransformKind) -> Mat4 {
        self.refresh(kind);
        self.matrices[kind.index()]
    }

    /// The current Model matrix.
    pub fn model(&self) -> Mat4 {
        self.matrices[TransformKind::Model.index()]
    }

    /// The current View matrix.
    pub fn view(&self) -> Mat4 {
        self.matrices[TransformKind::View.index()]
    }

    /// The current Projection matrix.
    pub fn proj(&self) -> Mat4 {
        self.matrices[TransformKind::Proj.index()]
    }

    /// Inverse of the Model matrix.
    pub fn inv_model(&mut self) -> Mat4 {
        self.get(TransformKind::InvModel)
    }

    /// Inverse of the View matrix.
    pub fn inv_view(&mut self) -> Mat4 {
        self.get(TransformKind::InvView)
    }

    /// Inverse of the Projection matrix.
    pub fn inv_proj(&mut self) -> Mat4 {
        self.get(TransformKind::InvProj)
    }

    /// `Proj * View`.
    pub fn view_proj(&mut self) -> Mat4 {
        self.get(TransformKind::ViewProj)
    }

    /// `View * Model`.
    pub fn model_view(&mut self) -> Mat4 {
        self.get(TransformKind::ModelView)
    }

    /// Inverse of `View * Model`.
    pub fn inv_model_view(&mut self) -> Mat4 {
        self.get(TransformKind::InvModelView)
    }

    /// `Proj * View * Model`.
    pub fn model_view_proj(&mut self) -> Mat4 {
        self.get(TransformKind::ModelViewProj)
    }

    /// The camera position in world space (translation of `InvView`).
    pub fn eye_position(&mut self) -> Vec3 {
        self.inv_view().translation()
    }

    /// Returns `true` if `kind` will be recomputed on its next read.
    pub fn is_dirty(&self, kind: TransformKind) -> bool {
        self.dirty.contains(kind.flag())
    }

    /// Total number of derived-slot recomputations since creation.
    pub fn recompute_count(&self) -> u64 {
        self.recomputations
    }

    /// Writes the camera transforms and the eye position into every matching
    /// variable `shader` declares. Slots the shader does not use are not computed.
    pub fn apply_view_transforms(&mut self, shader: &ShaderInstance) {
        self.apply_kinds(&TransformKind::VIEW_DEPENDENT, shader);
        if let Some(var) = shader.variable_by_semantic("EyePos") {
            var.set_vector(Vec4::from_vec3(self.eye_position(), 1.0));
        }
    }

    /// Writes the per-object transforms into every matching variable `shader` declares.
    pub fn apply_model_transforms(&mut self, shader: &ShaderInstance) {
        self.apply_kinds(&TransformKind::MODEL_DEPENDENT, shader);
    }

    fn apply_kinds(&mut self, kinds: &[TransformKind], shader: &ShaderInstance) {
        for &kind in kinds {
            if let Some(var) = shader.variable_by_semantic(kind.semantic()) {
                var.set_matrix(self.get(kind));
            }
        }
    }

    fn refresh(&mut self, kind: TransformKind) {
        if !self.dirty.contains(kind.flag()) {
            return;
        }
        for &input in PREREQUISITES[kind.index()] {
            self.refresh(input);
        }
        let m = &self.matrices;
        let value = match kind {
            TransformKind::InvModel => invert(m[TransformKind::Model.index()]),
            TransformKind::InvView => invert(m[TransformKind::View.index()]),
            TransformKind::InvProj => invert(m[TransformKind::Proj.index()]),
            TransformKind::ViewProj => {
                m[TransformKind::Proj.index()] * m[TransformKind::View.index()]
            }
            TransformKind::ModelView => {
                m[TransformKind::View.index()] * m[TransformKind::Model.index()]
            }
            TransformKind::InvModelView => {
                m[TransformKind::InvModel.index()] * m[TransformKind::InvView.index()]
            }
            TransformKind::ModelViewProj => {
                m[TransformKind::Proj.index()] * m[TransformKind::ModelView.index()]
            }
            TransformKind::Model | TransformKind::View | TransformKind::Proj => {
                unreachable!("base slots are never dirty")
            }
        };
        self.matrices[kind.index()] = value;
        self.dirty.remove(kind.flag());
        self.recomputations += 1;
        log::trace!("TransformSet: recomputed {kind:?}");
    }
}

impl Default for TransformSet {
    fn default() -> Self {
        Self::new()
    }
}

fn invert(m: Mat4) -> Mat4 {
    m.inverse().unwrap_or(Mat4::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{FRAC_PI_4, EPSILON};

    fn dependents_of(base: TransformKind) -> DirtyFlags {
        DEPENDENTS
            .iter()
            .find(|(k, _)| *k == base)
            .map(|(_, flags)| *flags)
            .unwrap_or(DirtyFlags::EMPTY)
    }

    fn depends_on(kind: TransformKind, base: TransformKind) -> bool {
        PREREQUISITES[kind.index()]
            .iter()
            .any(|&input| input == base || depends_on(input, base))
    }

    #[test]
    fn test_dependents_table_is_closure_of_prerequisites() {
        for base in [TransformKind::Model, TransformKind::View, TransformKind::Proj] {
            let expected = TransformKind::ALL
                .iter()
                .filter(|k| depends_on(**k, base))
                .fold(DirtyFlags::EMPTY, |acc, k| acc | k.flag());
            assert_eq!(dependents_of(base), expected, "mismatch for {base:?}");
        }
    }

    #[test]
    fn test_slot_flags_match_named_bits() {
        assert_eq!(TransformKind::Model.flag(), DirtyFlags::MODEL);
        assert_eq!(TransformKind::InvView.flag(), DirtyFlags::INV_VIEW);
        assert_eq!(
            TransformKind::ModelViewProj.flag(),
            DirtyFlags::MODEL_VIEW_PROJ
        );
        assert_eq!(
            dependents_of(TransformKind::Proj),
            DirtyFlags::INV_PROJ | DirtyFlags::VIEW_PROJ | DirtyFlags::MODEL_VIEW_PROJ
        );
        assert_eq!(
            format!("{:?}", DirtyFlags::VIEW | DirtyFlags::MODEL_VIEW),
            "DirtyFlags { VIEW | MODEL_VIEW }"
        );
    }

    #[test]
    fn test_set_proj_dirties_exactly_its_dependents() {
        let mut t = TransformSet::new();
        for kind in TransformKind::ALL {
            t.get(kind);
        }
        t.set_proj(Mat4::perspective_rh_zo(FRAC_PI_4, 1.5, 0.1, 100.0));

        for kind in TransformKind::ALL {
            let expected = matches!(
                kind,
                TransformKind::InvProj | TransformKind::ViewProj | TransformKind::ModelViewProj
            );
            assert_eq!(t.is_dirty(kind), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_mvp_refresh_also_refreshes_model_view() {
        let mut t = TransformSet::new();
        t.set_model(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)));
        assert!(t.is_dirty(TransformKind::ModelView));

        t.model_view_proj();
        assert!(!t.is_dirty(TransformKind::ModelView));
        assert!(!t.is_dirty(TransformKind::ModelViewProj));
        // Unrelated slots stay dirty until read.
        assert!(t.is_dirty(TransformKind::InvModel));
    }

    #[test]
    fn test_second_read_does_not_recompute() {
        let mut t = TransformSet::new();
        t.set_view(Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));

        let first = t.inv_model_view();
        let count = t.recompute_count();
        let second = t.inv_model_view();

        assert_eq!(first, second);
        assert_eq!(t.recompute_count(), count);
    }

    #[test]
    fn test_inv_model_view_uses_sub_inverses() {
        let mut t = TransformSet::new();
        t.set_model(Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0)));
        t.set_view(Mat4::from_rotation_y(0.3));
        let direct = t.model_view().inverse().unwrap();
        assert!(t.inv_model_view().abs_diff_eq(&direct, EPSILON));
        // InvModel, InvView, ModelView and InvModelView were each computed once.
        assert_eq!(t.recompute_count(), 4);
    }

    #[test]
    fn test_singular_model_inverts_to_identity() {
        let mut t = TransformSet::new();
        t.set_model(Mat4::ZERO);
        assert_eq!(t.inv_model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_eye_position_is_camera_origin() {
        let eye = Vec3::new(3.0, 4.0, 5.0);
        let mut t = TransformSet::new();
        t.set_view(Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).unwrap());
        let p = t.eye_position();
        assert!((p - eye).length() < 1e-4);
    }

    #[test]
    #[should_panic(expected = "cannot be set directly")]
    fn test_setting_derived_slot_panics() {
        let mut t = TransformSet::new();
        t.set(TransformKind::ViewProj, Mat4::IDENTITY);
    }

    #[test]
    fn test_semantics_are_unique() {
        let mut names: Vec<_> = TransformKind::ALL.iter().map(|k| k.semantic()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TransformKind::COUNT);
    }
}
