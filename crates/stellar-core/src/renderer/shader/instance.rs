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

use super::definition::{Shader, ShaderVariation};
use super::feature::FeatureMask;
use super::variable::ShaderVariable;
use std::rc::Rc;

/// A per-use instantiation of a [`Shader`].
///
/// An instance owns (or shares) the slots of its shader's variables and
/// tracks which variation is active. A fresh instance has no active
/// variation until one is selected.
#[derive(Debug)]
pub struct ShaderInstance {
    shader: Rc<Shader>,
    variables: Vec<Rc<ShaderVariable>>,
    active_variation: Option<usize>,
}

impl ShaderInstance {
    pub(crate) fn new(shader: Rc<Shader>) -> Self {
        let variables = shader
            .variables()
            .iter()
            .map(|desc| Rc::new(ShaderVariable::new(desc.clone())))
            .collect();
        Self::with_variables(shader, variables)
    }

    pub(crate) fn with_variables(shader: Rc<Shader>, variables: Vec<Rc<ShaderVariable>>) -> Self {
        Self {
            shader,
            variables,
            active_variation: None,
        }
    }

    /// The shader this instance was created from.
    pub fn shader(&self) -> &Rc<Shader> {
        &self.shader
    }

    /// The shader name.
    pub fn name(&self) -> &str {
        self.shader.name()
    }

    /// The variable slots, in declaration order.
    pub fn variables(&self) -> &[Rc<ShaderVariable>] {
        &self.variables
    }

    /// Looks up a variable by name.
    pub fn variable_by_name(&self, name: &str) -> Option<&Rc<ShaderVariable>> {
        self.variables.iter().find(|v| v.name() == name)
    }

    /// Looks up a variable by semantic.
    pub fn variable_by_semantic(&self, semantic: &str) -> Option<&Rc<ShaderVariable>> {
        self.variables
            .iter()
            .find(|v| v.semantic() == Some(semantic))
    }

    /// Activates the variation whose feature mask equals `features`.
    ///
    /// Returns `true` if the active variation changed. Selecting the already
    /// active variation returns `false`. If the shader has no variation for
    /// `features`, an error is logged, the active variation is kept, and
    /// `false` is returned.
    pub fn select_active_variation(&mut self, features: FeatureMask) -> bool {
        match self.shader.variation_index(features) {
            Some(index) if self.active_variation == Some(index) => false,
            Some(index) => {
                self.active_variation = Some(index);
                true
            }
            None => {
                log::error!(
                    "ShaderInstance: shader '{}' has no variation for feature mask {}",
                    self.shader.name(),
                    features
                );
                false
            }
        }
    }

    /// The active variation, if one has been selected.
    pub fn active_variation(&self) -> Option<&ShaderVariation> {
        self.active_variation
            .map(|index| &self.shader.variations()[index])
    }

    /// Packs the current value of every variable, in declaration order, into `out`.
    pub fn pack_constants(&self, out: &mut Vec<u8>) {
        for variable in &self.variables {
            variable.write_bytes(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Mat4, Vec3};
    use crate::renderer::shader::{ShaderValue, ShaderValueType, ShaderVariableDesc};

    fn shader() -> Rc<Shader> {
        let mut shader = Shader::new("standard");
        shader
            .add_variation(ShaderVariation::new("solid", FeatureMask::from_bits(0b001)))
            .unwrap();
        shader
            .add_variation(ShaderVariation::new("skinned", FeatureMask::from_bits(0b011)))
            .unwrap();
        shader
            .declare_variable(
                ShaderVariableDesc::new("mvp", ShaderValueType::Matrix)
                    .with_semantic("ModelViewProjection"),
            )
            .unwrap();
        shader
            .declare_variable(ShaderVariableDesc::new("Alpha", ShaderValueType::Float))
            .unwrap();
        Rc::new(shader)
    }

    #[test]
    fn test_selection_reports_changes_only() {
        let mut inst = shader().create_instance();
        assert!(inst.active_variation().is_none());

        assert!(inst.select_active_variation(FeatureMask::from_bits(0b001)));
        assert!(!inst.select_active_variation(FeatureMask::from_bits(0b001)));
        assert!(inst.select_active_variation(FeatureMask::from_bits(0b011)));
        assert_eq!(inst.active_variation().unwrap().name(), "skinned");
    }

    #[test]
    fn test_missing_variation_keeps_current() {
        let mut inst = shader().create_instance();
        inst.select_active_variation(FeatureMask::from_bits(0b001));

        assert!(!inst.select_active_variation(FeatureMask::from_bits(0b100)));
        assert_eq!(inst.active_variation().unwrap().name(), "solid");
    }

    #[test]
    fn test_instances_have_private_slots() {
        let shader = shader();
        let a = shader.create_instance();
        let b = shader.create_instance();
        a.variable_by_name("Alpha").unwrap().set_float(0.5);
        assert_eq!(
            b.variable_by_name("Alpha").unwrap().value(),
            ShaderValue::Float(0.0)
        );
    }

    #[test]
    fn test_lookup_by_semantic_and_pack() {
        let inst = shader().create_instance();
        let mvp = inst.variable_by_semantic("ModelViewProjection").unwrap();
        assert_eq!(mvp.name(), "mvp");
        mvp.set_matrix(Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0)));

        let mut bytes = Vec::new();
        inst.pack_constants(&mut bytes);
        assert_eq!(bytes.len(), 64 + 4);
        assert_eq!(&bytes[0..4], &2.0f32.to_ne_bytes());
        assert!(inst.variable_by_semantic("View").is_none());
    }
}
