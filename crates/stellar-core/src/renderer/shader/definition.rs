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

use super::feature::FeatureMask;
use super::instance::ShaderInstance;
use super::variable::ShaderVariableDesc;
use crate::renderer::error::ShaderError;
use std::rc::Rc;

/// One compiled permutation of a shader, selected by its feature mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderVariation {
    name: String,
    features: FeatureMask,
    num_passes: usize,
}

impl ShaderVariation {
    /// Creates a single-pass variation.
    pub fn new(name: impl Into<String>, features: FeatureMask) -> Self {
        Self {
            name: name.into(),
            features,
            num_passes: 1,
        }
    }

    /// Sets the number of passes the variation renders with.
    pub fn with_passes(mut self, num_passes: usize) -> Self {
        self.num_passes = num_passes.max(1);
        self
    }

    /// The variation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The feature mask selecting this variation.
    pub fn features(&self) -> FeatureMask {
        self.features
    }

    /// The number of passes.
    pub fn num_passes(&self) -> usize {
        self.num_passes
    }
}

/// A shader template: its variations and the variables it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    name: String,
    variations: Vec<ShaderVariation>,
    variables: Vec<ShaderVariableDesc>,
}

impl Shader {
    /// Creates a shader with no variation and no variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variations: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// The shader name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a variation.
    ///
    /// Feature masks are unique per shader: registering a second variation
    /// with the same mask fails.
    pub fn add_variation(&mut self, variation: ShaderVariation) -> Result<(), ShaderError> {
        if self.variation_index(variation.features).is_some() {
            return Err(ShaderError::DuplicateVariation {
                shader: self.name.clone(),
                mask: variation.features,
            });
        }
        self.variations.push(variation);
        Ok(())
    }

    /// Declares a variable. Names are unique per shader.
    pub fn declare_variable(&mut self, desc: ShaderVariableDesc) -> Result<(), ShaderError> {
        if self.variables.iter().any(|v| v.name == desc.name) {
            return Err(ShaderError::DuplicateVariable {
                shader: self.name.clone(),
                variable: desc.name,
            });
        }
        self.variables.push(desc);
        Ok(())
    }

    /// The registered variations, in registration order.
    pub fn variations(&self) -> &[ShaderVariation] {
        &self.variations
    }

    /// The declared variables, in declaration order.
    pub fn variables(&self) -> &[ShaderVariableDesc] {
        &self.variables
    }

    /// The index of the variation whose mask equals `features`.
    pub fn variation_index(&self, features: FeatureMask) -> Option<usize> {
        self.variations.iter().position(|v| v.features == features)
    }

    /// The variation whose mask equals `features`.
    pub fn variation(&self, features: FeatureMask) -> Option<&ShaderVariation> {
        self.variation_index(features).map(|i| &self.variations[i])
    }

    /// Creates an instance with a private slot for every declared variable.
    ///
    /// Use [`ShaderLibrary::create_instance`](super::ShaderLibrary::create_instance)
    /// to have shared variables resolved to library-wide slots.
    pub fn create_instance(self: &Rc<Self>) -> ShaderInstance {
        ShaderInstance::new(Rc::clone(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shader::ShaderValueType;

    #[test]
    fn test_duplicate_variation_is_rejected() {
        let mut shader = Shader::new("standard");
        let mask = FeatureMask::from_bits(0b01);
        shader
            .add_variation(ShaderVariation::new("solid", mask))
            .unwrap();
        let err = shader
            .add_variation(ShaderVariation::new("solid_again", mask))
            .unwrap_err();
        assert_eq!(
            err,
            ShaderError::DuplicateVariation {
                shader: "standard".to_string(),
                mask
            }
        );
        assert_eq!(shader.variations().len(), 1);
    }

    #[test]
    fn test_variation_lookup_is_exact() {
        let mut shader = Shader::new("standard");
        shader
            .add_variation(ShaderVariation::new("solid", FeatureMask::from_bits(0b01)))
            .unwrap();
        shader
            .add_variation(
                ShaderVariation::new("solid_skinned", FeatureMask::from_bits(0b11)).with_passes(2),
            )
            .unwrap();

        let v = shader.variation(FeatureMask::from_bits(0b11)).unwrap();
        assert_eq!(v.name(), "solid_skinned");
        assert_eq!(v.num_passes(), 2);
        assert!(shader.variation(FeatureMask::from_bits(0b10)).is_none());
    }

    #[test]
    fn test_duplicate_variable_is_rejected() {
        let mut shader = Shader::new("standard");
        shader
            .declare_variable(ShaderVariableDesc::new("Tint", ShaderValueType::Vector))
            .unwrap();
        assert!(shader
            .declare_variable(ShaderVariableDesc::new("Tint", ShaderValueType::Float))
            .is_err());
    }
}
