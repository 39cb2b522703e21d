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

use super::definition::Shader;
use super::feature::FeatureMask;
use super::instance::ShaderInstance;
use super::variable::ShaderVariable;
use crate::renderer::error::ShaderError;
use std::collections::HashMap;
use std::rc::Rc;

/// Owns the registered shaders, the feature-name registry and the shared
/// variable slots.
///
/// Feature names are assigned bits in first-use order, so the same name
/// always maps to the same bit for the lifetime of the library.
#[derive(Debug, Default)]
pub struct ShaderLibrary {
    shaders: HashMap<String, Rc<Shader>>,
    features: Vec<String>,
    shared: HashMap<String, Rc<ShaderVariable>>,
}

impl ShaderLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shader and creates the slots of its shared variables.
    ///
    /// Fails if the name is taken, or if a shared variable was already
    /// declared by another shader with a different type, array size or
    /// semantic.
    pub fn register(&mut self, shader: Shader) -> Result<Rc<Shader>, ShaderError> {
        if self.shaders.contains_key(shader.name()) {
            return Err(ShaderError::DuplicateShader(shader.name().to_string()));
        }
        let shared_decls = shader.variables().iter().filter(|d| d.shared);
        for decl in shared_decls.clone() {
            if let Some(slot) = self.shared.get(&decl.name) {
                if !slot.desc().is_compatible_with(decl) {
                    return Err(ShaderError::SharedVariableMismatch {
                        variable: decl.name.clone(),
                    });
                }
            }
        }
        for decl in shared_decls {
            self.shared
                .entry(decl.name.clone())
                .or_insert_with(|| Rc::new(ShaderVariable::new(decl.clone())));
        }

        log::debug!("ShaderLibrary: registered shader '{}'", shader.name());
        let shader = Rc::new(shader);
        self.shaders
            .insert(shader.name().to_string(), Rc::clone(&shader));
        Ok(shader)
    }

    /// Looks up a shader by name.
    pub fn shader(&self, name: &str) -> Option<&Rc<Shader>> {
        self.shaders.get(name)
    }

    /// Creates an instance of the named shader.
    ///
    /// Shared variables resolve to the library-wide slot; every other
    /// variable gets a fresh slot.
    pub fn create_instance(&self, name: &str) -> Result<ShaderInstance, ShaderError> {
        let shader = self
            .shaders
            .get(name)
            .ok_or_else(|| ShaderError::UnknownShader(name.to_string()))?;
        let variables = shader
            .variables()
            .iter()
            .map(|desc| match self.shared.get(&desc.name) {
                Some(slot) if desc.shared => Rc::clone(slot),
                _ => Rc::new(ShaderVariable::new(desc.clone())),
            })
            .collect();
        Ok(ShaderInstance::with_variables(Rc::clone(shader), variables))
    }

    /// Looks up a shared variable slot by name.
    pub fn shared_variable(&self, name: &str) -> Option<&Rc<ShaderVariable>> {
        self.shared.get(name)
    }

    /// Converts a `|`-separated list of feature names into a mask,
    /// assigning bits to names seen for the first time.
    ///
    /// Whitespace around names is ignored and an empty string yields the
    /// empty mask.
    pub fn feature_mask(&mut self, names: &str) -> Result<FeatureMask, ShaderError> {
        let mut mask = FeatureMask::EMPTY;
        for name in split_features(names) {
            let index = match self.features.iter().position(|f| f == name) {
                Some(index) => index,
                None => {
                    if self.features.len() == FeatureMask::MAX_FEATURES {
                        return Err(ShaderError::TooManyFeatures {
                            feature: name.to_string(),
                        });
                    }
                    self.features.push(name.to_string());
                    self.features.len() - 1
                }
            };
            mask |= FeatureMask::from_index(index);
        }
        Ok(mask)
    }

    /// Like [`feature_mask`](Self::feature_mask), but returns `None` if any
    /// name is not registered yet.
    pub fn lookup_feature_mask(&self, names: &str) -> Option<FeatureMask> {
        split_features(names).try_fold(FeatureMask::EMPTY, |mask, name| {
            self.features
                .iter()
                .position(|f| f == name)
                .map(|index| mask | FeatureMask::from_index(index))
        })
    }

    /// Converts a mask back into its `|`-separated feature names.
    ///
    /// Bits without a registered name are skipped.
    pub fn feature_names(&self, mask: FeatureMask) -> String {
        mask.indices()
            .filter_map(|index| self.features.get(index).map(String::as_str))
            .collect::<Vec<_>>()
            .join("|")
    }
}

fn split_features(names: &str) -> impl Iterator<Item = &str> {
    names.split('|').map(str::trim).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shader::{ShaderValue, ShaderValueType, ShaderVariableDesc};

    fn shader_with(name: &str, decls: Vec<ShaderVariableDesc>) -> Shader {
        let mut shader = Shader::new(name);
        for decl in decls {
            shader.declare_variable(decl).unwrap();
        }
        shader
    }

    #[test]
    fn test_feature_bits_are_stable() {
        let mut lib = ShaderLibrary::new();
        let solid = lib.feature_mask("Solid").unwrap();
        let both = lib.feature_mask(" Skinned | Solid ").unwrap();
        assert_eq!(solid.bits(), 0b01);
        assert_eq!(both.bits(), 0b11);
        assert_eq!(lib.feature_names(both), "Solid|Skinned");
        assert_eq!(lib.feature_mask("").unwrap(), FeatureMask::EMPTY);
        assert_eq!(lib.lookup_feature_mask("Skinned"), Some(FeatureMask::from_bits(0b10)));
        assert_eq!(lib.lookup_feature_mask("Solid|Alpha"), None);
    }

    #[test]
    fn test_feature_registry_overflow() {
        let mut lib = ShaderLibrary::new();
        for i in 0..FeatureMask::MAX_FEATURES {
            lib.feature_mask(&format!("F{i}")).unwrap();
        }
        let err = lib.feature_mask("OneTooMany").unwrap_err();
        assert_eq!(
            err,
            ShaderError::TooManyFeatures {
                feature: "OneTooMany".to_string()
            }
        );
        assert!(lib.feature_mask("F3").is_ok());
    }

    #[test]
    fn test_shared_variables_are_one_slot() {
        let mut lib = ShaderLibrary::new();
        let ambient = ShaderVariableDesc::new("Ambient", ShaderValueType::Vector).shared();
        lib.register(shader_with("a", vec![ambient.clone()])).unwrap();
        lib.register(shader_with("b", vec![ambient])).unwrap();

        let a = lib.create_instance("a").unwrap();
        let b = lib.create_instance("b").unwrap();
        let value = crate::math::Vec4::new(0.1, 0.2, 0.3, 1.0);
        a.variable_by_name("Ambient").unwrap().set_vector(value);
        assert_eq!(
            b.variable_by_name("Ambient").unwrap().value(),
            ShaderValue::Vector(value)
        );
        assert!(Rc::ptr_eq(
            lib.shared_variable("Ambient").unwrap(),
            a.variable_by_name("Ambient").unwrap()
        ));
    }

    #[test]
    fn test_shared_variable_mismatch_is_rejected() {
        let mut lib = ShaderLibrary::new();
        lib.register(shader_with(
            "a",
            vec![ShaderVariableDesc::new("Time", ShaderValueType::Float).shared()],
        ))
        .unwrap();
        let err = lib
            .register(shader_with(
                "b",
                vec![ShaderVariableDesc::new("Time", ShaderValueType::Int).shared()],
            ))
            .unwrap_err();
        assert!(matches!(err, ShaderError::SharedVariableMismatch { .. }));
        assert!(lib.shader("b").is_none());
    }

    #[test]
    fn test_shared_variable_semantic_mismatch_is_rejected() {
        let mut lib = ShaderLibrary::new();
        let eye = ShaderVariableDesc::new("u_eye", ShaderValueType::Vector).shared();
        lib.register(shader_with("a", vec![eye.clone().with_semantic("EyePos")]))
            .unwrap();
        let err = lib
            .register(shader_with("b", vec![eye.with_semantic("LightPos")]))
            .unwrap_err();
        assert_eq!(
            err,
            ShaderError::SharedVariableMismatch {
                variable: "u_eye".to_string()
            }
        );

        let a = lib.create_instance("a").unwrap();
        assert!(a.variable_by_semantic("EyePos").is_some());
    }

    #[test]
    fn test_unknown_and_duplicate_shaders() {
        let mut lib = ShaderLibrary::new();
        lib.register(Shader::new("depth")).unwrap();
        assert_eq!(
            lib.register(Shader::new("depth")).unwrap_err(),
            ShaderError::DuplicateShader("depth".to_string())
        );
        assert_eq!(
            lib.create_instance("nope").unwrap_err(),
            ShaderError::UnknownShader("nope".to_string())
        );
    }
}
