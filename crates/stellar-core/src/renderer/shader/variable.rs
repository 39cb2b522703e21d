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

use super::value::{ShaderValue, ShaderValueType};
use crate::math::{Mat4, Vec4};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Declares a variable of a shader.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderVariableDesc {
    /// The variable name, unique within its shader.
    pub name: String,
    /// An optional semantic the engine binds well-known values to, such as `"ModelViewProjection"`.
    pub semantic: Option<String>,
    /// The element type.
    pub value_type: ShaderValueType,
    /// The number of elements; one for a scalar variable.
    pub array_size: usize,
    /// Shared variables are a single slot across every instance of every
    /// shader that declares them.
    pub shared: bool,
}

impl ShaderVariableDesc {
    /// Declares a scalar, non-shared variable.
    pub fn new(name: impl Into<String>, value_type: ShaderValueType) -> Self {
        Self {
            name: name.into(),
            semantic: None,
            value_type,
            array_size: 1,
            shared: false,
        }
    }

    /// Binds the variable to a semantic.
    pub fn with_semantic(mut self, semantic: impl Into<String>) -> Self {
        self.semantic = Some(semantic.into());
        self
    }

    /// Turns the variable into an array of `array_size` elements.
    pub fn with_array_size(mut self, array_size: usize) -> Self {
        self.array_size = array_size.max(1);
        self
    }

    /// Marks the variable as shared.
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// Returns `true` if both declarations describe the same slot layout and semantic.
    pub fn is_compatible_with(&self, other: &ShaderVariableDesc) -> bool {
        self.value_type == other.value_type
            && self.array_size == other.array_size
            && self.semantic == other.semantic
    }
}

/// A live variable slot of a shader instance.
///
/// Values are written through `&self` so that the transform cache, variable
/// instances and the frame graph can all update the slot while the owning
/// [`ShaderInstance`](super::ShaderInstance) is borrowed elsewhere.
/// Writing a value of the wrong type or element count is a programming error
/// and panics.
#[derive(Debug)]
pub struct ShaderVariable {
    desc: ShaderVariableDesc,
    value: RefCell<ShaderValue>,
    commits: Cell<u64>,
}

impl ShaderVariable {
    /// Creates the slot, holding the zero value of its type.
    pub fn new(desc: ShaderVariableDesc) -> Self {
        let value = ShaderValue::default_for(desc.value_type, desc.array_size);
        Self {
            desc,
            value: RefCell::new(value),
            commits: Cell::new(0),
        }
    }

    /// The declaration of the variable.
    pub fn desc(&self) -> &ShaderVariableDesc {
        &self.desc
    }

    /// The variable name.
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// The semantic, if any.
    pub fn semantic(&self) -> Option<&str> {
        self.desc.semantic.as_deref()
    }

    /// The element type.
    pub fn value_type(&self) -> ShaderValueType {
        self.desc.value_type
    }

    /// The number of elements.
    pub fn array_size(&self) -> usize {
        self.desc.array_size
    }

    /// A copy of the current value.
    pub fn value(&self) -> ShaderValue {
        self.value.borrow().clone()
    }

    /// How many times a value has been written.
    pub fn commit_count(&self) -> u64 {
        self.commits.get()
    }

    /// Appends the packed bytes of the current value to `out`.
    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        self.value.borrow().write_bytes(out);
    }

    /// Stores `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not have the declared type and element count.
    pub fn set_value(&self, value: ShaderValue) {
        assert!(
            value.matches(self.desc.value_type, self.desc.array_size),
            "ShaderVariable '{}': cannot store {} {} element(s), declared as {} {} element(s)",
            self.desc.name,
            value.element_count(),
            value.value_type(),
            self.desc.array_size,
            self.desc.value_type,
        );
        *self.value.borrow_mut() = value;
        self.commits.set(self.commits.get() + 1);
    }

    /// Stores an integer.
    pub fn set_int(&self, value: i32) {
        self.set_value(ShaderValue::Int(value));
    }

    /// Stores a float.
    pub fn set_float(&self, value: f32) {
        self.set_value(ShaderValue::Float(value));
    }

    /// Stores a boolean.
    pub fn set_bool(&self, value: bool) {
        self.set_value(ShaderValue::Bool(value));
    }

    /// Stores a vector.
    pub fn set_vector(&self, value: Vec4) {
        self.set_value(ShaderValue::Vector(value));
    }

    /// Stores a matrix.
    pub fn set_matrix(&self, value: Mat4) {
        self.set_value(ShaderValue::Matrix(value));
    }

    /// Stores an integer array.
    pub fn set_int_array(&self, values: &[i32]) {
        self.set_value(ShaderValue::IntArray(values.to_vec()));
    }

    /// Stores a float array.
    pub fn set_float_array(&self, values: &[f32]) {
        self.set_value(ShaderValue::FloatArray(values.to_vec()));
    }

    /// Stores a boolean array.
    pub fn set_bool_array(&self, values: &[bool]) {
        self.set_value(ShaderValue::BoolArray(values.to_vec()));
    }

    /// Stores a vector array.
    pub fn set_vector_array(&self, values: &[Vec4]) {
        self.set_value(ShaderValue::VectorArray(values.to_vec()));
    }

    /// Stores a matrix array.
    pub fn set_matrix_array(&self, values: &[Mat4]) {
        self.set_value(ShaderValue::MatrixArray(values.to_vec()));
    }
}

/// A pending value for a [`ShaderVariable`].
///
/// Setting a value on the instance only records it. [`apply`](Self::apply)
/// writes the recorded value into the variable.
#[derive(Debug, Clone)]
pub struct ShaderVariableInstance {
    variable: Rc<ShaderVariable>,
    value: ShaderValue,
}

impl ShaderVariableInstance {
    /// Creates an instance of `variable`, holding the zero value of its type.
    pub fn new(variable: Rc<ShaderVariable>) -> Self {
        let value = ShaderValue::default_for(variable.value_type(), variable.array_size());
        Self { variable, value }
    }

    /// The variable this instance writes to.
    pub fn variable(&self) -> &Rc<ShaderVariable> {
        &self.variable
    }

    /// The name of the variable.
    pub fn name(&self) -> &str {
        self.variable.name()
    }

    /// The recorded value.
    pub fn value(&self) -> &ShaderValue {
        &self.value
    }

    /// Records `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not have the type and element count of the variable.
    pub fn set_value(&mut self, value: ShaderValue) {
        assert!(
            value.matches(self.variable.value_type(), self.variable.array_size()),
            "ShaderVariableInstance '{}': cannot record {} {} element(s), declared as {} {} element(s)",
            self.variable.name(),
            value.element_count(),
            value.value_type(),
            self.variable.array_size(),
            self.variable.value_type(),
        );
        self.value = value;
    }

    /// Records an integer.
    pub fn set_int(&mut self, value: i32) {
        self.set_value(ShaderValue::Int(value));
    }

    /// Records a float.
    pub fn set_float(&mut self, value: f32) {
        self.set_value(ShaderValue::Float(value));
    }

    /// Records a boolean.
    pub fn set_bool(&mut self, value: bool) {
        self.set_value(ShaderValue::Bool(value));
    }

    /// Records a vector.
    pub fn set_vector(&mut self, value: Vec4) {
        self.set_value(ShaderValue::Vector(value));
    }

    /// Records a matrix.
    pub fn set_matrix(&mut self, value: Mat4) {
        self.set_value(ShaderValue::Matrix(value));
    }

    /// Records an integer array.
    pub fn set_int_array(&mut self, values: &[i32]) {
        self.set_value(ShaderValue::IntArray(values.to_vec()));
    }

    /// Records a float array.
    pub fn set_float_array(&mut self, values: &[f32]) {
        self.set_value(ShaderValue::FloatArray(values.to_vec()));
    }

    /// Records a boolean array.
    pub fn set_bool_array(&mut self, values: &[bool]) {
        self.set_value(ShaderValue::BoolArray(values.to_vec()));
    }

    /// Records a vector array.
    pub fn set_vector_array(&mut self, values: &[Vec4]) {
        self.set_value(ShaderValue::VectorArray(values.to_vec()));
    }

    /// Records a matrix array.
    pub fn set_matrix_array(&mut self, values: &[Mat4]) {
        self.set_value(ShaderValue::MatrixArray(values.to_vec()));
    }

    /// Writes the recorded value into the variable.
    pub fn apply(&self) {
        self.variable.set_value(self.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_var(name: &str) -> Rc<ShaderVariable> {
        Rc::new(ShaderVariable::new(ShaderVariableDesc::new(
            name,
            ShaderValueType::Float,
        )))
    }

    #[test]
    fn test_instance_records_until_applied() {
        let var = float_var("Intensity");
        let mut inst = ShaderVariableInstance::new(var.clone());
        inst.set_float(2.5);
        assert_eq!(var.value(), ShaderValue::Float(0.0));
        assert_eq!(var.commit_count(), 0);

        inst.apply();
        assert_eq!(var.value(), ShaderValue::Float(2.5));
        assert_eq!(var.commit_count(), 1);
    }

    #[test]
    fn test_last_applied_instance_wins() {
        let var = float_var("Intensity");
        let mut a = ShaderVariableInstance::new(var.clone());
        let mut b = ShaderVariableInstance::new(var.clone());
        a.set_float(1.0);
        b.set_float(2.0);

        a.apply();
        b.apply();
        assert_eq!(var.value(), ShaderValue::Float(2.0));
        a.apply();
        assert_eq!(var.value(), ShaderValue::Float(1.0));
    }

    #[test]
    fn test_array_values() {
        let desc = ShaderVariableDesc::new("Lights", ShaderValueType::Vector).with_array_size(2);
        let var = Rc::new(ShaderVariable::new(desc));
        let mut inst = ShaderVariableInstance::new(var.clone());
        inst.set_vector_array(&[Vec4::X, Vec4::Y]);
        inst.apply();
        assert_eq!(var.value(), ShaderValue::VectorArray(vec![Vec4::X, Vec4::Y]));
    }

    #[test]
    #[should_panic(expected = "cannot record")]
    fn test_instance_type_mismatch_panics() {
        let mut inst = ShaderVariableInstance::new(float_var("Intensity"));
        inst.set_matrix(Mat4::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "cannot record")]
    fn test_instance_array_count_mismatch_panics() {
        let desc = ShaderVariableDesc::new("Weights", ShaderValueType::Float).with_array_size(4);
        let mut inst = ShaderVariableInstance::new(Rc::new(ShaderVariable::new(desc)));
        inst.set_float_array(&[1.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "cannot store")]
    fn test_variable_type_mismatch_panics() {
        float_var("Intensity").set_int(3);
    }
}
