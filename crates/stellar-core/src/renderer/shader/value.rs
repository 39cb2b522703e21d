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

use crate::math::{Mat4, Vec4};
use std::fmt;

/// The element type of a shader variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderValueType {
    /// A 32-bit signed integer.
    Int,
    /// A 32-bit float.
    Float,
    /// A boolean, stored as a 32-bit word.
    Bool,
    /// A four-component float vector.
    Vector,
    /// A 4x4 float matrix.
    Matrix,
}

impl ShaderValueType {
    /// The size in bytes of one element once packed into a constant buffer.
    pub const fn byte_size(self) -> usize {
        match self {
            ShaderValueType::Int | ShaderValueType::Float | ShaderValueType::Bool => 4,
            ShaderValueType::Vector => 16,
            ShaderValueType::Matrix => 64,
        }
    }
}

impl fmt::Display for ShaderValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderValueType::Int => "int",
            ShaderValueType::Float => "float",
            ShaderValueType::Bool => "bool",
            ShaderValueType::Vector => "vector",
            ShaderValueType::Matrix => "matrix",
        };
        f.write_str(name)
    }
}

/// A typed value held by a shader variable.
///
/// Variables declared with an array size of one hold a scalar variant,
/// larger arrays hold the matching array variant with exactly that many
/// elements.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderValue {
    /// A single integer.
    Int(i32),
    /// A single float.
    Float(f32),
    /// A single boolean.
    Bool(bool),
    /// A single vector.
    Vector(Vec4),
    /// A single matrix.
    Matrix(Mat4),
    /// An integer array.
    IntArray(Vec<i32>),
    /// A float array.
    FloatArray(Vec<f32>),
    /// A boolean array.
    BoolArray(Vec<bool>),
    /// A vector array.
    VectorArray(Vec<Vec4>),
    /// A matrix array.
    MatrixArray(Vec<Mat4>),
}

impl ShaderValue {
    /// The zero value for a variable of the given type and array size.
    ///
    /// Matrices default to identity.
    pub fn default_for(value_type: ShaderValueType, array_size: usize) -> Self {
        if array_size <= 1 {
            match value_type {
                ShaderValueType::Int => ShaderValue::Int(0),
                ShaderValueType::Float => ShaderValue::Float(0.0),
                ShaderValueType::Bool => ShaderValue::Bool(false),
                ShaderValueType::Vector => ShaderValue::Vector(Vec4::ZERO),
                ShaderValueType::Matrix => ShaderValue::Matrix(Mat4::IDENTITY),
            }
        } else {
            match value_type {
                ShaderValueType::Int => ShaderValue::IntArray(vec![0; array_size]),
                ShaderValueType::Float => ShaderValue::FloatArray(vec![0.0; array_size]),
                ShaderValueType::Bool => ShaderValue::BoolArray(vec![false; array_size]),
                ShaderValueType::Vector => ShaderValue::VectorArray(vec![Vec4::ZERO; array_size]),
                ShaderValueType::Matrix => {
                    ShaderValue::MatrixArray(vec![Mat4::IDENTITY; array_size])
                }
            }
        }
    }

    /// The element type of the value.
    pub fn value_type(&self) -> ShaderValueType {
        match self {
            ShaderValue::Int(_) | ShaderValue::IntArray(_) => ShaderValueType::Int,
            ShaderValue::Float(_) | ShaderValue::FloatArray(_) => ShaderValueType::Float,
            ShaderValue::Bool(_) | ShaderValue::BoolArray(_) => ShaderValueType::Bool,
            ShaderValue::Vector(_) | ShaderValue::VectorArray(_) => ShaderValueType::Vector,
            ShaderValue::Matrix(_) | ShaderValue::MatrixArray(_) => ShaderValueType::Matrix,
        }
    }

    /// Returns `true` for the array variants.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ShaderValue::IntArray(_)
                | ShaderValue::FloatArray(_)
                | ShaderValue::BoolArray(_)
                | ShaderValue::VectorArray(_)
                | ShaderValue::MatrixArray(_)
        )
    }

    /// The number of elements: one for scalars, the length for arrays.
    pub fn element_count(&self) -> usize {
        match self {
            ShaderValue::IntArray(v) => v.len(),
            ShaderValue::FloatArray(v) => v.len(),
            ShaderValue::BoolArray(v) => v.len(),
            ShaderValue::VectorArray(v) => v.len(),
            ShaderValue::MatrixArray(v) => v.len(),
            _ => 1,
        }
    }

    /// Returns `true` if the value has the shape of a variable declared with
    /// `value_type` and `array_size`.
    pub fn matches(&self, value_type: ShaderValueType, array_size: usize) -> bool {
        self.value_type() == value_type
            && self.is_array() == (array_size > 1)
            && self.element_count() == array_size.max(1)
    }

    /// Appends the packed bytes of the value to `out`.
    ///
    /// Bytes are in native order. Booleans are written as 32-bit words,
    /// matrices in column-major order.
    pub fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            ShaderValue::Int(v) => out.extend_from_slice(bytemuck::bytes_of(v)),
            ShaderValue::Float(v) => out.extend_from_slice(bytemuck::bytes_of(v)),
            ShaderValue::Bool(v) => out.extend_from_slice(bytemuck::bytes_of(&u32::from(*v))),
            ShaderValue::Vector(v) => out.extend_from_slice(bytemuck::bytes_of(v)),
            ShaderValue::Matrix(v) => out.extend_from_slice(bytemuck::bytes_of(v)),
            ShaderValue::IntArray(v) => out.extend_from_slice(bytemuck::cast_slice(v)),
            ShaderValue::FloatArray(v) => out.extend_from_slice(bytemuck::cast_slice(v)),
            ShaderValue::BoolArray(v) => {
                for b in v {
                    out.extend_from_slice(bytemuck::bytes_of(&u32::from(*b)));
                }
            }
            ShaderValue::VectorArray(v) => out.extend_from_slice(bytemuck::cast_slice(v)),
            ShaderValue::MatrixArray(v) => out.extend_from_slice(bytemuck::cast_slice(v)),
        }
    }

    /// The packed size in bytes.
    pub fn byte_size(&self) -> usize {
        self.value_type().byte_size() * self.element_count()
    }
}
