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

//! A stack of accumulated transforms for hierarchical scene traversal.

use crate::math::Mat4;
use std::fmt;

/// An error returned by [`MatrixStack::pop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixStackError {
    /// The pop would have removed the identity base entry.
    Underflow,
}

impl fmt::Display for MatrixStackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixStackError::Underflow => {
                write!(f, "Matrix stack underflow: cannot pop the identity base entry")
            }
        }
    }
}

impl std::error::Error for MatrixStackError {}

/// A stack of composed transforms whose bottom entry is always the identity.
///
/// [`push`](Self::push) stores `top() * local`, so the top of the stack is the
/// world transform of the node currently being visited: the local transform is
/// applied first, then every ancestor's. A scene walker pushes when it descends
/// into a node and pops when it leaves it.
///
/// # Examples
///
/// ```
/// use stellar_core::math::{Mat4, Vec3};
/// use stellar_core::MatrixStack;
///
/// let mut stack = MatrixStack::new();
/// stack.push(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
/// stack.push(Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
/// assert_eq!(stack.top().translation(), Vec3::new(1.0, 2.0, 0.0));
///
/// stack.pop().unwrap();
/// stack.pop().unwrap();
/// assert!(stack.pop().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MatrixStack {
    entries: Vec<Mat4>,
}

impl MatrixStack {
    /// Creates a stack holding only the identity base entry.
    pub fn new() -> Self {
        Self {
            entries: vec![Mat4::IDENTITY],
        }
    }

    /// Composes `local` with the current top and pushes the result.
    pub fn push(&mut self, local: Mat4) {
        let composed = self.top() * local;
        self.entries.push(composed);
    }

    /// Removes and returns the top entry.
    ///
    /// # Errors
    /// Returns [`MatrixStackError::Underflow`] when only the base entry is left;
    /// the stack is unchanged in that case.
    pub fn pop(&mut self) -> Result<Mat4, MatrixStackError> {
        if self.entries.len() <= 1 {
            return Err(MatrixStackError::Underflow);
        }
        self.entries.pop().ok_or(MatrixStackError::Underflow)
    }

    /// Returns the current composed transform.
    #[inline]
    pub fn top(&self) -> Mat4 {
        // The base entry is never removed.
        self.entries[self.entries.len() - 1]
    }

    /// Number of entries, including the base entry. Always at least 1.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when only the identity base entry is left.
    #[inline]
    pub fn is_at_base(&self) -> bool {
        self.entries.len() == 1
    }

    /// Drops every pushed entry, keeping the identity base.
    pub fn reset(&mut self) {
        self.entries.truncate(1);
    }
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec3, Vec4, EPSILON, FRAC_PI_2};

    #[test]
    fn test_new_stack_has_identity_base() {
        let stack = MatrixStack::new();
        assert_eq!(stack.len(), 1);
        assert!(stack.is_at_base());
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn test_pop_on_fresh_stack_underflows() {
        let mut stack = MatrixStack::new();
        assert_eq!(stack.pop(), Err(MatrixStackError::Underflow));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn test_push_composes_parent_then_child() {
        let parent = Mat4::from_rotation_z(FRAC_PI_2);
        let child = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

        let mut stack = MatrixStack::new();
        stack.push(parent);
        stack.push(child);

        assert!(stack.top().abs_diff_eq(&(parent * child), EPSILON));

        // The child's origin ends up where the parent's rotation puts (1, 0, 0).
        let origin = stack.top() * Vec4::W;
        assert!((origin.x - 0.0).abs() < EPSILON);
        assert!((origin.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_pop_restores_previous_top() {
        let a = Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0));
        let b = Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0));

        let mut stack = MatrixStack::new();
        stack.push(a);
        stack.push(b);
        let popped = stack.pop().unwrap();

        assert!(popped.abs_diff_eq(&(a * b), EPSILON));
        assert_eq!(stack.top(), a);
    }

    #[test]
    fn test_n_pushes_then_n_pops_returns_to_base() {
        let mut stack = MatrixStack::new();
        for i in 0..5 {
            stack.push(Mat4::from_translation(Vec3::new(i as f32, 0.0, 0.0)));
        }
        assert_eq!(stack.len(), 6);
        for _ in 0..5 {
            assert!(stack.pop().is_ok());
        }
        assert!(stack.is_at_base());
        assert_eq!(stack.top(), Mat4::IDENTITY);
        assert_eq!(stack.pop(), Err(MatrixStackError::Underflow));
    }

    #[test]
    fn test_reset_keeps_base() {
        let mut stack = MatrixStack::new();
        stack.push(Mat4::from_translation(Vec3::ONE));
        stack.push(Mat4::from_translation(Vec3::ONE));
        stack.reset();
        assert!(stack.is_at_base());
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn test_underflow_display() {
        assert_eq!(
            MatrixStackError::Underflow.to_string(),
            "Matrix stack underflow: cannot pop the identity base entry"
        );
    }
}
