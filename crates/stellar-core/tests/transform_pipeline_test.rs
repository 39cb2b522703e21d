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

use std::rc::Rc;

use approx::assert_relative_eq;

use stellar_core::math::{Mat4, Vec3, FRAC_PI_2, FRAC_PI_4};
use stellar_core::renderer::shader::{
    FeatureMask, Shader, ShaderValue, ShaderValueType, ShaderVariableDesc, ShaderVariation,
};
use stellar_core::transform::{MatrixStackError, TransformKind};
use stellar_core::{MatrixStack, TransformSet};

const EPS: f32 = 1e-5;

#[test]
fn test_identity_camera_leaves_model_untouched() {
    let mut transforms = TransformSet::new();
    let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::from_rotation_y(0.3);
    transforms.set_model(model);
    transforms.set_view(Mat4::IDENTITY);
    transforms.set_proj(Mat4::IDENTITY);

    assert!(transforms.model_view_proj().abs_diff_eq(&model, EPS));
    assert!(transforms.model_view().abs_diff_eq(&model, EPS));
}

#[test]
fn test_translated_model_with_identity_camera() {
    let mut transforms = TransformSet::new();
    let model = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    transforms.set_model(model);
    transforms.set_view(Mat4::IDENTITY);
    transforms.set_proj(Mat4::IDENTITY);

    assert!(transforms.model_view_proj().abs_diff_eq(&model, 1e-5));
}

#[test]
fn test_interleaved_updates_match_fresh_computation() {
    let models = [
        Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        Mat4::from_rotation_y(0.7) * Mat4::from_scale(Vec3::new(1.0, 2.0, 0.5)),
        Mat4::from_rotation_z(-1.2),
    ];
    let views = [
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap(),
        Mat4::look_at_rh(Vec3::new(4.0, 3.0, -2.0), Vec3::X, Vec3::Y).unwrap(),
    ];
    let projs = [
        Mat4::perspective_rh_zo(FRAC_PI_4, 1.0, 0.1, 10.0),
        Mat4::perspective_rh_zo(FRAC_PI_2, 2.0, 0.5, 50.0),
    ];

    let mut transforms = TransformSet::new();
    for step in 0..12 {
        match step % 3 {
            0 => transforms.set_model(models[step % models.len()]),
            1 => transforms.set_view(views[step % views.len()]),
            _ => transforms.set_proj(projs[step % projs.len()]),
        }
        if step < 2 {
            continue;
        }
        let (m, v, p) = (transforms.model(), transforms.view(), transforms.proj());
        assert!(transforms.model_view_proj().abs_diff_eq(&(p * v * m), 1e-4));
        assert!(transforms.view_proj().abs_diff_eq(&(p * v), 1e-4));
        let inv_mv = (v * m).inverse().unwrap();
        assert!(transforms.inv_model_view().abs_diff_eq(&inv_mv, 1e-3));
    }
}

#[test]
fn test_inverse_model_view_round_trips() {
    let mut transforms = TransformSet::new();
    transforms.set_model(
        Mat4::from_rotation_z(FRAC_PI_4) * Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0)),
    );
    transforms.set_view(Mat4::look_at_rh(Vec3::new(0.0, 3.0, 10.0), Vec3::ZERO, Vec3::Y).unwrap());

    let mv = transforms.model_view();
    let inv = transforms.inv_model_view();
    assert!((mv * inv).abs_diff_eq(&Mat4::IDENTITY, 1e-4));
}

#[test]
fn test_only_affected_slots_are_recomputed() {
    let mut transforms = TransformSet::new();
    transforms.set_view(Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));
    transforms.set_proj(Mat4::perspective_rh_zo(FRAC_PI_2, 1.0, 0.1, 100.0));
    transforms.view_proj();
    transforms.inv_view();
    let before = transforms.recompute_count();

    transforms.set_model(Mat4::from_translation(Vec3::X));
    assert!(!transforms.is_dirty(TransformKind::ViewProj));
    assert!(!transforms.is_dirty(TransformKind::InvView));
    assert!(transforms.is_dirty(TransformKind::ModelViewProj));

    transforms.view_proj();
    assert_eq!(transforms.recompute_count(), before);

    transforms.model_view_proj();
    assert_eq!(transforms.recompute_count(), before + 2);
}

#[test]
fn test_matrix_stack_drives_transform_set() {
    let mut stack = MatrixStack::new();
    let mut transforms = TransformSet::new();

    stack.push(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
    stack.push(Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)));
    transforms.set_model(stack.top());
    let world = transforms.model().translation();
    assert_relative_eq!(world.x, 10.0, epsilon = EPS);
    assert_relative_eq!(world.y, 5.0, epsilon = EPS);
    assert_relative_eq!(world.z, 0.0, epsilon = EPS);

    stack.pop().unwrap();
    stack.pop().unwrap();
    assert!(stack.is_at_base());
    assert_eq!(stack.pop(), Err(MatrixStackError::Underflow));
    assert_eq!(stack.top(), Mat4::IDENTITY);
}

#[test]
fn test_transforms_reach_shader_variables_by_semantic() {
    let mut shader = Shader::new("standard");
    shader
        .add_variation(ShaderVariation::new("solid", FeatureMask::from_bits(1)))
        .unwrap();
    for kind in [
        TransformKind::View,
        TransformKind::ViewProj,
        TransformKind::ModelViewProj,
    ] {
        shader
            .declare_variable(
                ShaderVariableDesc::new(format!("u_{kind:?}"), ShaderValueType::Matrix)
                    .with_semantic(kind.semantic()),
            )
            .unwrap();
    }
    shader
        .declare_variable(
            ShaderVariableDesc::new("u_eye", ShaderValueType::Vector).with_semantic("EyePos"),
        )
        .unwrap();
    let instance = Rc::new(shader).create_instance();

    let mut transforms = TransformSet::new();
    let eye = Vec3::new(0.0, 2.0, 8.0);
    transforms.set_view(Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).unwrap());
    transforms.set_proj(Mat4::perspective_rh_zo(FRAC_PI_4, 1.5, 0.1, 50.0));
    transforms.set_model(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));

    transforms.apply_view_transforms(&instance);
    let mvp = instance.variable_by_name("u_ModelViewProj").unwrap();
    assert_eq!(mvp.commit_count(), 0);
    assert_eq!(
        instance.variable_by_name("u_ViewProj").unwrap().value(),
        ShaderValue::Matrix(transforms.view_proj())
    );
    match instance.variable_by_name("u_eye").unwrap().value() {
        ShaderValue::Vector(v) => {
            assert!((v.truncate() - eye).length() < 1e-4);
            assert_eq!(v.w, 1.0);
        }
        other => panic!("unexpected eye value {other:?}"),
    }

    transforms.apply_model_transforms(&instance);
    assert_eq!(mvp.commit_count(), 1);
    assert_eq!(mvp.value(), ShaderValue::Matrix(transforms.model_view_proj()));
}
