//! Tests for matrix stacks

use super::*;

fn stacks_with(mode: MatrixMode) -> MatrixStacks {
    let mut stacks = MatrixStacks::new(false);
    stacks.set_mode(mode);
    stacks
}

#[test]
fn test_operations_require_selected_stack() {
    let mut stacks = MatrixStacks::new(false);
    assert_eq!(
        stacks.push(),
        Err(ImmediateError::InvalidOperation("no matrix stack selected"))
    );
    assert!(stacks.load_identity().is_err());
    assert!(stacks.translate(1.0, 0.0, 0.0).is_err());
}

#[test]
fn test_pop_at_floor_fails_and_keeps_stack() {
    let mut stacks = stacks_with(MatrixMode::ModelView);
    stacks.translate(1.0, 2.0, 3.0).unwrap();
    let before = stacks.top(MatrixMode::ModelView);

    assert_eq!(
        stacks.pop(),
        Err(ImmediateError::InvalidOperation("matrix stack underflow"))
    );
    assert_eq!(stacks.stack(MatrixMode::ModelView).depth(), 1);
    assert_eq!(stacks.top(MatrixMode::ModelView), before);
}

#[test]
fn test_depth_never_below_one() {
    let mut stacks = stacks_with(MatrixMode::Projection);
    for _ in 0..3 {
        stacks.push().unwrap();
    }
    assert_eq!(stacks.stack(MatrixMode::Projection).depth(), 4);
    for _ in 0..3 {
        stacks.pop().unwrap();
    }
    assert!(stacks.pop().is_err());
    assert!(stacks.pop().is_err());
    assert_eq!(stacks.stack(MatrixMode::Projection).depth(), 1);
}

#[test]
fn test_push_duplicates_and_pop_restores() {
    let mut stacks = stacks_with(MatrixMode::ModelView);
    stacks.scale(2.0, 2.0, 2.0).unwrap();
    let scaled = stacks.top(MatrixMode::ModelView);

    stacks.push().unwrap();
    assert_eq!(stacks.top(MatrixMode::ModelView), scaled);
    stacks.translate(5.0, 0.0, 0.0).unwrap();
    assert_ne!(stacks.top(MatrixMode::ModelView), scaled);

    stacks.pop().unwrap();
    assert_eq!(stacks.top(MatrixMode::ModelView), scaled);
}

#[test]
fn test_identity_then_multiply_yields_matrix() {
    let mut stacks = stacks_with(MatrixMode::ModelView);
    stacks.translate(9.0, 9.0, 9.0).unwrap();

    let m = Mat4::from_cols_array(&[
        1.0, 2.0, 3.0, 0.0, //
        4.0, 5.0, 6.0, 0.0, //
        7.0, 8.0, 9.5, 0.0, //
        1.0, -1.0, 2.0, 1.0,
    ]);
    stacks.load_identity().unwrap();
    stacks.multiply(m).unwrap();
    assert!(stacks.top(MatrixMode::ModelView).abs_diff_eq(m, 1e-6));
}

#[test]
fn test_multiply_post_composes() {
    let mut stacks = stacks_with(MatrixMode::ModelView);
    stacks.translate(1.0, 0.0, 0.0).unwrap();
    stacks.scale(2.0, 2.0, 2.0).unwrap();

    // Scale applies first, then the translation
    let p = stacks.top(MatrixMode::ModelView).transform_point3(Vec3::new(1.0, 1.0, 1.0));
    assert!(p.abs_diff_eq(Vec3::new(3.0, 2.0, 2.0), 1e-6));
}

#[test]
fn test_stacks_are_independent() {
    let mut stacks = stacks_with(MatrixMode::Texture);
    stacks.scale(0.5, 0.5, 1.0).unwrap();
    stacks.set_mode(MatrixMode::Projection);
    stacks.load_identity().unwrap();

    assert_eq!(stacks.top(MatrixMode::ModelView), Mat4::IDENTITY);
    assert_ne!(stacks.top(MatrixMode::Texture), Mat4::IDENTITY);
}

#[test]
fn test_dirty_flags_are_consumed() {
    let mut stacks = MatrixStacks::new(false);
    assert!(stacks.take_dirty(MatrixMode::ModelView));
    assert!(!stacks.take_dirty(MatrixMode::ModelView));

    stacks.set_mode(MatrixMode::ModelView);
    stacks.rotate(90.0, 0.0, 0.0, 1.0).unwrap();
    assert!(stacks.take_dirty(MatrixMode::ModelView));
    // Untouched stacks keep their initial dirty flag
    assert!(stacks.take_dirty(MatrixMode::Projection));
}

#[test]
fn test_reset_restores_identity_and_clears_selection() {
    let mut stacks = stacks_with(MatrixMode::ModelView);
    stacks.push().unwrap();
    stacks.translate(1.0, 1.0, 1.0).unwrap();
    stacks.take_dirty(MatrixMode::ModelView);

    stacks.reset();
    assert_eq!(stacks.active_mode(), None);
    for mode in MatrixMode::ALL {
        assert_eq!(stacks.stack(mode).depth(), 1);
        assert_eq!(stacks.top(mode), Mat4::IDENTITY);
        assert!(stacks.stack(mode).is_dirty());
    }
}

#[test]
fn test_ortho_maps_box_to_clip_space() {
    let m = ortho_matrix(0.0, 640.0, 0.0, 480.0, 1.0, 11.0, false);
    let corner = m * Vec4::new(640.0, 480.0, -11.0, 1.0);
    assert!(corner.abs_diff_eq(Vec4::new(1.0, 1.0, 1.0, 1.0), 1e-5));
    let origin = m * Vec4::new(0.0, 0.0, -1.0, 1.0);
    assert!(origin.abs_diff_eq(Vec4::new(-1.0, -1.0, 0.0, 1.0), 1e-5));
}

#[test]
fn test_ortho_flip_negates_y_terms() {
    let normal = ortho_matrix(-1.0, 1.0, -2.0, 4.0, 0.0, 1.0, false);
    let flipped = ortho_matrix(-1.0, 1.0, -2.0, 4.0, 0.0, 1.0, true);
    assert_eq!(flipped.y_axis.y, -normal.y_axis.y);
    assert_eq!(flipped.w_axis.y, -normal.w_axis.y);
    assert_eq!(flipped.x_axis, normal.x_axis);
    assert_eq!(flipped.z_axis, normal.z_axis);
}

#[test]
fn test_frustum_near_far_depth() {
    let m = frustum_matrix(-1.0, 1.0, -1.0, 1.0, 1.0, 100.0, false);
    let near = m * Vec4::new(0.0, 0.0, -1.0, 1.0);
    let far = m * Vec4::new(0.0, 0.0, -100.0, 1.0);
    assert!((near.z / near.w).abs() < 1e-5);
    assert!((far.z / far.w - 1.0).abs() < 1e-5);
    assert_eq!(near.w, 1.0);
}

#[test]
fn test_frustum_flip_negates_y_terms() {
    let normal = frustum_matrix(-1.0, 2.0, -1.0, 3.0, 1.0, 10.0, false);
    let flipped = frustum_matrix(-1.0, 2.0, -1.0, 3.0, 1.0, 10.0, true);
    assert_eq!(flipped.y_axis.y, -normal.y_axis.y);
    assert_eq!(flipped.z_axis.y, -normal.z_axis.y);
    assert_eq!(flipped.w_axis, normal.w_axis);
}

#[test]
fn test_perspective_matches_symmetric_frustum() {
    let mut stacks = stacks_with(MatrixMode::Projection);
    stacks.perspective(90.0, 2.0, 1.0, 10.0).unwrap();
    let expected = frustum_matrix(-2.0, 2.0, -1.0, 1.0, 1.0, 10.0, false);
    assert!(stacks.top(MatrixMode::Projection).abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_rotate_about_z() {
    let mut stacks = stacks_with(MatrixMode::ModelView);
    stacks.rotate(90.0, 0.0, 0.0, 2.0).unwrap();
    let v = stacks.top(MatrixMode::ModelView).transform_vector3(Vec3::X);
    assert!(v.abs_diff_eq(Vec3::Y, 1e-6));
}

#[test]
fn test_rotate_zero_axis_rejected() {
    let mut stacks = stacks_with(MatrixMode::ModelView);
    stacks.take_dirty(MatrixMode::ModelView);
    assert!(matches!(
        stacks.rotate(45.0, 0.0, 0.0, 0.0),
        Err(ImmediateError::InvalidValue(_))
    ));
    assert!(!stacks.stack(MatrixMode::ModelView).is_dirty());
}
