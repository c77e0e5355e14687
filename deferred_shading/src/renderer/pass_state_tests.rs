use super::*;
use crate::graphics_device::{BlendFactor, BlendOp};

fn state(pass: PassState) -> FixedFunctionState {
    pass.fixed_function().unwrap()
}

#[test]
fn test_idle_and_final_blit_have_no_state() {
    assert!(PassState::Idle.fixed_function().is_none());
    assert!(PassState::FinalBlit.fixed_function().is_none());
    assert!(matches!(PassState::FinalBlit.pipeline_state(), Err(Error::InvalidResource(_))));
}

#[test]
fn test_only_geometry_writes_depth() {
    for pass in PassState::DRAWING {
        assert_eq!(
            state(pass).depth_stencil.depth_write_enable,
            pass == PassState::Geometry,
            "{}", pass.name()
        );
    }
}

#[test]
fn test_geometry_state() {
    let s = state(PassState::Geometry);
    assert!(s.depth_stencil.depth_test_enable);
    assert_eq!(s.depth_stencil.depth_compare_op, CompareOp::Less);
    assert!(!s.depth_stencil.stencil_test_enable);
    assert!(!s.color_blend.blend_enable);
    assert_eq!(s.rasterization.cull_mode, CullMode::Back);
}

#[test]
fn test_stencil_two_sided_ops() {
    let s = state(PassState::Stencil);
    let ds = s.depth_stencil;
    assert!(ds.depth_test_enable);
    assert!(ds.stencil_test_enable);
    assert_eq!(s.rasterization.cull_mode, CullMode::None);

    assert_eq!(ds.back.depth_fail_op, StencilOp::IncrementAndWrap);
    assert_eq!(ds.front.depth_fail_op, StencilOp::DecrementAndWrap);
    for face in [ds.front, ds.back] {
        assert_eq!(face.compare_op, CompareOp::Always);
        assert_eq!(face.reference, 0);
        assert_eq!(face.compare_mask, 0);
        assert_eq!(face.fail_op, StencilOp::Keep);
        assert_eq!(face.pass_op, StencilOp::Keep);
        assert_ne!(face.write_mask, 0);
    }
}

#[test]
fn test_point_light_reads_stencil_and_adds() {
    let s = state(PassState::PointLight);
    let ds = s.depth_stencil;
    assert!(!ds.depth_test_enable);
    assert!(ds.stencil_test_enable);
    assert_eq!(s.rasterization.cull_mode, CullMode::Front);
    for face in [ds.front, ds.back] {
        assert_eq!(face.compare_op, CompareOp::NotEqual);
        assert_eq!(face.reference, 0);
        assert_eq!(face.write_mask, 0);
    }
    assert_eq!(s.color_blend.src_color_factor, BlendFactor::One);
    assert_eq!(s.color_blend.dst_color_factor, BlendFactor::One);
    assert_eq!(s.color_blend.color_blend_op, BlendOp::Add);
}

#[test]
fn test_directional_light_state() {
    let s = state(PassState::DirectionalLight);
    assert!(!s.depth_stencil.depth_test_enable);
    assert!(!s.depth_stencil.stencil_test_enable);
    assert!(s.color_blend.is_additive());
    assert_eq!(s.rasterization.cull_mode, CullMode::Back);
}

#[test]
fn test_blend_only_in_light_passes() {
    for pass in PassState::DRAWING {
        let additive = matches!(pass, PassState::PointLight | PassState::DirectionalLight);
        assert_eq!(state(pass).color_blend.blend_enable, additive, "{}", pass.name());
    }
}
