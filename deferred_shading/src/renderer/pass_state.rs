/// Pass state table
///
/// Each drawing pass bakes its complete fixed-function state into the
/// pipeline of its program, so switching pass means binding another
/// pipeline and no state can leak from one pass into the next.
///
/// | Pass              | Depth test | Depth write | Stencil                         | Blend    | Cull  |
/// |-------------------|------------|-------------|---------------------------------|----------|-------|
/// | Geometry          | on         | on          | off                             | off      | back  |
/// | Stencil           | on         | off         | always; back incr, front decr   | off      | none  |
/// | PointLight        | off        | off         | pass where stencil != 0         | additive | front |
/// | DirectionalLight  | off        | off         | off                             | additive | back  |

use crate::error::{Error, Result};
use crate::graphics_device::{
    ColorBlendState, CompareOp, CullMode, DepthStencilState, FixedFunctionState,
    RasterizationState, StencilOp, StencilOpState,
};

/// The pass a renderer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassState {
    Idle,
    Geometry,
    Stencil,
    PointLight,
    DirectionalLight,
    FinalBlit,
}

impl PassState {
    /// Passes that draw through a program, in frame order
    pub const DRAWING: [PassState; 4] = [
        PassState::Geometry,
        PassState::Stencil,
        PassState::PointLight,
        PassState::DirectionalLight,
    ];

    /// Fixed-function state of a drawing pass, `None` for `Idle` and
    /// `FinalBlit`
    pub fn fixed_function(&self) -> Option<FixedFunctionState> {
        let rasterization = |cull_mode| RasterizationState {
            cull_mode,
            ..RasterizationState::default()
        };

        let state = match self {
            PassState::Idle | PassState::FinalBlit => return None,

            PassState::Geometry => FixedFunctionState {
                rasterization: rasterization(CullMode::Back),
                depth_stencil: DepthStencilState {
                    depth_test_enable: true,
                    depth_write_enable: true,
                    depth_compare_op: CompareOp::Less,
                    stencil_test_enable: false,
                    ..DepthStencilState::default()
                },
                color_blend: ColorBlendState::default(),
            },

            PassState::Stencil => {
                let face = |depth_fail_op| StencilOpState {
                    fail_op: StencilOp::Keep,
                    pass_op: StencilOp::Keep,
                    depth_fail_op,
                    compare_op: CompareOp::Always,
                    compare_mask: 0,
                    write_mask: 0xFF,
                    reference: 0,
                };
                FixedFunctionState {
                    rasterization: rasterization(CullMode::None),
                    depth_stencil: DepthStencilState {
                        depth_test_enable: true,
                        depth_write_enable: false,
                        depth_compare_op: CompareOp::Less,
                        stencil_test_enable: true,
                        front: face(StencilOp::DecrementAndWrap),
                        back: face(StencilOp::IncrementAndWrap),
                    },
                    color_blend: ColorBlendState::default(),
                }
            }

            PassState::PointLight => {
                let face = StencilOpState {
                    fail_op: StencilOp::Keep,
                    pass_op: StencilOp::Keep,
                    depth_fail_op: StencilOp::Keep,
                    compare_op: CompareOp::NotEqual,
                    compare_mask: 0xFF,
                    write_mask: 0,
                    reference: 0,
                };
                FixedFunctionState {
                    rasterization: rasterization(CullMode::Front),
                    depth_stencil: DepthStencilState {
                        depth_test_enable: false,
                        depth_write_enable: false,
                        depth_compare_op: CompareOp::Always,
                        stencil_test_enable: true,
                        front: face,
                        back: face,
                    },
                    color_blend: ColorBlendState::additive(),
                }
            }

            PassState::DirectionalLight => FixedFunctionState {
                rasterization: rasterization(CullMode::Back),
                depth_stencil: DepthStencilState {
                    depth_test_enable: false,
                    depth_write_enable: false,
                    depth_compare_op: CompareOp::Always,
                    stencil_test_enable: false,
                    ..DepthStencilState::default()
                },
                color_blend: ColorBlendState::additive(),
            },
        };
        Some(state)
    }

    /// `fixed_function()` for a pass that must draw
    pub fn pipeline_state(&self) -> Result<FixedFunctionState> {
        self.fixed_function().ok_or_else(|| {
            Error::InvalidResource(format!("pass {:?} has no pipeline state", self))
        })
    }

    /// Lowercase name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            PassState::Idle => "idle",
            PassState::Geometry => "geometry",
            PassState::Stencil => "stencil",
            PassState::PointLight => "point light",
            PassState::DirectionalLight => "directional light",
            PassState::FinalBlit => "final blit",
        }
    }
}

#[cfg(test)]
#[path = "pass_state_tests.rs"]
mod tests;
