/// Pipeline trait and fixed-function state
///
/// A pipeline bakes a vertex/fragment shader pair together with every piece
/// of fixed-function state the pass needs (culling, depth, two-sided stencil,
/// blending). Nothing is inherited from a previously bound pipeline.

use std::sync::Arc;
use bitflags::bitflags;
use crate::graphics_device::{RenderPass, Shader, TextureFormat};

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
}

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    /// Size of one index in bytes
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// One vertex attribute inside a binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAttribute {
    /// Shader location
    pub location: u32,
    pub format: TextureFormat,
    /// Byte offset inside the vertex
    pub offset: u32,
}

/// Vertex layout (single interleaved binding)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexLayout {
    /// Vertex size in bytes
    pub stride: u32,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Tightly packed `vec3` positions at location 0
    pub fn positions_only() -> Self {
        Self {
            stride: 12,
            attributes: vec![VertexAttribute {
                location: 0,
                format: TextureFormat::R32G32B32_SFLOAT,
                offset: 0,
            }],
        }
    }

    /// Interleaved position (location 0), texture coordinate (1) and normal (2)
    pub fn position_uv_normal() -> Self {
        Self {
            stride: 32,
            attributes: vec![
                VertexAttribute { location: 0, format: TextureFormat::R32G32B32_SFLOAT, offset: 0 },
                VertexAttribute { location: 1, format: TextureFormat::R32G32_SFLOAT, offset: 12 },
                VertexAttribute { location: 2, format: TextureFormat::R32G32B32_SFLOAT, offset: 20 },
            ],
        }
    }
}

// ===== RASTERIZATION =====

/// Which faces are discarded before rasterization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Winding order of front faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

/// Rasterization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizationState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            front_face: FrontFace::CounterClockwise,
        }
    }
}

// ===== DEPTH/STENCIL =====

/// Comparison function for depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Operation applied to the stencil value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrementAndClamp,
    DecrementAndClamp,
    Invert,
    IncrementAndWrap,
    DecrementAndWrap,
}

/// Stencil behavior for one face orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilOpState {
    /// Applied when the stencil test fails
    pub fail_op: StencilOp,
    /// Applied when both stencil and depth tests pass
    pub pass_op: StencilOp,
    /// Applied when the stencil test passes and the depth test fails
    pub depth_fail_op: StencilOp,
    pub compare_op: CompareOp,
    pub compare_mask: u32,
    pub write_mask: u32,
    pub reference: u32,
}

impl Default for StencilOpState {
    fn default() -> Self {
        Self {
            fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            compare_op: CompareOp::Always,
            compare_mask: 0xFF,
            write_mask: 0xFF,
            reference: 0,
        }
    }
}

/// Depth and two-sided stencil state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: CompareOp,
    pub stencil_test_enable: bool,
    /// Ops for front-facing primitives
    pub front: StencilOpState,
    /// Ops for back-facing primitives
    pub back: StencilOpState,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: CompareOp::Less,
            stencil_test_enable: false,
            front: StencilOpState::default(),
            back: StencilOpState::default(),
        }
    }
}

// ===== COLOR BLEND =====

/// Blend factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

bitflags! {
    /// Channels written to color attachments
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColorWriteMask: u8 {
        const R = 1 << 0;
        const G = 1 << 1;
        const B = 1 << 2;
        const A = 1 << 3;
        const ALL = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

/// Color blend state, applied to every color attachment of the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlendState {
    pub blend_enable: bool,
    pub src_color_factor: BlendFactor,
    pub dst_color_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_factor: BlendFactor,
    pub dst_alpha_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
    pub color_write_mask: ColorWriteMask,
}

impl ColorBlendState {
    /// `dst = src + dst` on every channel
    pub fn additive() -> Self {
        Self {
            blend_enable: true,
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::One,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::One,
            alpha_blend_op: BlendOp::Add,
            color_write_mask: ColorWriteMask::ALL,
        }
    }

    /// True when the state is exactly one-plus-one addition
    pub fn is_additive(&self) -> bool {
        self.blend_enable
            && self.src_color_factor == BlendFactor::One
            && self.dst_color_factor == BlendFactor::One
            && self.color_blend_op == BlendOp::Add
    }
}

impl Default for ColorBlendState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
            color_write_mask: ColorWriteMask::ALL,
        }
    }
}

// ===== FIXED-FUNCTION BUNDLE =====

/// Every piece of fixed-function state a pipeline bakes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedFunctionState {
    pub rasterization: RasterizationState,
    pub depth_stencil: DepthStencilState,
    pub color_blend: ColorBlendState,
}

// ===== PIPELINE =====

/// Descriptor for creating a graphics pipeline
#[derive(Clone)]
pub struct PipelineDesc<'a> {
    /// Debug label (program name)
    pub label: &'a str,
    pub vertex_shader: Arc<dyn Shader>,
    pub fragment_shader: Arc<dyn Shader>,
    pub vertex_layout: VertexLayout,
    pub topology: PrimitiveTopology,
    pub fixed_function: FixedFunctionState,
    /// Render pass the pipeline draws into
    pub render_pass: &'a Arc<dyn RenderPass>,
}

/// Graphics pipeline (a linked program plus its fixed-function state)
pub trait Pipeline: Send + Sync {
    /// Label given at creation
    fn label(&self) -> &str;

    /// Fixed-function state baked at creation
    fn fixed_function(&self) -> &FixedFunctionState;
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
