/// Uniform values set by name on the bound pipeline

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Texture unit index handed to a sampler uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureUnit(pub u32);

/// A single uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    UInt(u32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
    Sampler(TextureUnit),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self { UniformValue::Float(v) }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self { UniformValue::Int(v) }
}

impl From<u32> for UniformValue {
    fn from(v: u32) -> Self { UniformValue::UInt(v) }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self { UniformValue::Vec2(v) }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self { UniformValue::Vec3(v) }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self { UniformValue::Vec4(v) }
}

impl From<Mat3> for UniformValue {
    fn from(v: Mat3) -> Self { UniformValue::Mat3(v) }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self { UniformValue::Mat4(v) }
}

impl From<TextureUnit> for UniformValue {
    fn from(v: TextureUnit) -> Self { UniformValue::Sampler(v) }
}
