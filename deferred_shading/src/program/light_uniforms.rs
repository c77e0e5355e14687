/// Uniform struct layouts of the light types
///
/// `<name>.light.color`, `<name>.light.ambient_intensity`,
/// `<name>.light.diffuse_intensity`, then `<name>.direction` for directional
/// lights or `<name>.position` and `<name>.atten.{constant,linear,exponent}`
/// for point lights.

use crate::error::Result;
use crate::light::{Attenuation, DirectionalLight, Light, PointLight};
use crate::program::{ActiveProgram, UniformStruct};

impl UniformStruct for Light {
    fn write_uniforms(&self, name: &str, program: &mut ActiveProgram<'_>) -> Result<()> {
        program.set_uniform(&format!("{}.color", name), self.color)?;
        program.set_uniform(&format!("{}.ambient_intensity", name), self.ambient_intensity)?;
        program.set_uniform(&format!("{}.diffuse_intensity", name), self.diffuse_intensity)
    }
}

impl UniformStruct for Attenuation {
    fn write_uniforms(&self, name: &str, program: &mut ActiveProgram<'_>) -> Result<()> {
        program.set_uniform(&format!("{}.constant", name), self.constant)?;
        program.set_uniform(&format!("{}.linear", name), self.linear)?;
        program.set_uniform(&format!("{}.exponent", name), self.exponent)
    }
}

impl UniformStruct for DirectionalLight {
    fn write_uniforms(&self, name: &str, program: &mut ActiveProgram<'_>) -> Result<()> {
        program.set_struct(&format!("{}.light", name), &self.light)?;
        program.set_uniform(&format!("{}.direction", name), self.direction)
    }
}

impl UniformStruct for PointLight {
    fn write_uniforms(&self, name: &str, program: &mut ActiveProgram<'_>) -> Result<()> {
        program.set_struct(&format!("{}.light", name), &self.light)?;
        program.set_uniform(&format!("{}.position", name), self.position)?;
        program.set_struct(&format!("{}.atten", name), &self.attenuation)
    }
}
