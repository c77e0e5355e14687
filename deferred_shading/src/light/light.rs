/// Light sources
///
/// Lights are plain data built by composition: a `Light` holds the color and
/// intensities shared by every kind, `DirectionalLight` adds a direction and
/// `PointLight` adds a position and attenuation.

use glam::{Mat4, Vec3};

/// Threshold the bounding sphere is derived from: the distance at which the
/// brightest channel, attenuated, drops below one 8-bit step.
pub const LIGHT_CUTOFF_LEVELS: f32 = 256.0;

/// Color and intensities common to every light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// RGB color, each channel in [0, 1]
    pub color: Vec3,
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
}

impl Light {
    pub fn new(color: Vec3, ambient_intensity: f32, diffuse_intensity: f32) -> Self {
        Self { color, ambient_intensity, diffuse_intensity }
    }

    /// White light with the given intensities
    pub fn white(ambient_intensity: f32, diffuse_intensity: f32) -> Self {
        Self::new(Vec3::ONE, ambient_intensity, diffuse_intensity)
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::white(0.0, 0.0)
    }
}

/// Light with a direction and no position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub light: Light,
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(light: Light, direction: Vec3) -> Self {
        Self { light, direction }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Light::default(), Vec3::new(-1.0, -1.0, 0.0))
    }
}

/// Distance attenuation `1 / (constant + linear * d + exponent * d^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub exponent: f32,
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, exponent: f32) -> Self {
        Self { constant, linear, exponent }
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

/// Light emitted from a point in all directions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub light: Light,
    pub position: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn new(light: Light, position: Vec3, attenuation: Attenuation) -> Self {
        Self { light, position, attenuation }
    }

    /// Radius beyond which this light's contribution is negligible
    ///
    /// With `m` the brightest color channel, `d` the diffuse intensity,
    /// `l` the linear and `e` the exponent attenuation terms:
    ///
    /// `r = (-l + sqrt(l^2 - 4e(e - 256 m d))) / (2e)`
    ///
    /// Returns `None` when the formula has no usable solution: `e <= 0`, a
    /// negative discriminant, or a result that is not a positive finite
    /// number. The constant attenuation term does not enter the formula.
    pub fn bounding_sphere(&self) -> Option<f32> {
        let max_channel = self.light.color.max_element();
        let Attenuation { linear, exponent, .. } = self.attenuation;

        if exponent <= 0.0 {
            return None;
        }

        let discriminant = linear * linear
            - 4.0 * exponent * (exponent - LIGHT_CUTOFF_LEVELS * max_channel * self.light.diffuse_intensity);
        if discriminant < 0.0 {
            return None;
        }

        let radius = (-linear + discriminant.sqrt()) / (2.0 * exponent);
        (radius.is_finite() && radius > 0.0).then_some(radius)
    }

    /// `bounding_sphere()` with degenerate lights mapped to `0.0`
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_sphere().unwrap_or(0.0)
    }

    /// Model matrix of the unit light-volume sphere: translate to the light,
    /// then scale uniformly by the bounding radius
    pub fn volume_transform(&self, radius: f32) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(radius))
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
