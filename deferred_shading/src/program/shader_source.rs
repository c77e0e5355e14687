/// Built-in GLSL sources, keyed by their path under `shaders/`

pub const GEOMETRY_VERT: &str = "geometry/geometry_pass.vert";
pub const GEOMETRY_FRAG: &str = "geometry/geometry_pass.frag";
pub const STENCIL_VERT: &str = "stencil/null_technique.vert";
pub const STENCIL_FRAG: &str = "stencil/null_technique.frag";
pub const LIGHT_VERT: &str = "light/light_pass.vert";
pub const POINT_LIGHT_FRAG: &str = "light/pointlight_pass.frag";
pub const DIR_LIGHT_FRAG: &str = "light/dirlight_pass.frag";

/// Source text of a built-in shader file
pub fn builtin_shader(file: &str) -> Option<&'static str> {
    match file {
        GEOMETRY_VERT => Some(include_str!("../../shaders/geometry/geometry_pass.vert")),
        GEOMETRY_FRAG => Some(include_str!("../../shaders/geometry/geometry_pass.frag")),
        STENCIL_VERT => Some(include_str!("../../shaders/stencil/null_technique.vert")),
        STENCIL_FRAG => Some(include_str!("../../shaders/stencil/null_technique.frag")),
        LIGHT_VERT => Some(include_str!("../../shaders/light/light_pass.vert")),
        POINT_LIGHT_FRAG => Some(include_str!("../../shaders/light/pointlight_pass.frag")),
        DIR_LIGHT_FRAG => Some(include_str!("../../shaders/light/dirlight_pass.frag")),
        _ => None,
    }
}
