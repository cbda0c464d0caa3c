//! GLSL ES 3.00 sources for the toon meshes and the particle points.

/// Attribute slot for positions in both programs
pub const POSITION_LOCATION: u32 = 0;
/// Attribute slot for normals in the mesh program
pub const NORMAL_LOCATION: u32 = 1;

/// Bytes per interleaved mesh vertex: position + normal
pub const MESH_STRIDE: i32 = 6 * 4;

pub const TOON_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_normal;

void main() {
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

/// Tone = gradient sampled at `dot(N, L) * 0.5 + 0.5`, or two bands split at
/// 0.7 while no gradient is bound
pub const TOON_FRAGMENT: &str = r#"#version 300 es
precision mediump float;

in vec3 v_normal;

uniform vec3 u_color;
uniform vec3 u_light_color;
uniform float u_light_intensity;
uniform vec3 u_light_direction;
uniform sampler2D u_gradient;
uniform bool u_has_gradient;

out vec4 out_color;

void main() {
    float coord = dot(normalize(v_normal), u_light_direction) * 0.5 + 0.5;
    float tone = u_has_gradient
        ? texture(u_gradient, vec2(coord, 0.5)).r
        : (coord < 0.7 ? 0.7 : 1.0);
    out_color = vec4(u_color * u_light_color * u_light_intensity * tone, 1.0);
}
"#;

/// With attenuation the point size is `size * scale / -z`, scale being half
/// the canvas height
pub const POINTS_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;

uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_scale;
uniform bool u_attenuate;

void main() {
    vec4 view_position = u_view * vec4(a_position, 1.0);
    gl_PointSize = u_attenuate ? u_size * (u_scale / -view_position.z) : u_size;
    gl_Position = u_projection * view_position;
}
"#;

pub const POINTS_FRAGMENT: &str = r#"#version 300 es
precision mediump float;

uniform vec3 u_color;

out vec4 out_color;

void main() {
    out_color = vec4(u_color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_declare_es3() {
        for source in [TOON_VERTEX, TOON_FRAGMENT, POINTS_VERTEX, POINTS_FRAGMENT] {
            assert!(source.starts_with("#version 300 es\n"));
        }
    }

    #[test]
    fn test_attribute_locations_match_layout() {
        assert!(TOON_VERTEX.contains(&format!("location = {}) in vec3 a_position", POSITION_LOCATION)));
        assert!(TOON_VERTEX.contains(&format!("location = {}) in vec3 a_normal", NORMAL_LOCATION)));
        assert!(POINTS_VERTEX.contains(&format!("location = {}) in vec3 a_position", POSITION_LOCATION)));
    }
}
