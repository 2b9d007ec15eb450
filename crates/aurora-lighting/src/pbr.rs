//! Cook-Torrance BRDF shared by the planet and cloud shaders.
//!
//! [`PBR_FUNCTIONS_WGSL`] is spliced into those shaders. The test-only `_cpu`
//! functions mirror it so shading can be checked without a GPU.

/// Punctual lights are scaled by π so a white light of intensity 1 fully
/// lights a white Lambertian surface facing it. The surface shader applies
/// the same factor.
#[cfg(test)]
pub(crate) const PUNCTUAL_LIGHT_SCALE: f32 = std::f32::consts::PI;

/// WGSL BRDF helpers. Requires nothing but `PI` from the including shader.
pub const PBR_FUNCTIONS_WGSL: &str = r#"
const PI: f32 = 3.14159265359;

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    return a2 / (PI * denom * denom);
}

fn geometry_schlick_ggx(n_dot: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = (r * r) / 8.0;
    return n_dot / (n_dot * (1.0 - k) + k);
}

fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    return geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness);
}

fn fresnel_schlick(cos_theta: f32, f0: vec3<f32>) -> vec3<f32> {
    return f0 + (1.0 - f0) * pow(clamp(1.0 - cos_theta, 0.0, 1.0), 5.0);
}

fn evaluate_brdf(
    light_dir: vec3<f32>,
    view_dir: vec3<f32>,
    normal: vec3<f32>,
    albedo: vec3<f32>,
    metallic: f32,
    roughness: f32,
    specular_scale: f32,
) -> vec3<f32> {
    let half_vec = normalize(view_dir + light_dir);

    let n_dot_l = max(dot(normal, light_dir), 0.0);
    let n_dot_v = max(dot(normal, view_dir), 0.0);
    let n_dot_h = max(dot(normal, half_vec), 0.0);
    let h_dot_v = max(dot(half_vec, view_dir), 0.0);

    let f0 = mix(vec3<f32>(0.04), albedo, metallic);

    let d = distribution_ggx(n_dot_h, roughness);
    let g = geometry_smith(n_dot_v, n_dot_l, roughness);
    let f = fresnel_schlick(h_dot_v, f0);

    let specular = (d * g * f) / (4.0 * n_dot_v * n_dot_l + 0.0001) * specular_scale;
    let k_d = (vec3<f32>(1.0) - f) * (1.0 - metallic);
    let diffuse = k_d * albedo / PI;

    return (diffuse + specular) * n_dot_l;
}
"#;

/// GGX/Trowbridge-Reitz normal distribution function (CPU reference).
#[cfg(test)]
pub(crate) fn distribution_ggx_cpu(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (std::f32::consts::PI * denom * denom)
}

/// Schlick-GGX geometry function for a single direction (CPU reference).
#[cfg(test)]
pub(crate) fn geometry_schlick_ggx_cpu(n_dot: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = (r * r) / 8.0;
    n_dot / (n_dot * (1.0 - k) + k)
}

/// Smith's method geometry function combining view and light (CPU reference).
#[cfg(test)]
pub(crate) fn geometry_smith_cpu(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx_cpu(n_dot_v, roughness) * geometry_schlick_ggx_cpu(n_dot_l, roughness)
}

/// Schlick Fresnel approximation (CPU reference).
#[cfg(test)]
pub(crate) fn fresnel_schlick_cpu(cos_theta: f32, f0: glam::Vec3) -> glam::Vec3 {
    f0 + (glam::Vec3::ONE - f0) * (1.0 - cos_theta).clamp(0.0, 1.0).powf(5.0)
}

/// Full BRDF evaluation for a single light (CPU reference).
///
/// Returns BRDF × N·L. `specular_scale` is the specular map sample.
#[cfg(test)]
pub(crate) fn evaluate_brdf_cpu(
    light_dir: glam::Vec3,
    view_dir: glam::Vec3,
    normal: glam::Vec3,
    albedo: glam::Vec3,
    metallic: f32,
    roughness: f32,
    specular_scale: f32,
) -> glam::Vec3 {
    let half_vec = (view_dir + light_dir).normalize();
    let n_dot_l = normal.dot(light_dir).max(0.0);
    let n_dot_v = normal.dot(view_dir).max(0.0);
    let n_dot_h = normal.dot(half_vec).max(0.0);
    let h_dot_v = half_vec.dot(view_dir).max(0.0);

    let f0 = glam::Vec3::splat(0.04).lerp(albedo, metallic);
    let d = distribution_ggx_cpu(n_dot_h, roughness);
    let g = geometry_smith_cpu(n_dot_v, n_dot_l, roughness);
    let f = fresnel_schlick_cpu(h_dot_v, f0);

    let specular = (d * g * f) / (4.0 * n_dot_v * n_dot_l + 0.0001) * specular_scale;
    let k_d = (glam::Vec3::ONE - f) * (1.0 - metallic);
    let diffuse = k_d * albedo / std::f32::consts::PI;

    (diffuse + specular) * n_dot_l
}
