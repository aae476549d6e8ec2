use crate::*;

/// Surface description attached to a shape and copied by value into every
/// hit result, so shading never aliases scene state.
///
/// `albedo` carries the four blending weights of the shading model:
/// diffuse, specular, reflective and refractive, in that order. They are ad
/// hoc weights and need not sum to one.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub refractive_index: f32,
    pub albedo: V4,
    pub diffuse_color: RGB,
    pub specular_exponent: f32,
}

impl Material {
    pub fn new(refractive_index: f32, albedo: V4, diffuse_color: RGB, specular_exponent: f32) -> Self {
        assert!(refractive_index > 0.0);
        assert!(specular_exponent >= 0.0);
        Material {
            refractive_index,
            albedo,
            diffuse_color,
            specular_exponent,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material {
            refractive_index: 1.0,
            albedo: V4::new(1.0, 0.0, 0.0, 0.0),
            diffuse_color: RGB::all(0.0),
            specular_exponent: 0.0,
        }
    }
}
