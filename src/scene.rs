use crate::ray::Ray;
use crate::shape::{Hit, Shape};
use crate::*;

/// Point light source.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub position: P3,
    pub intensity: f32,
}

impl Light {
    pub fn new(position: P3, intensity: f32) -> Self {
        assert!(intensity >= 0.0);
        Light {
            position,
            intensity,
        }
    }
}

/// Any globally-nearest hit at or beyond this distance counts as a miss.
/// A background check, not a physically meaningful far plane.
pub const DEFAULT_FAR_CUTOFF: f32 = 1000.0;

/// A scene hit with the surface description copied out of the shape.
pub struct SceneHit {
    pub dist: f32,
    pub pos: P3,
    pub normal: V3,
    pub material: Material,
}

/// Shapes and lights, appended during setup and scanned linearly per query.
pub struct Scene {
    shapes: Vec<Shape>,
    lights: Vec<Light>,
    far_cutoff: f32,
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            shapes: vec![],
            lights: vec![],
            far_cutoff: DEFAULT_FAR_CUTOFF,
        }
    }

    pub fn with_far_cutoff(mut self, far_cutoff: f32) -> Self {
        assert!(far_cutoff > 0.0);
        self.far_cutoff = far_cutoff;
        self
    }

    pub fn add_shape<S: Into<Shape>>(&mut self, shape: S) {
        self.shapes.push(shape.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// For rotation/redirection between frames only; a frame in flight
    /// borrows the scene shared.
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn intersect_nearest(&self, ray: &Ray) -> Option<SceneHit> {
        let mut nearest: Option<(Hit, &Material)> = None;
        for shape in &self.shapes {
            if let Some(hit) = shape.intersect(ray) {
                if nearest.as_ref().map_or(true, |(h, _)| hit.dist < h.dist) {
                    nearest = Some((hit, shape.material()));
                }
            }
        }
        nearest
            .filter(|(hit, _)| hit.dist < self.far_cutoff)
            .map(|(hit, material)| SceneHit {
                dist: hit.dist,
                pos: hit.pos,
                normal: hit.normal,
                material: *material,
            })
    }

    /// Shadow-ray variant: only existence and position matter, so the
    /// material lookup is skipped.
    pub fn intersect_shadow(&self, ray: &Ray) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;
        for shape in &self.shapes {
            if let Some(hit) = shape.intersect(ray) {
                if nearest.as_ref().map_or(true, |h| hit.dist < h.dist) {
                    nearest = Some(hit);
                }
            }
        }
        nearest.filter(|hit| hit.dist < self.far_cutoff)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
