use crate::camera::Camera;
use crate::math;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::*;

use log::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc;
use std::thread;

/// Reflection/refraction recursion limit.
const MAX_DEPTH: u32 = 3;
/// Secondary rays start this far off the surface so they cannot hit it again.
const SELF_HIT_BIAS: f32 = 1e-3;

/// Destination for finished pixels over a fixed width x height grid,
/// row-major with the top row first.
pub trait PixelSink {
    fn set_pixel(&mut self, index: usize, r: f32, g: f32, b: f32, a: f32);
}

/// Owns the scene and the eye, shades one frame at a time. The scene and
/// camera are read-only while a frame is in flight; mutate them between
/// frames only.
pub struct Renderer {
    pub width: u32,
    pub height: u32,
    pub scene: Scene,
    pub eye: Camera,
    nthread: usize,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0);
        Renderer {
            width,
            height,
            scene: Scene::new(),
            eye: Camera::new(height, std::f32::consts::FRAC_PI_3, P3::origin()),
            nthread: num_cpus::get(),
        }
    }

    pub fn set_threads(&mut self, nthread: usize) {
        assert!(nthread > 0);
        self.nthread = nthread;
    }

    /// Shades every pixel once and hands the clamped colors to `sink`.
    /// Rows are dealt to a worker pool off a shared counter; the sink sees
    /// each pixel exactly once, alpha fixed at 1.
    pub fn render_frame<S: PixelSink>(&self, sink: &mut S) {
        let half_w = self.width as i32 / 2;
        let half_h = self.height as i32 / 2;
        let next_row = AtomicU32::new(0);
        let (tx, rx) = mpsc::channel();

        debug!(
            "rendering {}x{} frame on {} threads",
            self.width, self.height, self.nthread
        );
        thread::scope(|s| {
            for _ in 0..self.nthread {
                let tx = tx.clone();
                let next_row = &next_row;
                s.spawn(move || loop {
                    let row = next_row.fetch_add(1, Ordering::Relaxed);
                    if row >= self.height {
                        break;
                    }
                    let y = half_h - row as i32; // top row first
                    let mut colors = Vec::with_capacity(self.width as usize);
                    for col in 0..self.width {
                        let ray = self.eye.pixel_ray(col as i32 - half_w, y);
                        colors.push(self.cast_ray(&ray, 0));
                    }
                    let _ = tx.send((row, colors));
                });
            }
            drop(tx);

            for (row, colors) in rx {
                let base = row as usize * self.width as usize;
                for (col, color) in colors.into_iter().enumerate() {
                    let color = if color.is_finite() {
                        color.clamped()
                    } else {
                        warn!("pixel ({}, {}) is not finite", col, row);
                        RGB::all(0.0)
                    };
                    sink.set_pixel(base + col, color.r, color.g, color.b, 1.0);
                }
            }
        });
    }

    /// Recursive Whitted shading: local diffuse and specular terms plus
    /// reflected and refracted rays, blended by the material's albedo.
    /// Recursion depth is the only termination guarantee.
    fn cast_ray(&self, ray: &Ray, depth: u32) -> RGB {
        let background = RGB::all(0.0);
        if depth >= MAX_DEPTH {
            return background;
        }
        let hit = match self.scene.intersect_nearest(ray) {
            Some(hit) => hit,
            None => return background,
        };
        let material = hit.material;
        let normal = hit.normal;

        let reflect_dir = math::reflect(&ray.dir, &normal).normalize();
        let refract_dir =
            math::refract(&ray.dir, &normal, material.refractive_index, 1.0).normalize();
        let reflect_ray = Ray::new(hit.pos + normal * SELF_HIT_BIAS, reflect_dir);
        let refract_ray = Ray::new(hit.pos - normal * SELF_HIT_BIAS, refract_dir);
        let reflect_color = self.cast_ray(&reflect_ray, depth + 1);
        let refract_color = self.cast_ray(&refract_ray, depth + 1);

        let mut diffuse = 0.0;
        let mut specular = 0.0;
        for light in self.scene.lights() {
            let to_light = light.position - hit.pos;
            let light_dist = to_light.norm();
            let light_dir = to_light / light_dist;

            // shadow ray starts on whichever side of the surface the light is
            let shadow_orig = if light_dir.dot(&normal) < 0.0 {
                hit.pos - normal * SELF_HIT_BIAS
            } else {
                hit.pos + normal * SELF_HIT_BIAS
            };
            let shadow_ray = Ray::new(shadow_orig, light_dir);
            let occluded = self
                .scene
                .intersect_shadow(&shadow_ray)
                .map_or(false, |block| (block.pos - shadow_orig).norm() < light_dist);
            if occluded {
                continue;
            }

            diffuse += light.intensity * light_dir.dot(&normal).max(0.0);
            specular += light.intensity
                * (-math::reflect(&-light_dir, &normal).dot(&ray.dir))
                    .max(0.0)
                    .powf(material.specular_exponent);
        }

        material.diffuse_color * (diffuse * material.albedo.x)
            + RGB::all(1.0) * (specular * material.albedo.y)
            + reflect_color * material.albedo.z
            + refract_color * material.albedo.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::scene::Light;
    use crate::shape::shapes::{Circle, Plane, Sphere};

    fn matte(r: f32, g: f32, b: f32) -> Material {
        Material {
            diffuse_color: RGB::new(r, g, b),
            ..Material::default()
        }
    }

    #[test]
    fn depth_limit_returns_background() {
        let mut renderer = Renderer::new(64, 64);
        renderer
            .scene
            .add_shape(Sphere::new(P3::new(0.0, 0.0, -5.0), 1.0, matte(1.0, 1.0, 1.0)));
        renderer.scene.add_light(Light::new(P3::new(0.0, 10.0, 0.0), 1.5));

        let ray = Ray::new(P3::origin(), V3::new(0.0, 0.0, -1.0));
        assert!(renderer.cast_ray(&ray, 0) != RGB::all(0.0));
        assert_eq!(renderer.cast_ray(&ray, MAX_DEPTH), RGB::all(0.0));
        assert_eq!(renderer.cast_ray(&ray, MAX_DEPTH + 1), RGB::all(0.0));
    }

    #[test]
    fn light_behind_surface_contributes_nothing() {
        // lit from behind through an interposed opaque plane
        let mut renderer = Renderer::new(64, 64);
        renderer.scene.add_shape(Plane::new(
            P3::new(0.0, 0.0, -5.0),
            V3::new(0.0, 0.0, 1.0),
            matte(1.0, 1.0, 1.0),
        ));
        renderer.scene.add_shape(Plane::new(
            P3::new(0.0, 0.0, -7.0),
            V3::new(0.0, 0.0, 1.0),
            matte(1.0, 1.0, 1.0),
        ));
        renderer.scene.add_light(Light::new(P3::new(0.0, 0.0, -10.0), 1.5));

        let ray = Ray::new(P3::origin(), V3::new(0.0, 0.0, -1.0));
        assert_eq!(renderer.cast_ray(&ray, 0), RGB::all(0.0));
    }

    #[test]
    fn occluder_blocks_light() {
        let build = |with_blocker: bool| {
            let mut renderer = Renderer::new(64, 64);
            renderer
                .scene
                .add_shape(Sphere::new(P3::new(0.0, 0.0, -5.0), 1.0, matte(1.0, 1.0, 1.0)));
            if with_blocker {
                // small disc halfway between the hit point and the light
                renderer.scene.add_shape(Circle::new(
                    P3::new(0.0, 1.5, -2.0),
                    0.5,
                    V3::new(0.0, 0.6, 0.8),
                    matte(0.0, 0.0, 0.0),
                ));
            }
            renderer.scene.add_light(Light::new(P3::new(0.0, 3.0, 0.0), 1.0));
            renderer
        };

        let ray = Ray::new(P3::origin(), V3::new(0.0, 0.0, -1.0));
        let lit = build(false).cast_ray(&ray, 0);
        let shadowed = build(true).cast_ray(&ray, 0);
        assert!(lit.r > 0.0);
        assert_eq!(shadowed, RGB::all(0.0));
    }

    #[test]
    fn renders_a_small_frame() {
        let mut renderer = Renderer::new(64, 64);
        renderer.set_threads(2);
        renderer
            .scene
            .add_shape(Sphere::new(P3::new(0.0, 0.0, -8.0), 2.0, matte(0.8, 0.2, 0.2)));
        renderer.scene.add_light(Light::new(P3::new(5.0, 5.0, 0.0), 2.0));

        let mut image = Image::new(64, 64);
        renderer.render_frame(&mut image);

        // sphere covers the center, background the corners
        let center = image.at(32, 32);
        assert!(center.r > 0.0);
        assert_eq!(*image.at(0, 0), RGB::all(0.0));
        // clamped output
        assert!(center.r <= 1.0 && center.g <= 1.0 && center.b <= 1.0);
    }

    #[test]
    fn single_and_multi_thread_agree() {
        let build = || {
            let mut renderer = Renderer::new(32, 32);
            renderer
                .scene
                .add_shape(Sphere::new(P3::new(0.5, -0.2, -6.0), 1.5, matte(0.3, 0.6, 0.9)));
            renderer.scene.add_light(Light::new(P3::new(-4.0, 6.0, 1.0), 1.8));
            renderer
        };

        let mut serial = build();
        serial.set_threads(1);
        let mut parallel = build();
        parallel.set_threads(4);

        let mut a = Image::new(32, 32);
        let mut b = Image::new(32, 32);
        serial.render_frame(&mut a);
        parallel.render_frame(&mut b);
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(a.at(x, y), b.at(x, y));
            }
        }
    }
}
