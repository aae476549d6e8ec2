use crate::scene::{Light, Scene};
use crate::shape::shapes::{Circle, Ellipse, Plane, Rectangle, Sphere};
use crate::*;

pub fn ivory() -> Material {
    Material::new(1.0, V4::new(0.6, 0.3, 0.1, 0.0), RGB::new(0.4, 0.4, 0.3), 50.0)
}

pub fn glass() -> Material {
    Material::new(1.5, V4::new(0.0, 0.5, 0.1, 0.8), RGB::new(0.6, 0.7, 0.8), 125.0)
}

pub fn red_rubber() -> Material {
    Material::new(1.0, V4::new(0.9, 0.1, 0.0, 0.0), RGB::new(0.3, 0.1, 0.1), 10.0)
}

pub fn mirror() -> Material {
    Material::new(1.0, V4::new(0.0, 10.0, 0.8, 0.0), RGB::new(1.0, 1.0, 1.0), 1425.0)
}

/// Walls, one of every primitive and two lights. The mirror sphere is the
/// last shape so the demo binary can slide it between frames.
pub fn make_demo() -> Scene {
    let mut scene = Scene::new();

    // walls
    scene.add_shape(Plane::new(
        P3::new(-6.0, 0.0, -20.0),
        V3::new(1.0, 0.0, 0.0),
        red_rubber(),
    ));
    scene.add_shape(Plane::new(
        P3::new(5.0, 0.0, -15.0),
        V3::new(0.0, 0.0, 1.0),
        red_rubber(),
    ));
    scene.add_shape(Plane::new(
        P3::new(0.0, -4.0, 0.0),
        V3::new(0.0, 1.0, 0.0),
        red_rubber(),
    ));

    scene.add_shape(Circle::new(
        P3::new(-3.0, 0.0, -10.0),
        2.0,
        V3::new(0.0, 1.0, 1.0).normalize(),
        ivory(),
    ));
    scene.add_shape(Ellipse::new(
        P3::new(-2.0, 2.0, -12.0),
        P3::new(0.0, 2.0, -12.0),
        1.0,
        V3::new(0.0, 0.0, 1.0),
        ivory(),
    ));
    scene.add_shape(Rectangle::new(
        P3::new(3.0, 0.0, -5.0),
        4.0,
        4.0,
        V3::new(0.0, 0.0, 1.0),
        glass(),
    ));
    scene.add_shape(Sphere::new(P3::new(3.0, 0.0, -10.0), 2.0, mirror()));

    scene.add_light(Light::new(P3::new(-5.0, 10.0, -1.0), 1.5));
    scene.add_light(Light::new(P3::new(5.0, 10.0, -1.0), 1.8));

    scene
}

#[test]
fn demo_scene_is_renderable() {
    use crate::ray::Ray;
    let scene = make_demo();
    assert_eq!(scene.lights().len(), 2);
    // straight ahead hits something well inside the cutoff
    let ray = Ray::new(P3::origin(), V3::new(0.0, 0.0, -1.0));
    let hit = scene.intersect_nearest(&ray).unwrap();
    assert!(hit.dist < scene::DEFAULT_FAR_CUTOFF);
}
