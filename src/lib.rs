use nalgebra::{Point3, Vector3, Vector4};

pub type P3 = Point3<f32>;
pub type V3 = Vector3<f32>;
pub type V4 = Vector4<f32>;

pub mod ray {
    use crate::*;
    #[derive(Clone, Debug)]
    pub struct Ray {
        pub origin: P3,
        pub dir: V3,
    }

    impl Ray {
        pub fn new(origin: P3, dir: V3) -> Self {
            Ray { origin, dir }
        }
    }
}

pub mod camera;
pub mod example_scenes;
pub mod image;
pub mod material;
pub mod math;
pub mod renderer;
pub mod rgb;
pub mod scene;
pub mod shape;

pub use crate::material::Material;
pub use crate::rgb::RGB;
