use crate::ray::Ray;
use crate::*;

/// A successful ray/shape intersection. `dist` is strictly positive and
/// `normal` faces the side the ray arrived from (`normal · dir <= 0`).
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub dist: f32,
    pub pos: P3,
    pub normal: V3,
}

trait ShapeImpl {
    fn intersect(&self, ray: &Ray) -> Option<Hit>;
}

pub mod shapes {
    use super::{Hit, ShapeImpl};
    use crate::math::Frame;
    use crate::ray::Ray;
    use crate::*;

    /// Plane-distance part shared by the whole planar family: where along
    /// the ray the carrier plane is crossed, and the normal facing the ray.
    /// A ray parallel to (or lying in) the plane never hits.
    fn plane_hit(normal: &V3, center: &P3, ray: &Ray) -> Option<(f32, P3, V3)> {
        let cos_dd = normal.dot(&ray.dir);
        if cos_dd == 0.0 {
            return None;
        }
        let dist = normal.dot(&(center - ray.origin)) / cos_dd;
        if dist <= 0.0 {
            return None;
        }
        let pos = ray.origin + ray.dir * dist;
        let facing = if cos_dd < 0.0 { *normal } else { -normal };
        Some((dist, pos, facing))
    }

    #[derive(Clone)]
    pub struct Sphere {
        pub center: P3,
        pub radius: f32,
        pub material: Material,
    }

    impl Sphere {
        pub fn new(center: P3, radius: f32, material: Material) -> Self {
            assert!(radius > 0.0);
            Sphere {
                center,
                radius,
                material,
            }
        }
    }

    impl ShapeImpl for Sphere {
        fn intersect(&self, ray: &Ray) -> Option<Hit> {
            let l = self.center - ray.origin;
            let tca = l.dot(&ray.dir);
            let d_sq = l.dot(&l) - tca * tca;
            if d_sq > self.radius * self.radius {
                return None;
            }
            let thc = (self.radius * self.radius - d_sq).sqrt();
            // thc >= 0, so tca - thc is the nearer root
            let dist = if tca - thc > 0.0 { tca - thc } else { tca + thc };
            if dist <= 0.0 {
                return None;
            }
            let pos = ray.origin + ray.dir * dist;
            // outward normal when the origin is outside, inward when inside
            let normal = if l.dot(&l) >= self.radius * self.radius {
                (pos - self.center).normalize()
            } else {
                (self.center - pos).normalize()
            };
            Some(Hit { dist, pos, normal })
        }
    }

    /// Infinite plane through `center`, facing `normal` (a unit vector).
    #[derive(Clone)]
    pub struct Plane {
        pub center: P3,
        pub normal: V3,
        pub material: Material,
    }

    impl Plane {
        pub fn new(center: P3, normal: V3, material: Material) -> Self {
            Plane {
                center,
                normal,
                material,
            }
        }

        pub fn set_direction(&mut self, normal: &V3) {
            self.normal = *normal;
        }
    }

    impl ShapeImpl for Plane {
        fn intersect(&self, ray: &Ray) -> Option<Hit> {
            plane_hit(&self.normal, &self.center, ray)
                .map(|(dist, pos, normal)| Hit { dist, pos, normal })
        }
    }

    #[derive(Clone)]
    pub struct Circle {
        pub center: P3,
        pub radius: f32,
        pub normal: V3,
        pub material: Material,
    }

    impl Circle {
        pub fn new(center: P3, radius: f32, normal: V3, material: Material) -> Self {
            assert!(radius > 0.0);
            Circle {
                center,
                radius,
                normal,
                material,
            }
        }

        pub fn set_direction(&mut self, normal: &V3) {
            self.normal = *normal;
        }
    }

    impl ShapeImpl for Circle {
        fn intersect(&self, ray: &Ray) -> Option<Hit> {
            let (dist, pos, normal) = plane_hit(&self.normal, &self.center, ray)?;
            if (pos - self.center).norm_squared() <= self.radius * self.radius {
                Some(Hit { dist, pos, normal })
            } else {
                None
            }
        }
    }

    /// Planar ellipse given by its two foci; `center` doubles as the first
    /// focus. A point belongs to it when the sum of its distances to both
    /// foci stays within `focus_distance_sum`.
    #[derive(Clone)]
    pub struct Ellipse {
        pub center: P3,
        pub focus2: P3,
        pub focus_distance_sum: f32,
        pub normal: V3,
        pub material: Material,
    }

    impl Ellipse {
        /// `extra_focus_distance` is added to the distance between the foci,
        /// so the ellipse cannot be constructed empty.
        pub fn new(
            center: P3,
            focus2: P3,
            extra_focus_distance: f32,
            normal: V3,
            material: Material,
        ) -> Self {
            assert!(extra_focus_distance > 0.0);
            let focus_distance_sum = (center - focus2).norm() + extra_focus_distance;
            Ellipse {
                center,
                focus2,
                focus_distance_sum,
                normal,
                material,
            }
        }

        pub fn set_direction(&mut self, normal: &V3) {
            self.normal = *normal;
        }
    }

    impl ShapeImpl for Ellipse {
        fn intersect(&self, ray: &Ray) -> Option<Hit> {
            let (dist, pos, normal) = plane_hit(&self.normal, &self.center, ray)?;
            if (pos - self.center).norm() + (pos - self.focus2).norm() <= self.focus_distance_sum {
                Some(Hit { dist, pos, normal })
            } else {
                None
            }
        }
    }

    /// Oriented rectangle. Its screen axes are not free parameters: they are
    /// re-derived from the facing by the frame whenever the facing changes.
    #[derive(Clone)]
    pub struct Rectangle {
        pub center: P3,
        pub width: f32,
        pub height: f32,
        pub material: Material,
        frame: Frame,
    }

    impl Rectangle {
        pub fn new(center: P3, width: f32, height: f32, normal: V3, material: Material) -> Self {
            assert!(width > 0.0);
            assert!(height > 0.0);
            Rectangle {
                center,
                width,
                height,
                material,
                frame: Frame::from_direction(&normal),
            }
        }

        pub fn frame(&self) -> &Frame {
            &self.frame
        }

        pub fn set_direction(&mut self, normal: &V3) {
            self.frame.set_direction(normal);
        }

        pub fn rotate_x(&mut self, angle: f32) {
            self.frame.rotate_x(angle);
        }

        pub fn rotate_y(&mut self, angle: f32) {
            self.frame.rotate_y(angle);
        }

        pub fn rotate_z(&mut self, angle: f32) {
            self.frame.rotate_z(angle);
        }

        pub fn rotate_axis(&mut self, axis: &V3, angle: f32) {
            self.frame.rotate_axis(axis, angle);
        }
    }

    impl ShapeImpl for Rectangle {
        fn intersect(&self, ray: &Ray) -> Option<Hit> {
            let (dist, pos, normal) = plane_hit(&self.frame.direction, &self.center, ray)?;
            let from_center = pos - self.center;
            let h = from_center.dot(&self.frame.horizontal);
            let v = from_center.dot(&self.frame.vertical);
            if h.abs() <= self.width / 2.0 && v.abs() <= self.height / 2.0 {
                Some(Hit { dist, pos, normal })
            } else {
                None
            }
        }
    }
}

#[derive(Clone)]
pub enum Shape {
    Sphere(shapes::Sphere),
    Plane(shapes::Plane),
    Circle(shapes::Circle),
    Ellipse(shapes::Ellipse),
    Rectangle(shapes::Rectangle),
}

impl From<shapes::Sphere> for Shape {
    fn from(s: shapes::Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<shapes::Plane> for Shape {
    fn from(s: shapes::Plane) -> Self {
        Shape::Plane(s)
    }
}

impl From<shapes::Circle> for Shape {
    fn from(s: shapes::Circle) -> Self {
        Shape::Circle(s)
    }
}

impl From<shapes::Ellipse> for Shape {
    fn from(s: shapes::Ellipse) -> Self {
        Shape::Ellipse(s)
    }
}

impl From<shapes::Rectangle> for Shape {
    fn from(s: shapes::Rectangle) -> Self {
        Shape::Rectangle(s)
    }
}

use Shape::*;
impl Shape {
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Sphere(s) => s.intersect(ray),
            Plane(s) => s.intersect(ray),
            Circle(s) => s.intersect(ray),
            Ellipse(s) => s.intersect(ray),
            Rectangle(s) => s.intersect(ray),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Sphere(s) => &s.material,
            Plane(s) => &s.material,
            Circle(s) => &s.material,
            Ellipse(s) => &s.material,
            Rectangle(s) => &s.material,
        }
    }

    /// Refaces a planar shape; spheres are rotation invariant and ignore it.
    pub fn set_direction(&mut self, direction: &V3) {
        match self {
            Sphere(_) => {}
            Plane(s) => s.set_direction(direction),
            Circle(s) => s.set_direction(direction),
            Ellipse(s) => s.set_direction(direction),
            Rectangle(s) => s.set_direction(direction),
        }
    }

    pub fn rotate_x(&mut self, angle: f32) {
        match self {
            Sphere(_) => {}
            Plane(s) => s.normal = math::rotate_x(&s.normal, angle),
            Circle(s) => s.normal = math::rotate_x(&s.normal, angle),
            Ellipse(s) => s.normal = math::rotate_x(&s.normal, angle),
            Rectangle(s) => s.rotate_x(angle),
        }
    }

    pub fn rotate_y(&mut self, angle: f32) {
        match self {
            Sphere(_) => {}
            Plane(s) => s.normal = math::rotate_y(&s.normal, angle),
            Circle(s) => s.normal = math::rotate_y(&s.normal, angle),
            Ellipse(s) => s.normal = math::rotate_y(&s.normal, angle),
            Rectangle(s) => s.rotate_y(angle),
        }
    }

    pub fn rotate_z(&mut self, angle: f32) {
        match self {
            Sphere(_) => {}
            Plane(s) => s.normal = math::rotate_z(&s.normal, angle),
            Circle(s) => s.normal = math::rotate_z(&s.normal, angle),
            Ellipse(s) => s.normal = math::rotate_z(&s.normal, angle),
            Rectangle(s) => s.rotate_z(angle),
        }
    }

    pub fn rotate_axis(&mut self, axis: &V3, angle: f32) {
        match self {
            Sphere(_) => {}
            Plane(s) => s.normal = math::rotate_axis(&s.normal, axis, angle),
            Circle(s) => s.normal = math::rotate_axis(&s.normal, axis, angle),
            Ellipse(s) => s.normal = math::rotate_axis(&s.normal, axis, angle),
            Rectangle(s) => s.rotate_axis(axis, angle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::shapes::{Circle, Ellipse, Plane, Rectangle, Sphere};
    use super::Shape;
    use crate::ray::Ray;
    use crate::*;

    #[test]
    fn sphere_head_on() {
        let sphere = Sphere::new(P3::new(0.0, 0.0, -5.0), 1.0, Material::default());
        let ray = Ray::new(P3::origin(), V3::new(0.0, 0.0, -1.0));
        let hit = Shape::from(sphere).intersect(&ray).unwrap();
        // nearer root of tca +- thc
        assert!((hit.dist - 4.0).abs() < 1e-5);
        assert!((hit.pos - P3::new(0.0, 0.0, -4.0)).norm() < 1e-5);
        assert!((hit.normal.dot(&ray.dir) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_from_inside() {
        let sphere = Sphere::new(P3::new(0.0, 0.0, -5.0), 1.0, Material::default());
        let ray = Ray::new(P3::new(0.0, 0.0, -5.0), V3::new(0.0, 0.0, -1.0));
        let hit = Shape::from(sphere).intersect(&ray).unwrap();
        assert!((hit.dist - 1.0).abs() < 1e-5);
        // inward normal still faces the ray
        assert!(hit.normal.dot(&ray.dir) <= 0.0);
    }

    #[test]
    fn sphere_behind_origin() {
        let sphere = Sphere::new(P3::new(0.0, 0.0, 5.0), 1.0, Material::default());
        let ray = Ray::new(P3::origin(), V3::new(0.0, 0.0, -1.0));
        assert!(Shape::from(sphere).intersect(&ray).is_none());
    }

    #[test]
    fn plane_parallel_ray_misses() {
        let plane = Plane::new(
            P3::new(0.0, -1.0, 0.0),
            V3::new(0.0, 1.0, 0.0),
            Material::default(),
        );
        let ray = Ray::new(P3::origin(), V3::new(1.0, 0.0, 0.0));
        assert!(Shape::from(plane).intersect(&ray).is_none());
    }

    #[test]
    fn plane_back_face_normal_flips() {
        let plane = Plane::new(
            P3::new(0.0, 0.0, -5.0),
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
        let shape = Shape::from(plane);

        let front = Ray::new(P3::origin(), V3::new(0.0, 0.0, -1.0));
        let hit = shape.intersect(&front).unwrap();
        assert_eq!(hit.normal, V3::new(0.0, 0.0, 1.0));

        let back = Ray::new(P3::new(0.0, 0.0, -10.0), V3::new(0.0, 0.0, 1.0));
        let hit = shape.intersect(&back).unwrap();
        assert_eq!(hit.normal, V3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn circle_bounds() {
        let circle = Circle::new(
            P3::new(0.0, 0.0, -5.0),
            1.0,
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
        let shape = Shape::from(circle);
        let inside = Ray::new(P3::new(0.5, 0.0, 0.0), V3::new(0.0, 0.0, -1.0));
        assert!(shape.intersect(&inside).is_some());
        let outside = Ray::new(P3::new(2.0, 0.0, 0.0), V3::new(0.0, 0.0, -1.0));
        assert!(shape.intersect(&outside).is_none());
    }

    #[test]
    fn ellipse_bounds() {
        // foci 2 apart, distance sum 3
        let ellipse = Ellipse::new(
            P3::new(-1.0, 0.0, -5.0),
            P3::new(1.0, 0.0, -5.0),
            1.0,
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
        assert!((ellipse.focus_distance_sum - 3.0).abs() < 1e-5);
        let shape = Shape::from(ellipse);
        let inside = Ray::new(P3::new(0.0, 1.0, 0.0), V3::new(0.0, 0.0, -1.0));
        assert!(shape.intersect(&inside).is_some());
        let outside = Ray::new(P3::new(0.0, 1.2, 0.0), V3::new(0.0, 0.0, -1.0));
        assert!(shape.intersect(&outside).is_none());
    }

    #[test]
    fn rectangle_bounds() {
        let rect = Rectangle::new(
            P3::new(0.0, 0.0, -5.0),
            4.0,
            2.0,
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
        let shape = Shape::from(rect);
        let inside = Ray::new(P3::new(1.9, 0.9, 0.0), V3::new(0.0, 0.0, -1.0));
        assert!(shape.intersect(&inside).is_some());
        let too_wide = Ray::new(P3::new(2.1, 0.0, 0.0), V3::new(0.0, 0.0, -1.0));
        assert!(shape.intersect(&too_wide).is_none());
        let too_high = Ray::new(P3::new(0.0, 1.1, 0.0), V3::new(0.0, 0.0, -1.0));
        assert!(shape.intersect(&too_high).is_none());
    }

    #[test]
    fn rectangle_axes_follow_direction() {
        let mut rect = Rectangle::new(
            P3::origin(),
            2.0,
            2.0,
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
        rect.set_direction(&V3::new(1.0, 0.0, 0.0));
        let frame = rect.frame();
        assert!(frame.horizontal.dot(&frame.vertical).abs() < 1e-5);
        assert!(frame.horizontal.dot(&frame.direction).abs() < 1e-5);
        assert!((frame.horizontal.norm() - 1.0).abs() < 1e-5);
        assert!((frame.vertical.norm() - 1.0).abs() < 1e-5);

        // now faces +x, so a ray along -x should hit it
        let ray = Ray::new(P3::new(5.0, 0.0, 0.0), V3::new(-1.0, 0.0, 0.0));
        let hit = Shape::from(rect).intersect(&ray).unwrap();
        assert!((hit.dist - 5.0).abs() < 1e-5);
    }

    #[test]
    fn rectangle_axes_survive_rotations() {
        let mut rect = Rectangle::new(
            P3::origin(),
            2.0,
            1.0,
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
        rect.rotate_x(0.4);
        rect.rotate_y(-1.1);
        rect.rotate_axis(&V3::new(1.0, 1.0, 1.0), 2.0);
        let frame = rect.frame();
        assert!(frame.horizontal.dot(&frame.vertical).abs() < 1e-4);
        assert!(frame.vertical.dot(&frame.direction).abs() < 1e-4);
        assert!((frame.horizontal.norm() - 1.0).abs() < 1e-4);
    }

    #[test]
    #[should_panic]
    fn sphere_rejects_zero_radius() {
        Sphere::new(P3::origin(), 0.0, Material::default());
    }

    #[test]
    #[should_panic]
    fn rectangle_rejects_degenerate_width() {
        Rectangle::new(
            P3::origin(),
            0.0,
            1.0,
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
    }

    #[test]
    #[should_panic]
    fn ellipse_rejects_empty_construction() {
        Ellipse::new(
            P3::origin(),
            P3::new(2.0, 0.0, 0.0),
            0.0,
            V3::new(0.0, 0.0, 1.0),
            Material::default(),
        );
    }
}
