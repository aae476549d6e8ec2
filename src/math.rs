use crate::*;
use nalgebra::{Unit, UnitQuaternion};

/// Mirrors `incident` about `normal`. Both arguments must be unit vectors;
/// the result has the same magnitude and angle of incidence as the input.
pub fn reflect(incident: &V3, normal: &V3) -> V3 {
    incident - normal * (2.0 * incident.dot(normal))
}

/// Snell's law. `incident` and `normal` must be unit vectors,
/// `eta_transmit` is the refractive index of the medium behind the surface,
/// `eta_incident` the index of the medium the ray travels through.
///
/// When the ray leaves the medium (the incident direction and the normal
/// point the same way) the indices are swapped and the normal flipped.
/// When no transmitted ray exists (total internal reflection) a nominal
/// (1,0,0) is returned; it is not a valid refraction direction and only the
/// blending weights keep it from mattering.
pub fn refract(incident: &V3, normal: &V3, eta_transmit: f32, eta_incident: f32) -> V3 {
    let cos_i = -incident.dot(normal).max(-1.0).min(1.0);
    if cos_i < 0.0 {
        return refract(incident, &-normal, eta_incident, eta_transmit);
    }
    let eta = eta_incident / eta_transmit;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        // no transmission
        V3::new(1.0, 0.0, 0.0)
    } else {
        incident * eta + normal * (eta * cos_i - k.sqrt())
    }
}

pub fn rotate_x(v: &V3, angle: f32) -> V3 {
    UnitQuaternion::from_axis_angle(&V3::x_axis(), angle) * v
}

pub fn rotate_y(v: &V3, angle: f32) -> V3 {
    UnitQuaternion::from_axis_angle(&V3::y_axis(), angle) * v
}

pub fn rotate_z(v: &V3, angle: f32) -> V3 {
    UnitQuaternion::from_axis_angle(&V3::z_axis(), angle) * v
}

/// Rotation of `v` around an arbitrary `axis` (need not be normalized).
/// Length-preserving up to floating point error.
pub fn rotate_axis(v: &V3, axis: &V3, angle: f32) -> V3 {
    UnitQuaternion::from_axis_angle(&Unit::new_normalize(*axis), angle) * v
}

/// Orthonormal screen triad shared by the camera and by oriented planar
/// shapes: `horizontal` and `vertical` span the screen/face, `direction` is
/// the facing. The three vectors are kept mutually orthogonal unit vectors;
/// every rotation and every facing reassignment re-derives all of them
/// together.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    pub horizontal: V3,
    pub vertical: V3,
    pub direction: V3,
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            horizontal: V3::new(1.0, 0.0, 0.0),
            vertical: V3::new(0.0, 1.0, 0.0),
            direction: V3::new(0.0, 0.0, -1.0),
        }
    }
}

impl Frame {
    pub fn from_direction(direction: &V3) -> Self {
        let mut frame = Frame::default();
        frame.set_direction(direction);
        frame
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate(&UnitQuaternion::from_axis_angle(&V3::x_axis(), angle));
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate(&UnitQuaternion::from_axis_angle(&V3::y_axis(), angle));
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.rotate(&UnitQuaternion::from_axis_angle(&V3::z_axis(), angle));
    }

    pub fn rotate_axis(&mut self, axis: &V3, angle: f32) {
        self.rotate(&UnitQuaternion::from_axis_angle(
            &Unit::new_normalize(*axis),
            angle,
        ));
    }

    fn rotate(&mut self, rot: &UnitQuaternion<f32>) {
        self.horizontal = rot * self.horizontal;
        self.vertical = rot * self.vertical;
        self.direction = rot * self.direction;
    }

    /// Points the frame at `direction` (a unit vector) and re-derives both
    /// screen axes in closed form: the axes a default frame would have after
    /// being rotated from (0,0,-1) onto `direction`.
    pub fn set_direction(&mut self, direction: &V3) {
        self.direction = *direction;
        if direction.x == 0.0 && direction.y == 0.0 {
            // facing straight along z, the rotation axis degenerates
            self.vertical = V3::new(0.0, 1.0, 0.0);
            self.horizontal = if direction.z < 0.0 {
                V3::new(1.0, 0.0, 0.0)
            } else {
                V3::new(-1.0, 0.0, 0.0)
            };
        } else {
            let (x, y, z) = (direction.x, direction.y, direction.z);
            let c = (1.0 + z) / (x * x + y * y);
            self.horizontal = V3::new(y * y * c - z, -x * y * c, x);
            self.vertical = V3::new(-x * y * c, x * x * c - z, y);
        }
    }
}

#[test]
fn reflect_preserves_norm() {
    let n = V3::new(0.0, 1.0, 0.0);
    let d = V3::new(1.0, -2.0, 0.5).normalize();
    let r = reflect(&d, &n);
    assert!((r.norm() - d.norm()).abs() < 1e-6);
    assert!((d.dot(&n) + r.dot(&n)).abs() < 1e-6);
}

#[test]
fn refract_through_equal_media() {
    let n = V3::new(0.0, 0.0, 1.0);
    let d = V3::new(0.6, 0.0, -0.8);
    let r = refract(&d, &n, 1.0, 1.0);
    assert!((r - d).norm() < 1e-6);
}

#[test]
fn refract_total_internal_reflection() {
    // grazing exit from a dense medium: k < 0, nominal fallback
    let n = V3::new(0.0, 0.0, 1.0);
    let d = V3::new(0.98, 0.0, 0.199).normalize();
    let r = refract(&d, &n, 1.5, 1.0);
    assert_eq!((r.x, r.y, r.z), (1.0, 0.0, 0.0));
}

#[test]
fn rotation_preserves_length() {
    let v = V3::new(1.0, 2.0, 3.0);
    let axis = V3::new(2.0, -1.0, 0.5);
    let r = rotate_axis(&v, &axis, 1.3);
    assert!((r.norm() - v.norm()).abs() < 1e-5);
    let r = rotate_y(&v, -0.7);
    assert!((r.norm() - v.norm()).abs() < 1e-5);
}

#[test]
fn rotate_y_quarter_turn() {
    let v = V3::new(0.0, 0.0, -1.0);
    let r = rotate_y(&v, std::f32::consts::FRAC_PI_2);
    assert!((r - V3::new(-1.0, 0.0, 0.0)).norm() < 1e-6);
}

#[cfg(test)]
fn assert_orthonormal(frame: &Frame) {
    assert!((frame.horizontal.norm() - 1.0).abs() < 1e-4);
    assert!((frame.vertical.norm() - 1.0).abs() < 1e-4);
    assert!((frame.direction.norm() - 1.0).abs() < 1e-4);
    assert!(frame.horizontal.dot(&frame.vertical).abs() < 1e-4);
    assert!(frame.horizontal.dot(&frame.direction).abs() < 1e-4);
    assert!(frame.vertical.dot(&frame.direction).abs() < 1e-4);
}

#[test]
fn frame_stays_orthonormal_under_random_rotations() {
    use rand::prelude::*;
    let mut rng = SmallRng::seed_from_u64(7);
    let mut frame = Frame::default();
    for _ in 0..200 {
        let angle = rng.gen_range(-3.0, 3.0);
        match rng.gen_range(0, 4) {
            0 => frame.rotate_x(angle),
            1 => frame.rotate_y(angle),
            2 => frame.rotate_z(angle),
            _ => {
                let axis = V3::new(
                    rng.gen_range(-1.0, 1.0),
                    rng.gen_range(-1.0, 1.0),
                    rng.gen_range(0.1, 1.0),
                );
                frame.rotate_axis(&axis, angle)
            }
        }
        assert_orthonormal(&frame);
    }
}

#[test]
fn set_direction_axis_cases() {
    let mut frame = Frame::default();
    frame.set_direction(&V3::new(0.0, 0.0, 1.0));
    assert_eq!(frame.horizontal, V3::new(-1.0, 0.0, 0.0));
    assert_eq!(frame.vertical, V3::new(0.0, 1.0, 0.0));
    frame.set_direction(&V3::new(0.0, 0.0, -1.0));
    assert_eq!(frame.horizontal, V3::new(1.0, 0.0, 0.0));
}

#[test]
fn set_direction_general_case() {
    let mut frame = Frame::default();
    let dir = V3::new(0.6, 0.0, 0.8);
    frame.set_direction(&dir);
    assert_eq!(frame.direction, dir);
    assert_orthonormal(&frame);
    let dir = V3::new(1.0, 2.0, -0.5).normalize();
    frame.set_direction(&dir);
    assert_orthonormal(&frame);
}
