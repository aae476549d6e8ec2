use crate::math::Frame;
use crate::ray::Ray;
use crate::*;

/// The eye: an orientable frame with a position and a virtual screen held
/// `screen_distance` in front of it. The distance follows from the field of
/// view and the output height, so it is derived, never set directly.
pub struct Camera {
    pub position: P3,
    frame: Frame,
    screen_height: u32,
    screen_distance: f32,
    // direction * screen_distance, refreshed on every fov or facing change
    dir_times_dist: V3,
}

impl Camera {
    pub fn new(screen_height: u32, field_of_view: f32, position: P3) -> Self {
        assert!(screen_height > 0);
        let mut camera = Camera {
            position,
            frame: Frame::default(),
            screen_height,
            screen_distance: 0.0,
            dir_times_dist: V3::new(0.0, 0.0, 0.0),
        };
        camera.set_field_of_view(field_of_view);
        camera
    }

    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        assert!(field_of_view > 0.0 && field_of_view < std::f32::consts::PI);
        self.screen_distance = self.screen_height as f32 / (2.0 * (field_of_view / 2.0).tan());
        self.refresh();
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.frame.rotate_x(angle);
        self.refresh();
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.frame.rotate_y(angle);
        self.refresh();
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.frame.rotate_z(angle);
        self.refresh();
    }

    pub fn rotate_axis(&mut self, axis: &V3, angle: f32) {
        self.frame.rotate_axis(axis, angle);
        self.refresh();
    }

    pub fn set_direction(&mut self, direction: &V3) {
        self.frame.set_direction(direction);
        self.refresh();
    }

    pub fn direction(&self) -> &V3 {
        &self.frame.direction
    }

    pub fn screen_distance(&self) -> f32 {
        self.screen_distance
    }

    /// Primary ray through the screen point `(x, y)`, both coordinates
    /// centered on the screen (x grows rightward, y upward).
    pub fn pixel_ray(&self, x: i32, y: i32) -> Ray {
        let dir = self.frame.horizontal * x as f32
            + self.frame.vertical * y as f32
            + self.dir_times_dist;
        Ray::new(self.position, dir.normalize())
    }

    fn refresh(&mut self) {
        self.dir_times_dist = self.frame.direction * self.screen_distance;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(512, std::f32::consts::FRAC_PI_3, P3::origin())
    }
}
