use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector3};

use crate::camera::PerspectiveCamera;

const MIN_POLAR: f32 = 1e-4;

/// Orbits a camera around a target point.
///
/// Keeps the camera offset in spherical coordinates: `theta` is the azimuth
/// around +Y measured from +Z, `phi` the polar angle from +Y.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    radius: f32,
    theta: f32,
    phi: f32,
}

impl OrbitControls {
    pub fn new(camera: &PerspectiveCamera, target: Point3<f32>) -> Self {
        let offset = camera.position - target;
        let radius = offset.magnitude();

        let (theta, phi) = if radius == 0.0 {
            (0.0, PI / 2.0)
        } else {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        };

        Self {
            target,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            radius,
            theta,
            phi: phi.clamp(MIN_POLAR, PI - MIN_POLAR),
        }
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Rotates by a pointer drag of `(dx, dy)` pixels inside a view that is
    /// `view_height` pixels tall. A drag over the full height is one turn.
    pub fn rotate(&mut self, dx: f64, dy: f64, view_height: f64) {
        if view_height <= 0.0 {
            return;
        }

        let turn = 2.0 * PI * self.rotate_speed / view_height as f32;

        self.theta -= dx as f32 * turn;
        self.phi = (self.phi - dy as f32 * turn).clamp(MIN_POLAR, PI - MIN_POLAR);
    }

    /// Positive steps move the camera closer to the target.
    pub fn zoom(&mut self, steps: f32) {
        let scale = 0.95_f32.powf(self.zoom_speed * steps);

        self.radius = (self.radius * scale).clamp(self.min_distance, self.max_distance);
    }

    pub fn update(&self, camera: &mut PerspectiveCamera) {
        let offset = Vector3::new(
            self.radius * self.phi.sin() * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.cos(),
        );

        camera.position = self.target + offset;
        camera.look_at(self.target);
    }
}
