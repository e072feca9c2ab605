use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Vector3};

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, 0.0, 0.0),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            fov,
            near,
            far,
            aspect,
            projection: Matrix4::from_scale(1.0),
        };

        camera.update_projection();
        camera
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Takes effect on the next [`update_projection`](Self::update_projection).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn update_projection(&mut self) {
        self.projection = perspective(Deg(self.fov), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// False when [`view`](Self::view) has no usable basis: the camera sits on
    /// its target or looks along `up`.
    pub fn has_view_basis(&self) -> bool {
        let forward = self.target - self.position;
        if forward.magnitude2() <= f32::EPSILON {
            return false;
        }

        forward.normalize().cross(self.up).magnitude2() > 1e-10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_follows_aspect() {
        let mut camera = PerspectiveCamera::new(45.0, 2.0, 0.1, 100.0);
        let wide = camera.projection();
        assert!((wide.x.x * 2.0 - wide.y.y).abs() < 1e-5);

        camera.set_aspect(0.5);
        assert_eq!(camera.projection(), wide);

        camera.update_projection();
        let tall = camera.projection();
        assert!((tall.x.x * 0.5 - tall.y.y).abs() < 1e-5);
        assert_eq!(tall.y.y, wide.y.y);
    }

    #[test]
    fn view_basis() {
        let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 5.0);
        camera.position = Point3::new(0.0, 0.0, 2.0);
        camera.look_at(Point3::new(0.0, 0.0, 0.0));

        assert!(camera.has_view_basis());
        let origin = camera.view() * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.z + 2.0).abs() < 1e-6);

        // straight down along up
        camera.position = Point3::new(0.0, 10.0, 0.0);
        assert!(!camera.has_view_basis());
        let m = camera.view();
        assert!(m.x.x.is_nan() || m.x.y.is_nan() || m.x.z.is_nan());

        camera.position = Point3::new(0.0, 0.0, 0.0);
        assert!(!camera.has_view_basis());

        camera.position = Point3::new(0.0, 10.0, 0.01);
        assert!(camera.has_view_basis());
    }
}
