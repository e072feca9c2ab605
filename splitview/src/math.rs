pub trait Lerpable: Clone + Copy {
    fn lerp(&self, other: &Self, factor: f64) -> Self;
}

pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);

    t * t * (3.0 - 2.0 * t)
}
