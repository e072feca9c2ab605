use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Cellular noise: distance to the nearest feature point, one feature point
/// per unit cell picked from a seeded table.
pub struct WorleyTexture2D {
    scale: f64,
    randoms: Vec<(f64, f64)>,
}

impl WorleyTexture2D {
    pub fn new(scale: f64, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let randoms = (0..256)
            .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
            .collect();

        Self { scale, randoms }
    }

    pub fn sample(&self, u: f64, v: f64) -> f64 {
        let (x, y) = (u * self.scale, v * self.scale);

        let mut dist = 3.0_f64;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let cx = x.floor() as i32 + dx;
                let cy = y.floor() as i32 + dy;

                let cell = ((cx & 255) as usize ^ ((cy * 31) & 255) as usize) & 255;

                let (px, py) = self.randoms[cell];
                let (px, py) = (px + cx as f64, py + cy as f64);

                let d = ((px - x).powi(2) + (py - y).powi(2)).sqrt();

                dist = dist.min(d);
            }
        }

        dist
    }
}
