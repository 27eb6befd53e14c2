use bevy_ecs::prelude::Resource;

/// Seeded random source for spawn probabilities and spins.
///
/// Every random decision in the pipeline goes through this resource so a run
/// is reproducible from its seed.
#[derive(Resource, Clone, Debug)]
pub struct SimRng {
    pub rng: fastrand::Rng,
    pub seed: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            seed,
        }
    }

    /// True with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f32) -> bool {
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 {
            return false;
        }
        self.rng.f32() < p
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.rng.f32() * std::f32::consts::TAU
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::new(42)
    }
}
