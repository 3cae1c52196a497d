use crate::Uncertain;
use rand::Rng;
use std::f64::consts::PI;

/// Gaussian sampling of uncertain values
impl Uncertain {
    /// Draws one sample from the normal distribution `N(value, uncertainty²)`.
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::Uncertain;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let reading = Uncertain::new(55.2, 5.0);
    /// let sample = reading.sample(&mut rng);
    /// assert!(sample.is_finite());
    /// ```
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        // Box-Muller transform; u1 is drawn from (0, 1] so ln(u1) is finite
        let u1: f64 = 1.0 - rng.random::<f64>();
        let u2: f64 = rng.random::<f64>();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        self.value() + self.uncertainty() * z0
    }

    /// Take a specific number of samples
    pub fn take_samples<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<f64> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}
