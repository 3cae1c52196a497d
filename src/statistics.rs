#![allow(clippy::cast_precision_loss)]

use crate::Uncertain;
use crate::error::{Result, UncertainError};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Combines measurements of the same quantity with inverse-variance weights `1/u²`.
///
/// The value is the weighted mean of the values. The uncertainty is the weighted mean
/// of the uncertainties, with the same weights. This is not `1/√Σw`, the textbook
/// uncertainty of an inverse-variance weighted mean; existing results depend on the
/// weighted-mean form.
///
/// # Errors
/// Returns [`UncertainError::EmptyData`] for an empty input and
/// [`UncertainError::InvalidWeights`] when a measurement has zero uncertainty or the
/// weights sum to zero (every uncertainty infinite).
///
/// # Example
/// ```rust
/// use errprop_rs::{Uncertain, weighted_average};
///
/// let readings = [Uncertain::new(5.0, 1.0), Uncertain::new(6.0, 1.0), Uncertain::new(7.0, 1.0)];
/// let combined = weighted_average(&readings).unwrap();
/// assert!((combined.value() - 6.0).abs() < 1e-12);
/// assert!((combined.uncertainty() - 1.0).abs() < 1e-12);
/// ```
pub fn weighted_average<'a, I>(values: I) -> Result<Uncertain>
where
    I: IntoIterator<Item = &'a Uncertain>,
{
    let mut weight_sum = 0.0;
    let mut value_sum = 0.0;
    let mut uncertainty_sum = 0.0;
    let mut count = 0_usize;

    for (index, measurement) in values.into_iter().enumerate() {
        let (value, uncertainty) = measurement.into_parts();
        if uncertainty == 0.0 {
            return Err(UncertainError::invalid_weights(format!(
                "measurement {index} has zero uncertainty"
            )));
        }
        let weight = uncertainty.powi(-2);
        weight_sum += weight;
        value_sum += weight * value;
        uncertainty_sum += weight * uncertainty;
        count += 1;
    }

    if count == 0 {
        return Err(UncertainError::EmptyData);
    }
    if weight_sum == 0.0 {
        return Err(UncertainError::invalid_weights("weights sum to zero"));
    }
    tracing::debug!(count, weight_sum, "combined measurements");
    Ok(Uncertain::new(
        value_sum / weight_sum,
        uncertainty_sum / weight_sum,
    ))
}

/// Monte Carlo estimate of a function of independent uncertain inputs.
///
/// Every input is sampled from its normal distribution; the function is evaluated on
/// each joint sample. The result is the sample mean and sample standard deviation.
/// For nearly linear functions it agrees with the closed-form propagation, so it
/// serves as a cross-check of the first-order formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarlo {
    /// Number of joint samples to draw
    pub samples: usize,
    /// Seed for reproducible estimates; `None` seeds from the thread RNG
    pub seed: Option<u64>,
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self {
            samples: 10_000,
            seed: None,
        }
    }
}

impl MonteCarlo {
    /// Estimates `function(inputs)` by sampling.
    ///
    /// `function` receives one sampled value per input, in input order.
    ///
    /// # Errors
    /// Returns [`UncertainError::InvalidSampleCount`] when fewer than two samples are
    /// configured.
    ///
    /// # Example
    /// ```rust
    /// use errprop_rs::{Uncertain, statistics::MonteCarlo};
    ///
    /// let config = MonteCarlo { samples: 5_000, seed: Some(3) };
    /// let x = Uncertain::new(10.0, 0.1);
    /// let estimate = config.estimate(&[x], |s| 2.0 * s[0]).unwrap();
    /// assert!((estimate.value() - 20.0).abs() < 0.05);
    /// ```
    pub fn estimate<F>(&self, inputs: &[Uncertain], mut function: F) -> Result<Uncertain>
    where
        F: FnMut(&[f64]) -> f64,
    {
        if self.samples < 2 {
            return Err(UncertainError::invalid_sample_count(
                self.samples,
                "at least two samples are required",
            ));
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut draw = vec![0.0; inputs.len()];
        let results: Vec<f64> = (0..self.samples)
            .map(|_| {
                for (slot, input) in draw.iter_mut().zip(inputs) {
                    *slot = input.sample(&mut rng);
                }
                function(&draw)
            })
            .collect();

        let n = results.len() as f64;
        let mean = results.iter().sum::<f64>() / n;
        let variance = results.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        tracing::debug!(samples = self.samples, mean, variance, "monte carlo estimate");
        Ok(Uncertain::new(mean, variance.sqrt()))
    }
}
