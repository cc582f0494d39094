//! Synthetic linear samples
//!
//! A [`LinearSample`] describes a dataset of the form
//!
//! ```math
//! y_i = slope * x_i + intercept + ε_i
//! where
//!   x_i ~ U(x_min, x_max), ε_i drawn independently from a `Noise` distribution
//! ```
//!
//! With a fixed seed the generated data is identical on every run.
//!
//! ```rust
//! use linviz::data::{LinearSample, Noise};
//!
//! let sample = LinearSample::default()
//!     .with_samples(50)
//!     .with_noise(Noise::Gaussian { std_dev: 0.5 })
//!     .with_seed(7);
//!
//! let data = sample.generate().unwrap();
//! assert_eq!(data.len(), 50);
//! assert_eq!(data, sample.generate().unwrap());
//! ```
use std::ops::Range;

use rand::SeedableRng;
use rand_distr::{uniform::SampleUniform, Distribution, Normal, StandardNormal, Uniform};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    value::Value,
};

/// Noise added to the noiseless line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Noise<T: Value> {
    /// No noise; every point lies on the line.
    None,

    /// Independent Gaussian noise.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// εₙ ~ N(0, std_dev²)
    /// ```
    /// </div>
    Gaussian {
        /// Standard deviation of the noise, in units of `y`.
        std_dev: T,
    },

    /// Independent uniform noise.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// εₙ ~ U(−strength, +strength)
    /// ```
    /// </div>
    Uniform {
        /// Maximum deviation from the line, in units of `y`.
        strength: T,
    },
}
impl<T: Value> Noise<T> {
    /// Size of the noise: the standard deviation or half width. Zero for [`Noise::None`].
    pub fn level(&self) -> T {
        match self {
            Noise::None => T::zero(),
            Noise::Gaussian { std_dev } => *std_dev,
            Noise::Uniform { strength } => *strength,
        }
    }

    /// Draw a single perturbation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidNoise`] if the level is negative or not finite.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> Result<T>
    where
        T: num_traits::Float + SampleUniform,
        StandardNormal: Distribution<T>,
    {
        Ok(self.sampler()?.sample(rng))
    }

    fn sampler(&self) -> Result<NoiseSampler<T>>
    where
        T: num_traits::Float + SampleUniform,
        StandardNormal: Distribution<T>,
    {
        let level = self.level();
        if !Value::is_finite(&level) || level < T::zero() {
            return Err(Error::InvalidNoise(format!(
                "noise level must be finite and non-negative, got {level}"
            )));
        }

        Ok(match self {
            Noise::None => NoiseSampler::Zero,
            Noise::Gaussian { std_dev } => {
                let normal = Normal::new(T::zero(), *std_dev)
                    .map_err(|e| Error::InvalidNoise(e.to_string()))?;
                NoiseSampler::Normal(normal)
            }
            Noise::Uniform { strength } if *strength == T::zero() => NoiseSampler::Zero,
            Noise::Uniform { strength } => {
                let uniform = Uniform::new(-*strength, *strength)
                    .map_err(|e| Error::InvalidNoise(e.to_string()))?;
                NoiseSampler::Uniform(uniform)
            }
        })
    }
}

enum NoiseSampler<T>
where
    T: Value + num_traits::Float + SampleUniform,
    StandardNormal: Distribution<T>,
{
    Zero,
    Normal(Normal<T>),
    Uniform(Uniform<T>),
}
impl<T> NoiseSampler<T>
where
    T: Value + num_traits::Float + SampleUniform,
    StandardNormal: Distribution<T>,
{
    fn sample<R: rand::Rng>(&self, rng: &mut R) -> T {
        match self {
            NoiseSampler::Zero => T::zero(),
            NoiseSampler::Normal(normal) => normal.sample(rng),
            NoiseSampler::Uniform(uniform) => uniform.sample(rng),
        }
    }
}

/// Description of a noisy linear dataset.
///
/// Defaults to 100 points with `x` in `[0, 10)`, `y = 2x` and
/// Gaussian noise with a standard deviation of 2, seeded with 42.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSample<T: Value = f64> {
    /// Number of points to generate
    pub samples: usize,

    /// Half-open range the predictor is drawn from
    pub x_range: Range<T>,

    /// Slope of the noiseless line
    pub slope: T,

    /// Intercept of the noiseless line
    pub intercept: T,

    /// Noise added to every target value
    pub noise: Noise<T>,

    /// Fixes the RNG seed for reproducibility.
    /// If not provided, the OS RNG is used to seed each run.
    pub seed: Option<u64>,
}
impl<T: Value> Default for LinearSample<T> {
    fn default() -> Self {
        let two = T::two();
        Self {
            samples: 100,
            x_range: T::zero()..T::from_positive_int(10),
            slope: two,
            intercept: T::zero(),
            noise: Noise::Gaussian { std_dev: two },
            seed: Some(42),
        }
    }
}
impl<T: Value> LinearSample<T> {
    /// Set the number of points
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set the range the predictor is drawn from
    #[must_use]
    pub fn with_x_range(mut self, x_range: Range<T>) -> Self {
        self.x_range = x_range;
        self
    }

    /// Set the noiseless line
    #[must_use]
    pub fn with_line(mut self, slope: T, intercept: T) -> Self {
        self.slope = slope;
        self.intercept = intercept;
        self
    }

    /// Set the noise distribution
    #[must_use]
    pub fn with_noise(mut self, noise: Noise<T>) -> Self {
        self.noise = noise;
        self
    }

    /// Fix the RNG seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed from the OS on every call to [`LinearSample::generate`]
    #[must_use]
    pub fn unseeded(mut self) -> Self {
        self.seed = None;
        self
    }

    /// The noiseless line as `(slope, intercept)`
    pub fn line(&self) -> (T, T) {
        (self.slope, self.intercept)
    }

    /// Value of the noiseless line at `x`
    pub fn noiseless(&self, x: T) -> T {
        self.slope * x + self.intercept
    }

    /// Generate the dataset as `(x, y)` pairs.
    ///
    /// All predictors are drawn first, then all noise values, from a single RNG.
    /// `samples == 0` gives an empty dataset.
    ///
    /// # Errors
    /// - [`Error::InvalidSampleRange`] if `x_range` is empty, reversed or not finite.
    /// - [`Error::InvalidNoise`] if the noise level is negative or not finite.
    pub fn generate(&self) -> Result<Vec<(T, T)>>
    where
        T: num_traits::Float + SampleUniform,
        StandardNormal: Distribution<T>,
    {
        let Range { start, end } = self.x_range;
        if !Value::is_finite(&start) || !Value::is_finite(&end) || start >= end {
            return Err(Error::InvalidSampleRange(start.to_string(), end.to_string()));
        }

        let noise = self.noise.sampler()?;
        let x_dist = Uniform::new(start, end)
            .map_err(|_| Error::InvalidSampleRange(start.to_string(), end.to_string()))?;

        let mut rng = rng(self.seed);
        let xs: Vec<T> = (0..self.samples).map(|_| x_dist.sample(&mut rng)).collect();
        let data: Vec<(T, T)> = xs
            .into_iter()
            .map(|x| (x, self.noiseless(x) + noise.sample(&mut rng)))
            .collect();

        tracing::debug!(
            samples = data.len(),
            seed = ?self.seed,
            noise = ?self.noise,
            "Generated linear sample"
        );
        Ok(data)
    }
}

fn rng(seed: Option<u64>) -> rand::rngs::StdRng {
    match seed {
        Some(s) => rand::rngs::StdRng::seed_from_u64(s),
        None => rand::rngs::StdRng::from_rng(&mut rand::rng()),
    }
}
