//! Categorical sampling — the one numerically sensitive primitive.
//!
//! Used for both initial-state draws and per-period transitions.
//! Distributions are checked, never clamped or renormalized.

use crate::{error::SamplingError, rng::RandomSource};

/// Rows must sum to 1 within this tolerance.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Check that `weights` is a usable probability vector.
pub fn check_distribution(weights: &[f64]) -> Result<(), SamplingError> {
    if weights.is_empty() {
        return Err(SamplingError::Empty);
    }
    let mut sum = 0.0;
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(SamplingError::InvalidWeight { index, value });
        }
        sum += value;
    }
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(SamplingError::NotNormalized { sum });
    }
    Ok(())
}

/// Draw one index from `weights` by cumulative sum against a uniform roll.
///
/// Exactly one roll is consumed per call and it must lie in `[0, 1)`.
/// Zero-weight entries are never selected; if rounding leaves the roll past
/// the final cumulative sum the last positive-weight index is returned.
pub fn sample_index(weights: &[f64], rng: &mut dyn RandomSource) -> Result<usize, SamplingError> {
    check_distribution(weights)?;

    let roll = rng.next_f64();
    if !(0.0..1.0).contains(&roll) {
        return Err(SamplingError::InvalidRoll { roll });
    }
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if w > 0.0 && roll < cumulative {
            return Ok(i);
        }
    }
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .ok_or(SamplingError::NotNormalized { sum: 0.0 })
}

/// Equal weights over `n` outcomes.
pub fn uniform_weights(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f64>);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0.remove(0)
        }
    }

    #[test]
    fn picks_bucket_containing_roll() {
        let w = [0.2, 0.3, 0.5];
        let mut rng = Fixed(vec![0.0, 0.19, 0.2, 0.49, 0.5, 0.999]);
        let picks: Vec<usize> = (0..6).map(|_| sample_index(&w, &mut rng).unwrap()).collect();
        assert_eq!(picks, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn zero_weight_is_never_chosen() {
        let w = [0.0, 1.0, 0.0];
        let mut rng = Fixed(vec![0.0, 0.5, 0.999_999]);
        for _ in 0..3 {
            assert_eq!(sample_index(&w, &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn rejects_negative_and_nan() {
        let mut rng = Fixed(vec![]);
        assert_eq!(
            sample_index(&[1.5, -0.5], &mut rng),
            Err(SamplingError::InvalidWeight { index: 1, value: -0.5 })
        );
        assert!(matches!(
            sample_index(&[f64::NAN, 1.0], &mut rng),
            Err(SamplingError::InvalidWeight { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_unnormalized_instead_of_rescaling() {
        let mut rng = Fixed(vec![]);
        assert!(matches!(
            sample_index(&[0.5, 0.4], &mut rng),
            Err(SamplingError::NotNormalized { .. })
        ));
        assert_eq!(sample_index(&[], &mut rng), Err(SamplingError::Empty));
    }

    #[test]
    fn rejects_roll_outside_unit_interval() {
        let w = [0.2, 0.8];
        let mut rng = Fixed(vec![1.0, 1.5, -0.1, f64::NAN]);
        assert_eq!(sample_index(&w, &mut rng), Err(SamplingError::InvalidRoll { roll: 1.0 }));
        assert_eq!(sample_index(&w, &mut rng), Err(SamplingError::InvalidRoll { roll: 1.5 }));
        assert_eq!(sample_index(&w, &mut rng), Err(SamplingError::InvalidRoll { roll: -0.1 }));
        assert!(matches!(
            sample_index(&w, &mut rng),
            Err(SamplingError::InvalidRoll { roll }) if roll.is_nan()
        ));
    }

    #[test]
    fn tolerance_admits_rounding_noise() {
        let w = uniform_weights(3);
        assert!(check_distribution(&w).is_ok());
        assert!(check_distribution(&[0.5, 0.5 + 1e-12]).is_ok());
        assert!(check_distribution(&[0.5, 0.5 + 1e-6]).is_err());
    }
}
