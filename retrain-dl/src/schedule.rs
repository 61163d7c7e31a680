//! Learning-rate decay curves and the warm-up schedule.

use crate::common::*;

/// Linearly interpolates from `start` to `end` over `n_iter` iterations.
pub fn linear_decay(start: f64, end: f64, n_iter: usize, current_iter: usize) -> Result<f64> {
    ensure!(n_iter > 0, "n_iter must be positive");
    Ok((end - start) / n_iter as f64 * current_iter as f64 + start)
}

/// Exponentially interpolates from `start` to `end` over `n_iter`
/// iterations, with the exponent taken log-base-`n_iter`.
pub fn scaled_exp_decay(start: f64, end: f64, n_iter: usize, current_iter: usize) -> Result<f64> {
    ensure!(start > 0.0, "the start value must be positive");
    ensure!(end > 0.0, "the end value must be positive");
    ensure!(n_iter > 1, "n_iter must be greater than 1");

    let b = (start / end).ln() / (n_iter as f64).ln();
    Ok(start / ((current_iter + 1) as f64).powf(b))
}

/// A two-phase schedule: linear warm-up from `lr_min` to `lr_max` over the
/// first third of training, then linear decay back towards `lr_min`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupSchedule {
    pub epochs: NonZeroUsize,
    pub lr_min: R64,
    pub lr_max: R64,
}

pub fn warmup_lr(current_epoch: usize, schedule: &WarmupSchedule) -> Result<f64> {
    let WarmupSchedule {
        epochs,
        lr_min,
        lr_max,
    } = *schedule;
    let edge = epochs.get() / 3;

    if current_epoch < edge {
        linear_decay(lr_min.raw(), lr_max.raw(), edge, current_epoch)
    } else {
        linear_decay(lr_max.raw(), lr_min.raw(), epochs.get(), current_epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_decay_endpoints() {
        assert_abs_diff_eq!(linear_decay(1.0, 0.0, 10, 0).unwrap(), 1.0);
        assert_abs_diff_eq!(linear_decay(1.0, 0.0, 10, 10).unwrap(), 0.0);
        assert_abs_diff_eq!(linear_decay(0.0, 2.0, 4, 2).unwrap(), 1.0);
    }

    #[test]
    fn scaled_exp_decay_endpoints() {
        assert_abs_diff_eq!(
            scaled_exp_decay(0.1, 0.001, 100, 0).unwrap(),
            0.1,
            epsilon = 1e-9
        );
        // at the final iteration the divisor is n_iter^b = start/end
        assert_abs_diff_eq!(
            scaled_exp_decay(0.1, 0.001, 100, 99).unwrap(),
            0.001,
            epsilon = 1e-4
        );
    }

    #[test]
    fn degenerate_decay_parameters_are_rejected() {
        // each of these would otherwise divide by zero or take the log of a
        // non-positive value and leak NaN or infinity
        assert!(linear_decay(0.01, 0.001, 0, 5).is_err());
        assert!(scaled_exp_decay(0.1, 0.001, 0, 3).is_err());
        assert!(scaled_exp_decay(0.1, 0.001, 1, 0).is_err());
        assert!(scaled_exp_decay(-0.1, 0.001, 100, 3).is_err());
        assert!(scaled_exp_decay(0.1, 0.0, 100, 3).is_err());

        let value = scaled_exp_decay(0.1, 0.001, 100, 3).unwrap();
        assert!(value.is_finite());
    }

    #[test]
    fn warmup_then_decay() {
        let schedule = WarmupSchedule {
            epochs: NonZeroUsize::new(30).unwrap(),
            lr_min: r64(0.001),
            lr_max: r64(0.01),
        };

        assert_abs_diff_eq!(warmup_lr(0, &schedule).unwrap(), 0.001);
        // warm-up climbs during the first third
        assert!(warmup_lr(5, &schedule).unwrap() > warmup_lr(0, &schedule).unwrap());
        // decay phase falls back towards lr_min
        assert_abs_diff_eq!(warmup_lr(10, &schedule).unwrap(), 0.007);
        assert!(warmup_lr(25, &schedule).unwrap() < warmup_lr(10, &schedule).unwrap());
        assert_abs_diff_eq!(warmup_lr(30, &schedule).unwrap(), 0.001);
    }

    #[test]
    fn short_schedules_skip_the_warmup_phase() {
        // with fewer than 3 epochs the warm-up window is empty, and the
        // decay branch must still produce a finite value
        let schedule = WarmupSchedule {
            epochs: NonZeroUsize::new(2).unwrap(),
            lr_min: r64(0.001),
            lr_max: r64(0.01),
        };
        assert_abs_diff_eq!(warmup_lr(0, &schedule).unwrap(), 0.01);
        assert!(warmup_lr(1, &schedule).unwrap().is_finite());
    }
}
