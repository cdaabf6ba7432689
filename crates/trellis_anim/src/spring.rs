//! Spring physics
//!
//! Spring-mode animations solve the damped harmonic oscillator in closed
//! form, branching on the damping ratio zeta = c / (2 * sqrt(m * k)):
//! underdamped (zeta < 1), critically damped (zeta = 1) and overdamped
//! (zeta > 1). The progress value approaches 1 as the spring settles.
//!
//! The effective duration is derived from the natural frequency and
//! damping ratio and clamped so that even near-undamped configurations
//! terminate.

use crate::spec::SpringConfig;

/// Shortest effective spring duration, in milliseconds
pub const MIN_SPRING_DURATION_MS: u64 = 100;
/// Longest effective spring duration, in milliseconds
pub const MAX_SPRING_DURATION_MS: u64 = 5000;

/// Amplitude threshold below which the spring counts as settled
const SETTLE_THRESHOLD: f64 = 0.001;

/// Damping ratio of a configuration
pub fn damping_ratio(config: &SpringConfig) -> f64 {
    let denom = 2.0 * (config.mass * config.stiffness).sqrt();
    if denom <= 0.0 {
        return 1.0;
    }
    config.damping / denom
}

/// Progress factor of the spring at time `t` seconds
///
/// 0 at t = 0, approaching 1 as the oscillation decays. Underdamped
/// configurations overshoot 1 on the way.
pub fn spring_progress(config: &SpringConfig, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }

    let mass = config.mass.max(1e-6);
    let stiffness = config.stiffness.max(1e-6);
    let omega = (stiffness / mass).sqrt();
    let zeta = damping_ratio(config);

    if (zeta - 1.0).abs() < 1e-6 {
        // Critically damped: x(t) = 1 - e^{-wt}(1 + wt)
        1.0 - (-omega * t).exp() * (1.0 + omega * t)
    } else if zeta < 1.0 {
        // Underdamped: decaying oscillation at the damped frequency
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * t).exp();
        1.0 - envelope * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
    } else {
        // Overdamped: sum of two real exponentials
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        // Coefficients from x(0) = 0, x'(0) = 0 around the rest position
        let c1 = r2 / (r2 - r1);
        let c2 = -r1 / (r2 - r1);
        1.0 - (c1 * (r1 * t).exp() + c2 * (r2 * t).exp())
    }
}

/// Effective duration of a spring, in milliseconds
///
/// Derived from the decay envelope: the time for the amplitude to fall
/// below the settle threshold, clamped to
/// [`MIN_SPRING_DURATION_MS`, `MAX_SPRING_DURATION_MS`].
pub fn settle_duration_ms(config: &SpringConfig) -> u64 {
    let mass = config.mass.max(1e-6);
    let stiffness = config.stiffness.max(1e-6);
    let omega = (stiffness / mass).sqrt();
    let zeta = damping_ratio(config);

    // The envelope decays like e^{-zeta * omega * t}; solve for the
    // settle threshold. Near-zero damping would never settle, hence the
    // clamp.
    let decay_rate = (zeta * omega).max(1e-6);
    let settle_secs = -SETTLE_THRESHOLD.ln() / decay_rate;
    let ms = (settle_secs * 1000.0).round() as u64;

    ms.clamp(MIN_SPRING_DURATION_MS, MAX_SPRING_DURATION_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn underdamped() -> SpringConfig {
        SpringConfig { mass: 1.0, stiffness: 180.0, damping: 12.0 }
    }

    fn critical() -> SpringConfig {
        // zeta = 1 when damping = 2 * sqrt(m * k)
        SpringConfig { mass: 1.0, stiffness: 100.0, damping: 20.0 }
    }

    fn overdamped() -> SpringConfig {
        SpringConfig { mass: 1.0, stiffness: 100.0, damping: 40.0 }
    }

    #[test]
    fn test_damping_ratio_branches() {
        assert!(damping_ratio(&underdamped()) < 1.0);
        assert!((damping_ratio(&critical()) - 1.0).abs() < 1e-9);
        assert!(damping_ratio(&overdamped()) > 1.0);
    }

    #[test]
    fn test_starts_at_zero() {
        for config in [underdamped(), critical(), overdamped()] {
            assert_eq!(spring_progress(&config, 0.0), 0.0);
        }
    }

    #[test]
    fn test_approaches_one() {
        for config in [underdamped(), critical(), overdamped()] {
            let late = spring_progress(&config, 30.0);
            assert!((late - 1.0).abs() < 1e-3, "late progress was {}", late);
        }
    }

    #[test]
    fn test_critical_and_overdamped_are_monotonic() {
        for config in [critical(), overdamped()] {
            let mut prev = 0.0;
            for i in 1..=200 {
                let t = i as f64 * 0.01;
                let x = spring_progress(&config, t);
                assert!(x >= prev - 1e-9, "not monotonic at t={}", t);
                prev = x;
            }
        }
    }

    #[test]
    fn test_underdamped_overshoots() {
        let config = SpringConfig { mass: 1.0, stiffness: 300.0, damping: 4.0 };
        let peak = (0..500)
            .map(|i| spring_progress(&config, i as f64 * 0.005))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_settle_duration_clamped() {
        // Nearly undamped: would ring for ages without the clamp
        let wild = SpringConfig { mass: 1.0, stiffness: 500.0, damping: 0.01 };
        assert_eq!(settle_duration_ms(&wild), MAX_SPRING_DURATION_MS);

        // Heavily damped, stiff: settles very fast
        let snappy = SpringConfig { mass: 0.1, stiffness: 2000.0, damping: 60.0 };
        assert!(settle_duration_ms(&snappy) >= MIN_SPRING_DURATION_MS);
        assert!(settle_duration_ms(&snappy) <= MAX_SPRING_DURATION_MS);
    }

    #[test]
    fn test_reasonable_spring_settles_mid_range() {
        let ms = settle_duration_ms(&underdamped());
        assert!(ms > MIN_SPRING_DURATION_MS && ms < MAX_SPRING_DURATION_MS);
    }
}
