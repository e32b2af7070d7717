//! Physics-rest detection.
//!
//! A released item streams its pose to peers until it comes to rest. The
//! [`RestDetector`] samples linear and angular speed every tick and reports
//! [`RestSample::Settled`] once both stayed below threshold for a run of
//! consecutive ticks. Any sample above threshold resets the run.

/// Outcome of feeding one tick of motion into the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestSample {
    /// Not watching; the sample was ignored.
    Idle,
    /// Above threshold; the consecutive run was reset.
    Moving,
    /// Below threshold for `ticks` consecutive samples so far.
    Settling { ticks: u32 },
    /// The run completed. Fired once; the detector is idle afterwards.
    Settled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RestDetector {
    linear_epsilon: f32,
    angular_epsilon: f32,
    required_ticks: u32,
    watching: bool,
    consecutive: u32,
}

impl RestDetector {
    pub fn new(linear_epsilon: f32, angular_epsilon: f32, required_ticks: u32) -> Self {
        Self {
            linear_epsilon,
            angular_epsilon,
            required_ticks: required_ticks.max(1),
            watching: false,
            consecutive: 0,
        }
    }

    pub fn from_config(config: &crate::HoldableConfig) -> Self {
        Self::new(
            config.rest_linear_epsilon,
            config.rest_angular_epsilon,
            config.rest_required_ticks,
        )
    }

    /// Begins (or restarts) a watch session.
    pub fn start(&mut self) {
        self.watching = true;
        self.consecutive = 0;
    }

    /// Cancels the watch session without firing. No-op when idle.
    pub fn stop(&mut self) {
        self.watching = false;
        self.consecutive = 0;
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn sample(&mut self, linear_speed: f32, angular_speed: f32) -> RestSample {
        if !self.watching {
            return RestSample::Idle;
        }

        // NaN compares false, so a diverged body reads as moving.
        let resting = linear_speed < self.linear_epsilon && angular_speed < self.angular_epsilon;
        if !resting {
            self.consecutive = 0;
            return RestSample::Moving;
        }

        self.consecutive += 1;
        if self.consecutive >= self.required_ticks {
            self.watching = false;
            self.consecutive = 0;
            RestSample::Settled
        } else {
            RestSample::Settling {
                ticks: self.consecutive,
            }
        }
    }
}

impl Default for RestDetector {
    fn default() -> Self {
        Self::from_config(&crate::HoldableConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn detector(required: u32) -> RestDetector {
        RestDetector::new(0.1, 0.1, required)
    }

    #[test]
    fn idle_detector_ignores_samples() {
        let mut rest = detector(2);
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Idle);
        rest.stop();
        assert!(!rest.is_watching());
    }

    #[test]
    fn fires_after_consecutive_run() {
        let mut rest = detector(3);
        rest.start();
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Settling { ticks: 1 });
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Settling { ticks: 2 });
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Settled);
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Idle);
    }

    #[test]
    fn rise_above_threshold_resets_run() {
        let mut rest = detector(3);
        rest.start();
        rest.sample(0.0, 0.0);
        rest.sample(0.0, 0.0);
        assert_eq!(rest.sample(0.0, 5.0), RestSample::Moving);
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Settling { ticks: 1 });
    }

    #[test]
    fn non_finite_speed_counts_as_moving() {
        let mut rest = detector(1);
        rest.start();
        assert_eq!(rest.sample(f32::NAN, 0.0), RestSample::Moving);
        assert_eq!(rest.sample(0.0, f32::NAN), RestSample::Moving);
        assert_eq!(rest.sample(f32::INFINITY, 0.0), RestSample::Moving);
        assert!(rest.is_watching());
    }

    #[test]
    fn restart_resets_counter() {
        let mut rest = detector(2);
        rest.start();
        rest.sample(0.0, 0.0);
        rest.start();
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Settling { ticks: 1 });
    }

    #[test]
    fn stop_cancels_without_firing() {
        let mut rest = detector(2);
        rest.start();
        rest.sample(0.0, 0.0);
        rest.stop();
        assert_eq!(rest.sample(0.0, 0.0), RestSample::Idle);
    }

    proptest! {
        #[test]
        fn settles_at_most_once_per_session(
            speeds in proptest::collection::vec(prop_oneof![Just(0.0f32), Just(1.0f32)], 0..200)
        ) {
            let mut rest = detector(4);
            rest.start();
            let fired = speeds
                .iter()
                .filter(|&&speed| rest.sample(speed, 0.0) == RestSample::Settled)
                .count();
            prop_assert!(fired <= 1);
        }
    }
}
