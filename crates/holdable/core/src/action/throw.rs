use glam::Vec3;
use rand::Rng;

use crate::config::HoldableConfig;

/// Impulses to apply to the body when a throw is released.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowImpulse {
    pub charge: f32,
    /// World-space linear impulse: view forward scaled by charge.
    pub impulse: Vec3,
    /// Body-relative torque impulse.
    pub torque: Vec3,
}

/// Charges a throw while the use is held.
#[derive(Clone, Debug, PartialEq)]
pub struct ThrowController {
    charge: f32,
    charging: bool,
    rate: f32,
    min: f32,
    max: f32,
    torque_range: f32,
}

impl ThrowController {
    pub fn new(config: &HoldableConfig) -> Self {
        let min = config.throw_charge_min.min(config.throw_charge_max);
        Self {
            charge: min,
            charging: false,
            rate: config.throw_charge_rate,
            min,
            max: config.throw_charge_max.max(min),
            torque_range: config.throw_torque_range.abs(),
        }
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn start(&mut self) {
        self.charge = self.min;
        self.charging = true;
    }

    /// Adds `dt × rate`, clamped to `[min, max]`.
    pub fn accumulate(&mut self, dt: f32) {
        if self.charging {
            self.charge = (self.charge + dt * self.rate).clamp(self.min, self.max);
        }
    }

    /// Ends charging and computes the release impulses. Returns `None` if no
    /// throw was being charged.
    pub fn release<R: Rng + ?Sized>(&mut self, forward: Vec3, rng: &mut R) -> Option<ThrowImpulse> {
        if !self.charging {
            return None;
        }
        self.charging = false;

        let range = self.torque_range;
        let torque = Vec3::new(
            rng.gen_range(-range..=range),
            rng.gen_range(-range..=range),
            rng.gen_range(-range..=range),
        );
        Some(ThrowImpulse {
            charge: self.charge,
            impulse: forward * self.charge,
            torque,
        })
    }

    /// Abandons a charge without releasing.
    pub fn cancel(&mut self) {
        self.charging = false;
    }
}

impl Default for ThrowController {
    fn default() -> Self {
        Self::new(&HoldableConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn one_second_at_ten_hertz_reaches_six() {
        let mut throw = ThrowController::default();
        throw.start();
        for _ in 0..10 {
            throw.accumulate(0.1);
        }
        assert!((throw.charge() - 6.0).abs() < 1e-4);

        let mut rng = StdRng::seed_from_u64(7);
        let released = throw.release(Vec3::NEG_Z, &mut rng).unwrap();
        assert!((released.impulse.length() - 6.0).abs() < 1e-4);
        assert!(released.impulse.z < 0.0);
    }

    #[test]
    fn charge_is_clamped() {
        let mut throw = ThrowController::default();
        throw.start();
        throw.accumulate(100.0);
        assert_eq!(throw.charge(), 10.0);
        throw.accumulate(-100.0);
        assert_eq!(throw.charge(), 1.0);
    }

    #[test]
    fn torque_stays_within_range() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut throw = ThrowController::default();
        for _ in 0..100 {
            throw.start();
            let released = throw.release(Vec3::X, &mut rng).unwrap();
            assert!(released.torque.abs().max_element() <= 3.0);
        }
    }

    #[test]
    fn release_without_start_does_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut throw = ThrowController::default();
        assert_eq!(throw.release(Vec3::X, &mut rng), None);
        throw.start();
        throw.cancel();
        assert!(!throw.is_charging());
    }
}
