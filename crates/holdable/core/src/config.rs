use glam::Vec3;

use crate::protocol::FloatPrecision;

/// Tunable parameters for item handling, placement, throwing, and settling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HoldableConfig {
    /// Distance in front of the viewpoint where a dropped item reappears.
    pub drop_distance: f32,

    /// Maximum distance of the precision-placement raycast.
    pub placement_distance: f32,

    /// Degrees added to the placement rotation per scroll step.
    pub rotation_step_degrees: f32,

    /// Throw charge gained per second of held use.
    pub throw_charge_rate: f32,
    pub throw_charge_min: f32,
    pub throw_charge_max: f32,

    /// Each axis of the random throw torque is drawn from `[-range, range]`.
    pub throw_torque_range: f32,

    /// Length of the throw countdown shown to the holder, in seconds.
    pub throw_countdown_secs: f32,

    /// Held-use time required to install an item into a container.
    pub install_duration_secs: f32,

    /// Linear speed below which a body counts as resting.
    pub rest_linear_epsilon: f32,
    /// Angular speed below which a body counts as resting.
    pub rest_angular_epsilon: f32,
    /// Consecutive resting ticks required before "settled" fires.
    pub rest_required_ticks: u32,

    /// Interval of the action-text refresh while the item is held.
    pub ui_refresh_interval_secs: f32,

    /// Float precision of pose/velocity fields on hand-exit frames.
    pub hand_exit_precision: FloatPrecision,

    /// Local axis aligned with the surface normal during precision placement,
    /// for items whose state does not set their own.
    pub default_rotation_axis: Vec3,
}

impl HoldableConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DROP_DISTANCE: f32 = 1.5;
    pub const DEFAULT_PLACEMENT_DISTANCE: f32 = 6.0;
    /// A full turn takes 32 scroll steps.
    pub const DEFAULT_ROTATION_STEP_DEGREES: f32 = 11.25;
    pub const DEFAULT_THROW_CHARGE_RATE: f32 = 5.0;
    pub const DEFAULT_THROW_CHARGE_MIN: f32 = 1.0;
    pub const DEFAULT_THROW_CHARGE_MAX: f32 = 10.0;
    pub const DEFAULT_THROW_TORQUE_RANGE: f32 = 3.0;
    pub const DEFAULT_THROW_COUNTDOWN_SECS: f32 = 2.0;
    pub const DEFAULT_INSTALL_DURATION_SECS: f32 = 1.0;
    pub const DEFAULT_REST_LINEAR_EPSILON: f32 = 0.05;
    pub const DEFAULT_REST_ANGULAR_EPSILON: f32 = 0.05;
    pub const DEFAULT_REST_REQUIRED_TICKS: u32 = 30;
    pub const DEFAULT_UI_REFRESH_INTERVAL_SECS: f32 = 0.1;
    pub const DEFAULT_HAND_EXIT_PRECISION: FloatPrecision = FloatPrecision::Fixed(4);

    pub fn new() -> Self {
        Self {
            drop_distance: Self::DEFAULT_DROP_DISTANCE,
            placement_distance: Self::DEFAULT_PLACEMENT_DISTANCE,
            rotation_step_degrees: Self::DEFAULT_ROTATION_STEP_DEGREES,
            throw_charge_rate: Self::DEFAULT_THROW_CHARGE_RATE,
            throw_charge_min: Self::DEFAULT_THROW_CHARGE_MIN,
            throw_charge_max: Self::DEFAULT_THROW_CHARGE_MAX,
            throw_torque_range: Self::DEFAULT_THROW_TORQUE_RANGE,
            throw_countdown_secs: Self::DEFAULT_THROW_COUNTDOWN_SECS,
            install_duration_secs: Self::DEFAULT_INSTALL_DURATION_SECS,
            rest_linear_epsilon: Self::DEFAULT_REST_LINEAR_EPSILON,
            rest_angular_epsilon: Self::DEFAULT_REST_ANGULAR_EPSILON,
            rest_required_ticks: Self::DEFAULT_REST_REQUIRED_TICKS,
            ui_refresh_interval_secs: Self::DEFAULT_UI_REFRESH_INTERVAL_SECS,
            hand_exit_precision: Self::DEFAULT_HAND_EXIT_PRECISION,
            default_rotation_axis: Vec3::Y,
        }
    }
}

impl Default for HoldableConfig {
    fn default() -> Self {
        Self::new()
    }
}
