//! Rigid-body view of an item.
//!
//! The physics engine itself is external; this is the slice of it the item
//! logic reads and writes: pose, linear/angular velocity, the kinematic flag,
//! and mass for impulse application.

use glam::{Quat, Vec3};

/// World-space position and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub const fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Transforms a local-space direction into world space.
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Physical state of an item's rigid body.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyState {
    pub pose: Pose,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Kinematic bodies ignore forces and are moved only by their parent.
    pub kinematic: bool,
    pub mass: f32,
}

impl BodyState {
    pub const DEFAULT_MASS: f32 = 1.0;

    pub fn at(pose: Pose) -> Self {
        Self {
            pose,
            ..Self::default()
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn linear_speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn angular_speed(&self) -> f32 {
        self.angular_velocity.length()
    }

    /// Applies an instantaneous world-space impulse (Δv = J / m).
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.effective_mass();
    }

    /// Applies an instantaneous torque impulse expressed in the body's local
    /// frame, using mass as a uniform inertia.
    pub fn apply_relative_torque_impulse(&mut self, local_torque: Vec3) {
        let world = self.pose.transform_direction(local_torque);
        self.angular_velocity += world / self.effective_mass();
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            position: self.pose.position,
            rotation: self.pose.rotation,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
        }
    }

    /// Overwrites pose and velocities from a snapshot. Degenerate rotations
    /// collapse to identity.
    pub fn apply_snapshot(&mut self, snapshot: &BodySnapshot) {
        self.pose.position = snapshot.position;
        self.pose.rotation = if snapshot.rotation.length_squared() > f32::EPSILON {
            snapshot.rotation.normalize()
        } else {
            Quat::IDENTITY
        };
        self.velocity = snapshot.velocity;
        self.angular_velocity = snapshot.angular_velocity;
    }

    fn effective_mass(&self) -> f32 {
        if self.mass > f32::EPSILON {
            self.mass
        } else {
            Self::DEFAULT_MASS
        }
    }
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            pose: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            kinematic: false,
            mass: Self::DEFAULT_MASS,
        }
    }
}

/// Pose and velocities as carried on the wire: 13 floats in the order
/// `px,py,pz,qx,qy,qz,qw,vx,vy,vz,avx,avy,avz`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodySnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl BodySnapshot {
    pub const FIELD_COUNT: usize = 13;

    pub fn to_fields(&self) -> [f32; Self::FIELD_COUNT] {
        let p = self.position;
        let q = self.rotation;
        let v = self.velocity;
        let w = self.angular_velocity;
        [
            p.x, p.y, p.z, q.x, q.y, q.z, q.w, v.x, v.y, v.z, w.x, w.y, w.z,
        ]
    }

    pub fn from_fields(f: &[f32; Self::FIELD_COUNT]) -> Self {
        Self {
            position: Vec3::new(f[0], f[1], f[2]),
            rotation: Quat::from_xyzw(f[3], f[4], f[5], f[6]),
            velocity: Vec3::new(f[7], f[8], f[9]),
            angular_velocity: Vec3::new(f[10], f[11], f[12]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_scales_with_mass() {
        let mut body = BodyState::default().with_mass(2.0);
        body.apply_impulse(Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(body.velocity, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn zero_mass_falls_back_to_unit_mass() {
        let mut body = BodyState::default().with_mass(0.0);
        body.apply_impulse(Vec3::X);
        assert_eq!(body.velocity, Vec3::X);
    }

    #[test]
    fn snapshot_with_degenerate_rotation_resets_to_identity() {
        let mut body = BodyState::default();
        let snapshot = BodySnapshot {
            position: Vec3::ONE,
            rotation: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        };

        body.apply_snapshot(&snapshot);

        assert_eq!(body.pose.position, Vec3::ONE);
        assert_eq!(body.pose.rotation, Quat::IDENTITY);
    }

    #[test]
    fn field_order_matches_wire_layout() {
        let snapshot = BodySnapshot {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_xyzw(4.0, 5.0, 6.0, 7.0),
            velocity: Vec3::new(8.0, 9.0, 10.0),
            angular_velocity: Vec3::new(11.0, 12.0, 13.0),
        };
        let fields = snapshot.to_fields();
        assert_eq!(fields[0], 1.0);
        assert_eq!(fields[6], 7.0);
        assert_eq!(fields[12], 13.0);
        assert_eq!(BodySnapshot::from_fields(&fields), snapshot);
    }
}
