//! Shared steering and integration primitives.

use glam::DVec3;

use skywatch_core::components::Kinematics;
use skywatch_core::constants::ARRIVAL_DAMPING;
use skywatch_core::types::wrap_angle;

/// Base physics: apply velocity over the timestep.
pub fn integrate(kin: &mut Kinematics, dt: f64) {
    kin.position += kin.velocity * dt;
}

/// True when the entity is within `threshold` of `target`.
pub fn at_target(kin: &Kinematics, target: DVec3, threshold: f64) -> bool {
    kin.position.distance(target) < threshold
}

/// Steer an airborne entity toward `target`.
///
/// Heading change is clamped to `turn_rate * dt`; speed is
/// `min(max_speed, 2 * distance)` so motion decelerates near arrival;
/// inside the approach threshold velocity decays by a fixed damping
/// factor instead of continuing to steer. The vertical component tracks
/// the target at half rate.
pub fn steer_air(kin: &mut Kinematics, target: DVec3, turn_rate: f64, threshold: f64, dt: f64) {
    let direction = target - kin.position;
    let distance = direction.length();

    if distance < threshold {
        kin.velocity *= ARRIVAL_DAMPING;
        return;
    }

    let desired = direction.normalize_or_zero();
    turn_toward(kin, desired.y.atan2(desired.x), turn_rate, dt);

    let speed = kin.max_speed.min(2.0 * distance);
    kin.velocity = DVec3::new(
        speed * kin.heading.cos(),
        speed * kin.heading.sin(),
        desired.z * speed * 0.5,
    );
}

/// Steer a ground entity toward `target` in the horizontal plane.
///
/// Ground vehicles stop dead inside the threshold and never exceed
/// `patrol_speed`; the speed ramp is `min(patrol_speed, distance)`.
pub fn steer_ground(
    kin: &mut Kinematics,
    target: DVec3,
    patrol_speed: f64,
    turn_rate: f64,
    threshold: f64,
    dt: f64,
) {
    let mut direction = target - kin.position;
    direction.z = 0.0;
    let distance = direction.length();

    if distance < threshold {
        kin.velocity = DVec3::ZERO;
        return;
    }

    let desired = direction.normalize_or_zero();
    turn_toward(kin, desired.y.atan2(desired.x), turn_rate, dt);

    let speed = patrol_speed.min(distance);
    kin.velocity = DVec3::new(speed * kin.heading.cos(), speed * kin.heading.sin(), 0.0);
}

/// Rotate the heading toward `target_heading`, clamped to `turn_rate * dt`
/// per tick.
fn turn_toward(kin: &mut Kinematics, target_heading: f64, turn_rate: f64, dt: f64) {
    let diff = wrap_angle(target_heading - kin.heading);
    let max_turn = turn_rate * dt;
    if diff.abs() > max_turn {
        kin.heading += if diff > 0.0 { max_turn } else { -max_turn };
    } else {
        kin.heading = target_heading;
    }
}
