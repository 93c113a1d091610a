//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Nominal seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Maximum wall-clock frame time fed to the accumulator (seconds).
/// Clamps catch-up work after a stall instead of spiraling.
pub const MAX_FRAME_TIME: f64 = 0.05;

/// Speed multiplier clamp range.
pub const SPEED_MULTIPLIER_MIN: f64 = 0.1;
pub const SPEED_MULTIPLIER_MAX: f64 = 10.0;

// --- World bounds ---

/// Horizontal extent of the world in each direction from the origin (meters).
pub const WORLD_BOUND: f64 = 1000.0;

/// Altitude floor (meters). Slightly below ground so touching down is legal.
pub const ALTITUDE_MIN: f64 = -10.0;

/// Altitude ceiling (meters).
pub const ALTITUDE_MAX: f64 = 500.0;

/// Interior point drones are retargeted to after leaving the bounds.
pub const DRONE_RECOVERY_ALTITUDE: f64 = 50.0;

/// Half-extent of the ground square targets are retargeted into.
pub const TARGET_RECOVERY_SPREAD: f64 = 50.0;

// --- Detection ---

/// Simulated seconds between detection sweeps. Pairwise distance checks
/// are the dominant cost and do not need 60 Hz.
pub const DETECTION_INTERVAL: f64 = 0.1;

/// Confidence assigned by a drone sensor detection.
pub const DETECTION_CONFIDENCE: f64 = 0.8;

// --- Destroyed-entity retention ---

/// Simulated seconds a destroyed entity lingers before removal.
pub const DESTROYED_RETENTION_SECS: f64 = 5.0;

// --- Event / chat ring buffers ---

/// Event log capacity (oldest evicted first).
pub const MAX_EVENTS: usize = 1000;

/// Chat log capacity.
pub const MAX_MESSAGES: usize = 500;

/// Number of recent events included in a state snapshot.
pub const SNAPSHOT_EVENT_COUNT: usize = 20;

/// Number of recent messages included in a state snapshot.
pub const SNAPSHOT_MESSAGE_COUNT: usize = 10;

// --- Drone defaults ---

pub const DRONE_MAX_SPEED: f64 = 25.0;
pub const DRONE_DETECTION_RADIUS: f64 = 150.0;
pub const DRONE_COLLISION_RADIUS: f64 = 3.0;
pub const DRONE_FOLLOW_DISTANCE: f64 = 20.0;
pub const DRONE_HUNTING_RANGE: f64 = 200.0;
pub const DRONE_TURN_RATE: f64 = std::f64::consts::PI;
pub const DRONE_APPROACH_THRESHOLD: f64 = 5.0;
pub const DRONE_PATROL_RADIUS: f64 = 100.0;
pub const DRONE_ENGAGEMENT_RANGE: f64 = 10.0;

/// Minimum configurable follow distance (meters).
pub const FOLLOW_DISTANCE_MIN: f64 = 5.0;

/// Half-width of the follow-target distance band (meters): the drone
/// closes above `follow + band`, retreats below `follow - band`, and
/// orbits in between.
pub const FOLLOW_BAND: f64 = 10.0;

/// Orbit angular rate while holding the follow band (radians/second).
pub const FOLLOW_ORBIT_RATE: f64 = 0.5;

/// Seconds between random-search retarget picks.
pub const RANDOM_TARGET_INTERVAL: f64 = 10.0;

/// Random-search altitude band (meters).
pub const PATROL_ALTITUDE_MIN: f64 = 30.0;
pub const PATROL_ALTITUDE_MAX: f64 = 100.0;

/// Hover perturbation amplitude (m/s) and base frequency (Hz) for
/// hold-position drones.
pub const HOVER_AMPLITUDE: f64 = 2.0;
pub const HOVER_FREQUENCY: f64 = 0.5;

/// Velocity damping factor applied inside the approach threshold.
pub const ARRIVAL_DAMPING: f64 = 0.8;

// --- Target defaults ---

pub const TARGET_MAX_SPEED: f64 = 15.0;
pub const TARGET_DETECTION_RADIUS: f64 = 50.0;
pub const TARGET_COLLISION_RADIUS: f64 = 4.0;
pub const TARGET_PATROL_SPEED: f64 = 5.0;
pub const TARGET_TURN_RATE: f64 = 1.0;
pub const TARGET_APPROACH_THRESHOLD: f64 = 10.0;

/// Seconds before an unfinished patrol leg is abandoned and regenerated.
pub const PATROL_LEG_TIMEOUT_SECS: f64 = 30.0;

/// Random patrol leg length range (meters).
pub const PATROL_LEG_MIN: f64 = 20.0;
pub const PATROL_LEG_MAX: f64 = 100.0;

/// Seconds between hold-position jitter checks.
pub const JITTER_INTERVAL: f64 = 30.0;

/// Probability a jitter check actually perturbs the target.
pub const JITTER_CHANCE: f64 = 0.3;

/// Speed above which a target reports itself as moving (m/s).
pub const MOVING_SPEED_THRESHOLD: f64 = 0.1;

// --- Performance tracking ---

/// Rolling window of step durations kept for performance stats.
pub const PERF_WINDOW: usize = 60;

// --- Test scenario ---

/// Ring radius for scenario drones (meters), randomized +/- RING_JITTER.
pub const SCENARIO_RING_RADIUS: f64 = 50.0;
pub const SCENARIO_RING_JITTER: f64 = 20.0;

/// Scenario drone altitude band (meters).
pub const SCENARIO_ALTITUDE_MIN: f64 = 50.0;
pub const SCENARIO_ALTITUDE_MAX: f64 = 80.0;

/// Half-extent of the ground square scenario targets spawn in.
pub const SCENARIO_TARGET_SPREAD: f64 = 80.0;
