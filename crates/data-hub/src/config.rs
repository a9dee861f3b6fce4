//! Data hub configuration

use ring_buffer::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Per-stream buffer capacities.
///
/// Each capacity is chosen to hold a fixed duration of history at the
/// stream's expected rate; the default of 500 slots covers the slowest
/// consumer's alignment window for every stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// IMU stream capacity (samples)
    pub imu_capacity: usize,

    /// Wheel odometry stream capacity (samples)
    pub wheel_odometry_capacity: usize,

    /// Steering angle stream capacity (samples)
    pub steering_capacity: usize,

    /// Gearbox state stream capacity (samples)
    pub gearbox_capacity: usize,

    /// Fused pose stream capacity (samples)
    pub pose_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            imu_capacity: DEFAULT_CAPACITY,
            wheel_odometry_capacity: DEFAULT_CAPACITY,
            steering_capacity: DEFAULT_CAPACITY,
            gearbox_capacity: DEFAULT_CAPACITY,
            pose_capacity: DEFAULT_CAPACITY,
        }
    }
}
