//! Sensor Value Records
//!
//! Plain immutable measurement records carried by the localization
//! pipeline's stream buffers. Each record is opaque to the buffer apart
//! from its acquisition timestamp (seconds), exposed through the
//! `Timestamped` contract.

use ring_buffer::Timestamped;
use serde::{Deserialize, Serialize};

/// One inertial measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    /// Linear acceleration [x, y, z] (m/s²)
    pub accel: [f64; 3],
    /// Angular velocity [x, y, z] (rad/s)
    pub gyro: [f64; 3],
    /// Acquisition time (s)
    pub timestamp: f64,
}

impl ImuSample {
    /// Create a new IMU sample
    pub fn new(accel: [f64; 3], gyro: [f64; 3], timestamp: f64) -> Self {
        Self {
            accel,
            gyro,
            timestamp,
        }
    }
}

impl Timestamped for ImuSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Left/right wheel speed pair from the odometry interface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelOdometry {
    /// Left wheel speed (m/s)
    pub left_speed: f64,
    /// Right wheel speed (m/s)
    pub right_speed: f64,
    /// Acquisition time (s)
    pub timestamp: f64,
}

impl WheelOdometry {
    /// Create a new wheel odometry sample
    pub fn new(left_speed: f64, right_speed: f64, timestamp: f64) -> Self {
        Self {
            left_speed,
            right_speed,
            timestamp,
        }
    }
}

impl Timestamped for WheelOdometry {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Steering wheel angle report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringSample {
    /// Steering angle (rad)
    pub angle: f64,
    /// Acquisition time (s)
    pub timestamp: f64,
}

impl SteeringSample {
    /// Create a new steering sample
    pub fn new(angle: f64, timestamp: f64) -> Self {
        Self { angle, timestamp }
    }
}

impl Timestamped for SteeringSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Gearbox state report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearboxSample {
    /// Displayed gear position indicator
    pub position: i32,
    /// Acquisition time (s)
    pub timestamp: f64,
}

impl GearboxSample {
    /// Create a new gearbox sample
    pub fn new(position: i32, timestamp: f64) -> Self {
        Self {
            position,
            timestamp,
        }
    }
}

impl Timestamped for GearboxSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Fused pose estimate produced by the estimation stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    /// Position [x, y, z] in the odometry frame (m)
    pub position: [f64; 3],
    /// Orientation as a unit quaternion [w, x, y, z]
    pub rotation: [f64; 4],
    /// Linear velocity [x, y, z] (m/s)
    pub velocity: [f64; 3],
    /// Accelerometer bias [x, y, z] (m/s²)
    pub accel_bias: [f64; 3],
    /// Gyroscope bias [x, y, z] (rad/s)
    pub gyro_bias: [f64; 3],
    /// Estimate time (s)
    pub timestamp: f64,
}

impl PoseEstimate {
    /// Create a full pose estimate with velocity and bias states
    pub fn new(
        position: [f64; 3],
        rotation: [f64; 4],
        velocity: [f64; 3],
        accel_bias: [f64; 3],
        gyro_bias: [f64; 3],
        timestamp: f64,
    ) -> Self {
        Self {
            position,
            rotation,
            velocity,
            accel_bias,
            gyro_bias,
            timestamp,
        }
    }

    /// Create a pose-only estimate; velocity and bias states start at zero
    pub fn from_pose(position: [f64; 3], rotation: [f64; 4], timestamp: f64) -> Self {
        Self {
            position,
            rotation,
            velocity: [0.0; 3],
            accel_bias: [0.0; 3],
            gyro_bias: [0.0; 3],
            timestamp,
        }
    }
}

impl Timestamped for PoseEstimate {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_expose_timestamp() {
        assert_eq!(ImuSample::new([0.0; 3], [0.0; 3], 1.5).timestamp(), 1.5);
        assert_eq!(WheelOdometry::new(1.0, 1.1, 2.5).timestamp(), 2.5);
        assert_eq!(SteeringSample::new(0.2, 3.5).timestamp(), 3.5);
        assert_eq!(GearboxSample::new(3, 4.5).timestamp(), 4.5);
    }

    #[test]
    fn test_pose_from_pose_zeroes_dynamic_states() {
        let pose = PoseEstimate::from_pose([1.0, 2.0, 3.0], [1.0, 0.0, 0.0, 0.0], 5.0);
        assert_eq!(pose.velocity, [0.0; 3]);
        assert_eq!(pose.accel_bias, [0.0; 3]);
        assert_eq!(pose.gyro_bias, [0.0; 3]);
        assert_eq!(pose.timestamp(), 5.0);
    }
}
