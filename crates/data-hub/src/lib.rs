//! Sensor Data Hub
//!
//! The registry owning one timestamped ring buffer per sensor stream.
//! The application composition root constructs a single `DataHub` at
//! startup, shares it (typically behind an `Arc`), and hands out stable
//! buffer references for the process lifetime. Streams are fixed at
//! construction; there is no runtime creation or destruction.

mod config;

pub use config::HubConfig;
pub use ring_buffer::{ClosestMatch, RingBufferError, Sample, TimedRingBuffer, Timestamped};

use sensor_types::{GearboxSample, ImuSample, PoseEstimate, SteeringSample, WheelOdometry};
use tracing::info;

/// One ring buffer per sensor stream.
///
/// Each buffer is independently locked; inserts are serialized per stream
/// and there is no ordering guarantee across streams.
pub struct DataHub {
    imu: TimedRingBuffer<ImuSample>,
    wheel_odometry: TimedRingBuffer<WheelOdometry>,
    steering: TimedRingBuffer<SteeringSample>,
    gearbox: TimedRingBuffer<GearboxSample>,
    pose: TimedRingBuffer<PoseEstimate>,
}

impl DataHub {
    /// Create the hub with the given per-stream capacities.
    pub fn new(config: HubConfig) -> Result<Self, RingBufferError> {
        let hub = Self {
            imu: TimedRingBuffer::new(config.imu_capacity)?,
            wheel_odometry: TimedRingBuffer::new(config.wheel_odometry_capacity)?,
            steering: TimedRingBuffer::new(config.steering_capacity)?,
            gearbox: TimedRingBuffer::new(config.gearbox_capacity)?,
            pose: TimedRingBuffer::new(config.pose_capacity)?,
        };
        info!(
            imu = config.imu_capacity,
            wheel_odometry = config.wheel_odometry_capacity,
            steering = config.steering_capacity,
            gearbox = config.gearbox_capacity,
            pose = config.pose_capacity,
            "data hub initialized"
        );
        Ok(hub)
    }

    /// Create the hub with the default capacity for every stream.
    pub fn with_defaults() -> Self {
        Self {
            imu: TimedRingBuffer::with_default_capacity(),
            wheel_odometry: TimedRingBuffer::with_default_capacity(),
            steering: TimedRingBuffer::with_default_capacity(),
            gearbox: TimedRingBuffer::with_default_capacity(),
            pose: TimedRingBuffer::with_default_capacity(),
        }
    }

    /// Inertial measurement stream.
    pub fn imu(&self) -> &TimedRingBuffer<ImuSample> {
        &self.imu
    }

    /// Wheel odometry speed stream.
    pub fn wheel_odometry(&self) -> &TimedRingBuffer<WheelOdometry> {
        &self.wheel_odometry
    }

    /// Steering angle stream.
    pub fn steering(&self) -> &TimedRingBuffer<SteeringSample> {
        &self.steering
    }

    /// Gearbox state stream.
    pub fn gearbox(&self) -> &TimedRingBuffer<GearboxSample> {
        &self.gearbox
    }

    /// Fused pose estimate stream.
    pub fn pose(&self) -> &TimedRingBuffer<PoseEstimate> {
        &self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_default_capacities() {
        let hub = DataHub::with_defaults();
        assert_eq!(hub.imu().capacity(), 500);
        assert_eq!(hub.wheel_odometry().capacity(), 500);
        assert_eq!(hub.steering().capacity(), 500);
        assert_eq!(hub.gearbox().capacity(), 500);
        assert_eq!(hub.pose().capacity(), 500);
    }

    #[test]
    fn test_custom_capacities() {
        let hub = DataHub::new(HubConfig {
            imu_capacity: 1000,
            pose_capacity: 50,
            ..HubConfig::default()
        })
        .unwrap();
        assert_eq!(hub.imu().capacity(), 1000);
        assert_eq!(hub.pose().capacity(), 50);
        assert_eq!(hub.steering().capacity(), 500);
    }

    #[test]
    fn test_zero_capacity_fails_construction() {
        let result = DataHub::new(HubConfig {
            gearbox_capacity: 0,
            ..HubConfig::default()
        });
        assert!(matches!(result, Err(RingBufferError::InvalidCapacity)));
    }

    #[test]
    fn test_streams_are_independent() {
        let hub = DataHub::with_defaults();
        hub.imu()
            .insert(ImuSample::new([0.0, 0.0, 9.81], [0.0; 3], 1.0));
        hub.pose()
            .insert(PoseEstimate::from_pose([0.0; 3], [1.0, 0.0, 0.0, 0.0], 1.0));

        assert_eq!(hub.imu().size(), 1);
        assert_eq!(hub.pose().size(), 1);
        assert!(hub.wheel_odometry().is_empty());

        hub.imu().clear();
        assert!(hub.imu().is_empty());
        assert_eq!(hub.pose().size(), 1);
    }

    #[test]
    fn test_aligns_asynchronous_streams() {
        let hub = DataHub::with_defaults();

        // 100 Hz IMU against 10 Hz pose estimates.
        for i in 0..100 {
            let t = i as f64 * 0.01;
            hub.imu()
                .insert(ImuSample::new([0.1, 0.0, 9.81], [0.0; 3], t));
        }
        for i in 0..10 {
            let t = i as f64 * 0.1;
            hub.pose()
                .insert(PoseEstimate::from_pose([t, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0], t));
        }

        let latest_pose = hub.pose().get_latest().unwrap();
        assert_eq!(latest_pose.timestamp, 0.9);

        // IMU history covering the window since the last pose update.
        let tail = hub.imu().get_latest_period(latest_pose.timestamp);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[0].timestamp, 0.9);

        // Pose closest to an arbitrary IMU stamp.
        let aligned = hub.pose().get_closest(0.234).unwrap();
        assert!(aligned.in_range);
        assert_eq!(aligned.sample.timestamp, 0.2);
    }

    #[test]
    fn test_shared_across_threads() {
        let hub = Arc::new(DataHub::with_defaults());

        let imu_producer = {
            let hub = Arc::clone(&hub);
            std::thread::spawn(move || {
                for i in 0..600 {
                    let t = i as f64 * 0.01;
                    hub.imu().insert(ImuSample::new([0.0; 3], [0.0; 3], t));
                }
            })
        };
        let wheel_producer = {
            let hub = Arc::clone(&hub);
            std::thread::spawn(move || {
                for i in 0..100 {
                    let t = i as f64 * 0.05;
                    hub.wheel_odometry().insert(WheelOdometry::new(1.0, 1.0, t));
                }
            })
        };
        let consumer = {
            let hub = Arc::clone(&hub);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    if let Some(latest) = hub.imu().get_latest() {
                        let _ = hub.wheel_odometry().get_closest(latest.timestamp);
                    }
                }
            })
        };

        imu_producer.join().unwrap();
        wheel_producer.join().unwrap();
        consumer.join().unwrap();

        assert!(hub.imu().is_full());
        assert_eq!(hub.imu().size(), 500);
        assert_eq!(hub.wheel_odometry().size(), 100);
        assert_eq!(hub.steering().size(), 0);
    }
}
