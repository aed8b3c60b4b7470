//! Serialization of sensor state into Fitness Machine Service payloads.
//!
//! The Indoor Bike Data payload has a single canonical layout, every integer
//! little-endian:
//!
//! | Offset | Size | Field                            | Unit      |
//! |--------|------|----------------------------------|-----------|
//! | 0      | 2    | Flags, [`INDOOR_BIKE_DATA_FLAGS`] |           |
//! | 2      | 2    | Instantaneous speed              | 0.01 km/h |
//! | 4      | 2    | Instantaneous cadence            | 0.5 rpm   |
//! | 6      | 3    | Total distance                   | m         |
//! | 9      | 2    | Resistance level, signed         | 0.1 %     |
//! | 11     | 2    | Instantaneous power, signed      | W         |
//! | 13     | 2    | Elapsed time                     | s         |
//!
//! Values outside the range of their field saturate.

use tartan_bitfield::bitfield;

use crate::state::SensorState;

pub mod status;

/// Fitness Machine Service.
pub const SERVICE_UUID: u16 = 0x1826;

/// Length of the Indoor Bike Data payload.
pub const INDOOR_BIKE_DATA_LEN: usize = 15;

/// Flags announcing the fields present in every Indoor Bike Data payload.
pub const INDOOR_BIKE_DATA_FLAGS: u16 = 0x0874;

/// A characteristic of the Fitness Machine Service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// Read only, see [`encode_feature`].
    FitnessMachineFeature,
    /// Notify, see [`encode_indoor_bike_data`].
    IndoorBikeData,
    /// Notify, see [`status::TrainingStatus`].
    TrainingStatus,
    /// Notify, see [`status::MachineStatus`].
    FitnessMachineStatus,
}

impl Characteristic {
    /// The 16-bit assigned number of this characteristic.
    pub const fn uuid(self) -> u16 {
        match self {
            Self::FitnessMachineFeature => 0x2ACC,
            Self::IndoorBikeData => 0x2AD2,
            Self::TrainingStatus => 0x2AD3,
            Self::FitnessMachineStatus => 0x2ADA,
        }
    }
}

bitfield! {
    struct IndoorBikeDataFlags(u16) {
        // Clear when instantaneous speed is present.
        [0] more_data,
        [2] cadence,
        [4] distance,
        [5] resistance,
        [6] power,
        [11] elapsed_time,
    }
}

fn indoor_bike_data_flags() -> u16 {
    let mut flags = IndoorBikeDataFlags(0);
    flags.set_more_data(false);
    flags.set_cadence(true);
    flags.set_distance(true);
    flags.set_resistance(true);
    flags.set_power(true);
    flags.set_elapsed_time(true);
    flags.0
}

/// Serialize a snapshot into an Indoor Bike Data payload.
pub fn encode_indoor_bike_data(s: &SensorState) -> [u8; INDOOR_BIKE_DATA_LEN] {
    // Float to integer casts saturate, adding a half rounds to nearest.
    let speed = (s.speed * 100.0 + 0.5) as u16;
    let cadence = u16::from(s.cadence) * 2;
    let distance = s.distance.min(0x00FF_FFFF).to_le_bytes();
    let resistance = (s.resistance * 10.0 + 0.5) as i16;
    let power = s.instantaneous_power.min(i16::MAX as u16) as i16;

    let mut data = [0; INDOOR_BIKE_DATA_LEN];
    data[0..2].copy_from_slice(&indoor_bike_data_flags().to_le_bytes());
    data[2..4].copy_from_slice(&speed.to_le_bytes());
    data[4..6].copy_from_slice(&cadence.to_le_bytes());
    data[6..9].copy_from_slice(&distance[..3]);
    data[9..11].copy_from_slice(&resistance.to_le_bytes());
    data[11..13].copy_from_slice(&power.to_le_bytes());
    data[13..15].copy_from_slice(&s.elapsed_time.to_le_bytes());
    data
}

/// Fitness machine features announced in [`encode_feature`].
pub const MACHINE_FEATURES: u32 = 0x0000_5086;

/// Serialize the static Fitness Machine Feature value.
///
/// Announces cadence, total distance, resistance level, elapsed time and
/// power measurement, and no target settings.
pub fn encode_feature() -> [u8; 8] {
    let mut data = [0; 8];
    data[0..4].copy_from_slice(&MACHINE_FEATURES.to_le_bytes());
    data
}
