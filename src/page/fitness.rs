//! Fitness equipment pages.

use log::debug;
use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use super::field::{INVALID_POWER_12, Sentinel};
use crate::state::Update;

pub const GENERAL_FE_DATA: u8 = 0x10;
pub const GENERAL_SETTINGS: u8 = 0x11;
pub const TRAINER_DATA: u8 = 0x19;
pub const CAPABILITIES: u8 = 0x36;

// Final byte of every fitness equipment page.
bitfield! {
    struct StateByte(u8) {
        [0] virtual_speed,
        [4..8] fe_state: u8,
    }
}

/// Extract elapsed time, distance, speed, heart rate and equipment state.
pub fn general_fe_data(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct GeneralFeData {
        _page: u8,
        _equipment_type: u8,
        elapsed_time: u8,
        distance: u8,
        speed: [u8; 2],
        heart_rate: u8,
        state: u8,
    }

    let GeneralFeData {
        elapsed_time,
        distance,
        speed,
        heart_rate,
        state,
        ..
    } = zerocopy::transmute!(*r);

    // Elapsed time counts quarter seconds; speed counts millimetres per second.
    let elapsed_time = elapsed_time
        .valid()
        .map_or(0, |t| (f32::from(t) * 0.25) as u16);
    let speed = u16::from_le_bytes(speed)
        .valid()
        .map_or(0.0, |s| f32::from(s) * 0.001 * 3.6);

    Update {
        elapsed_time: Some(elapsed_time),
        distance: Some(distance.valid().map_or(0, u32::from)),
        speed: Some(speed),
        heart_rate: Some(heart_rate.valid().unwrap_or(0)),
        fe_state: Some(StateByte(state).fe_state()),
        ..Default::default()
    }
}

/// Extract cadence, power, trainer status and equipment state.
pub fn trainer_data(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct TrainerData {
        _page: u8,
        _event_count: u8,
        cadence: u8,
        accumulated_power: [u8; 2],
        power_lsb: u8,
        power_msb: u8,
        state: u8,
    }

    let TrainerData {
        cadence,
        accumulated_power,
        power_lsb,
        power_msb,
        state,
        ..
    } = zerocopy::transmute!(*r);

    // Power spans the whole of one byte and the low nibble of the next, which
    // also holds the trainer status in its low three bits.
    let instantaneous_power = u16::from(power_lsb) | u16::from(power_msb & 0x0F) << 8;
    let instantaneous_power = if instantaneous_power != INVALID_POWER_12 {
        instantaneous_power
    } else {
        0
    };

    let state = StateByte(state);

    Update {
        cadence: Some(cadence.valid().unwrap_or(0)),
        accumulated_power: Some(u16::from_le_bytes(accumulated_power).valid().unwrap_or(0)),
        instantaneous_power: Some(instantaneous_power),
        trainer_status: Some(power_msb & 0x07),
        virtual_speed: Some(state.virtual_speed()),
        fe_state: Some(state.fe_state()),
        ..Default::default()
    }
}

/// Extract cycle length, incline, resistance and equipment state.
pub fn general_settings(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct GeneralSettings {
        _page: u8,
        _reserved: [u8; 2],
        cycle_length: u8,
        incline: [u8; 2],
        resistance: u8,
        state: u8,
    }

    let GeneralSettings {
        cycle_length,
        incline,
        resistance,
        state,
        ..
    } = zerocopy::transmute!(*r);

    let cycle_length = cycle_length.valid().map_or(0.0, |c| f32::from(c) * 0.01);
    let incline = i16::from_le_bytes(incline)
        .valid()
        .map_or(0.0, |i| f32::from(i) * 0.01);
    let resistance = resistance.valid().map_or(0.0, |r| f32::from(r) * 0.5);

    Update {
        cycle_length: Some(cycle_length),
        incline: Some(incline),
        resistance: Some(resistance),
        fe_state: Some(StateByte(state).fe_state()),
        ..Default::default()
    }
}

/// Training modes and limits reported by fitness equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Maximum resistance in newtons.
    pub max_resistance: u16,
    pub simulation: bool,
    pub erg: bool,
    pub resistance: bool,
    pub wind: bool,
    pub track: bool,
}

impl Capabilities {
    /// Decode the equipment capabilities page.
    pub fn from_page(r: &[u8; 8]) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct CapabilitiesPage {
            _page: u8,
            _reserved: [u8; 4],
            max_resistance: [u8; 2],
            modes: u8,
        }

        bitfield! {
            struct Modes(u8) {
                [0] simulation,
                [1] erg,
                [2] resistance,
                [3] wind,
                [4] track,
            }
        }

        let CapabilitiesPage {
            max_resistance,
            modes,
            ..
        } = zerocopy::transmute!(*r);

        let modes = Modes(modes);

        Self {
            max_resistance: u16::from_le_bytes(max_resistance).valid().unwrap_or(0),
            simulation: modes.simulation(),
            erg: modes.erg(),
            resistance: modes.resistance(),
            wind: modes.wind(),
            track: modes.track(),
        }
    }
}

/// Extract the maximum resistance. Training modes are logged, not kept.
pub fn capabilities(r: &[u8; 8]) -> Update {
    let capabilities = Capabilities::from_page(r);

    debug!("Equipment capabilities: {capabilities:?}");

    Update {
        max_resistance: Some(capabilities.max_resistance),
        ..Default::default()
    }
}
