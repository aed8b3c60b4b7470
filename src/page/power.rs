//! Bicycle power meter pages.

use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use super::field::Sentinel;
use crate::state::Update;

pub const POWER_MAIN_DATA: u8 = 0x10;

/// Extract pedal balance, cadence and power from the standard power page.
pub fn power_main_data(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct PowerMainData {
        _page: u8,
        _event_count: u8,
        pedal_power: u8,
        cadence: u8,
        accumulated_power: [u8; 2],
        instantaneous_power: [u8; 2],
    }

    bitfield! {
        struct PedalPower(u8) {
            [0..7] percent: u8,
            [7] right_known,
        }
    }

    let PowerMainData {
        pedal_power,
        cadence,
        accumulated_power,
        instantaneous_power,
        ..
    } = zerocopy::transmute!(*r);

    let pedal_power = PedalPower(pedal_power.valid().unwrap_or(0));

    Update {
        pedal_power: Some(pedal_power.percent()),
        right_pedal: Some(pedal_power.right_known()),
        cadence: Some(cadence.valid().unwrap_or(0)),
        accumulated_power: Some(u16::from_le_bytes(accumulated_power).valid().unwrap_or(0)),
        instantaneous_power: Some(u16::from_le_bytes(instantaneous_power).valid().unwrap_or(0)),
        ..Default::default()
    }
}
