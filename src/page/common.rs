//! Common pages, valid for every device type.

use log::debug;
use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use super::field::Sentinel;
use crate::state::Update;

pub const MANUFACTURER_ID: u8 = 0x50;
pub const PRODUCT_INFO: u8 = 0x51;
pub const BATTERY_STATUS: u8 = 0x52;

/// Extract hardware revision, manufacturer and model number.
pub fn manufacturer_id(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct ManufacturerId {
        _page: u8,
        _reserved: [u8; 2],
        hardware_revision: u8,
        manufacturer_id: [u8; 2],
        model_number: [u8; 2],
    }

    let ManufacturerId {
        hardware_revision,
        manufacturer_id,
        model_number,
        ..
    } = zerocopy::transmute!(*r);

    Update {
        hardware_revision: Some(hardware_revision.valid().unwrap_or(0)),
        manufacturer_id: Some(u16::from_le_bytes(manufacturer_id).valid().unwrap_or(0)),
        model_number: Some(u16::from_le_bytes(model_number).valid().unwrap_or(0)),
        ..Default::default()
    }
}

/// Extract software version and serial number.
///
/// The version is `main * 100 + supplemental`, or `main` alone when the
/// supplemental revision is zero.
pub fn product_info(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct ProductInfo {
        _page: u8,
        _reserved: u8,
        supplemental: u8,
        main: u8,
        serial_number: [u8; 4],
    }

    let ProductInfo {
        supplemental,
        main,
        serial_number,
        ..
    } = zerocopy::transmute!(*r);

    let software_version = if supplemental != 0 {
        u16::from(main) * 100 + u16::from(supplemental)
    } else {
        u16::from(main)
    };

    Update {
        software_version: Some(software_version),
        serial_number: Some(u32::from_le_bytes(serial_number).valid().unwrap_or(0)),
        ..Default::default()
    }
}

/// Extract the battery descriptor byte, kept verbatim.
pub fn battery_status(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct BatteryStatus {
        _page: u8,
        _reserved: u8,
        _identifier: u8,
        _operating_time: [u8; 3],
        _fractional_voltage: u8,
        descriptor: u8,
    }

    bitfield! {
        struct Descriptor(u8) {
            [0..4] coarse_voltage: u8,
            [4..7] status: u8,
        }
    }

    let BatteryStatus { descriptor, .. } = zerocopy::transmute!(*r);

    let decoded = Descriptor(descriptor);
    debug!(
        "Battery coarse voltage {} V, status {}",
        decoded.coarse_voltage(),
        decoded.status()
    );

    Update {
        battery_status: Some(descriptor),
        ..Default::default()
    }
}
