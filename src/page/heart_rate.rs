//! Heart rate monitor pages.

use zerocopy::FromBytes;

use super::field::Sentinel;
use crate::state::Update;

/// Identifiers of the heart rate data pages, once the toggle bit is masked.
pub const DATA_PAGES: [u8; 5] = [0x00, 0x01, 0x02, 0x03, 0x04];

/// The page toggle bit, flipped every fourth message by the monitor.
pub const TOGGLE: u8 = 0x80;

/// Extract the computed heart rate, which every data page carries.
pub fn heart_rate(r: &[u8; 8]) -> Update {
    #[repr(C, packed)]
    #[derive(FromBytes)]
    struct HeartRateData {
        _page: u8,
        _page_specific: [u8; 3],
        _event_time: [u8; 2],
        _beat_count: u8,
        heart_rate: u8,
    }

    let HeartRateData { heart_rate, .. } = zerocopy::transmute!(*r);

    Update {
        heart_rate: Some(heart_rate.valid().unwrap_or(0)),
        ..Default::default()
    }
}
