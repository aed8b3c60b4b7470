//! ANT+ data page layouts.
//!
//! Every page is a fixed 8-byte payload whose first byte identifies its
//! layout. The same identifier may mean different layouts for different
//! device types, so extraction is selected by [`crate::router`]. Each
//! extractor produces an [`Update`](crate::state::Update) holding only the
//! fields its page carries.
//!
//! Fields transmitted with their 'not available' marker decode to the
//! documented default (zero), see [`field::Sentinel`].

use core::ops::RangeInclusive;

pub mod common;
pub mod field;
pub mod fitness;
pub mod heart_rate;
pub mod power;

/// Identifiers of pages valid for every device type.
pub const COMMON_PAGES: RangeInclusive<u8> = 0x50..=0x54;

/// Whether a page identifier belongs to the common range.
pub fn is_common(page: u8) -> bool {
    COMMON_PAGES.contains(&page)
}

/// The layouts understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// Fitness equipment page 0x10.
    GeneralFeData,
    /// Fitness equipment page 0x11, general settings.
    TrainerStatus,
    /// Fitness equipment page 0x19, specific trainer data.
    TrainerData,
    /// Fitness equipment page 0x36.
    Capabilities,
    /// Common page 0x50.
    ManufacturerId,
    /// Common page 0x51.
    ProductInfo,
    /// Common page 0x52.
    BatteryStatus,
    /// Power meter page 0x10, standard power only.
    PowerMainData,
    /// Heart rate pages 0x00 to 0x04.
    HeartRate,
}
