//! Raw field values holding a 'not available' marker.

/// A primitive reserving its all-ones value to mean 'not transmitted'.
pub trait Sentinel: Sized + Copy + PartialEq {
    /// The value transmitted when a field is not available.
    const INVALID: Self;

    /// Return the value, unless it holds the 'not available' marker.
    fn valid(self) -> Option<Self> {
        if self != Self::INVALID {
            Some(self)
        } else {
            None
        }
    }
}

macro_rules! sentinel {
    ($t:ident, $invalid:ident) => {
        impl Sentinel for $t {
            const INVALID: Self = $t::$invalid;
        }
    };
}

sentinel!(u8, MAX);
sentinel!(u16, MAX);
sentinel!(u32, MAX);
sentinel!(i16, MAX);

/// 'Not available' marker of a 12-bit instantaneous power field.
pub const INVALID_POWER_12: u16 = 0x0FFF;
