//! Accumulation of decoded fields into one sensor state record.

use zerocopy::TryFromBytes;

/// Derive [`Merge`] for a struct holding optional field values.
///
/// Name the merged type in a `merge` attribute on the struct. Every field
/// must have type `Option<T>`, and is merged into the field of the same name,
/// or the one named in a `merge` attribute on the field. Fields holding
/// `None` leave their target untouched.
///
/// The generated impl names the trait unqualified, so the [`Merge`] trait
/// must be in scope wherever the derive is used. Importing
/// `freehub::state::Merge` brings both the trait and the derive.
///
/// ```
/// use freehub::state::{Merge, SensorState};
///
/// #[derive(Default, Merge)]
/// #[merge(SensorState)]
/// struct HeartRateOnly {
///     #[merge(heart_rate)]
///     bpm: Option<u8>,
/// }
/// ```
pub use freehub_derive::Merge;

/// Overwrite the fields of a target for which a partial value is present.
///
/// See the [`Merge`](macro@Merge) derive macro for an automatic
/// implementation of this trait.
pub trait Merge<T> {
    fn merge_into(&self, target: &mut T);
}

/// The latest known value of every telemetry field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorState {
    /// Elapsed time in seconds.
    pub elapsed_time: u16,
    /// Distance in meters.
    pub distance: u32,
    /// Instantaneous speed in km/h.
    pub speed: f32,
    /// Heart rate in beats per minute.
    pub heart_rate: u8,
    /// Instantaneous power in watts.
    pub instantaneous_power: u16,
    /// Accumulated power in watts, wrapping.
    pub accumulated_power: u16,
    /// Cadence in revolutions per minute.
    pub cadence: u8,
    /// Cycle length in meters.
    pub cycle_length: f32,
    /// Incline in percent.
    pub incline: f32,
    /// Resistance in percent of maximum.
    pub resistance: f32,
    /// Raw fitness equipment state, see [`SensorState::equipment_state`].
    pub fe_state: u8,
    /// Raw trainer status, see [`SensorState::training_phase`].
    pub trainer_status: u8,
    pub virtual_speed: bool,
    /// Share of power contributed by one pedal, in percent.
    pub pedal_power: u8,
    /// Whether the pedal power share belongs to the right pedal.
    pub right_pedal: bool,
    pub manufacturer_id: u16,
    pub model_number: u16,
    pub hardware_revision: u8,
    pub software_version: u16,
    pub serial_number: u32,
    /// Maximum resistance in newtons.
    pub max_resistance: u16,
    pub battery_status: u8,
    /// Whether any page has been decoded since creation or reset.
    pub has_data: bool,
}

impl SensorState {
    pub fn equipment_state(&self) -> Option<FeState> {
        zerocopy::try_transmute!(self.fe_state).ok()
    }

    pub fn training_phase(&self) -> Option<TrainerStatus> {
        zerocopy::try_transmute!(self.trainer_status).ok()
    }
}

/// Fields produced by a single page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Merge)]
#[merge(SensorState)]
pub struct Update {
    pub elapsed_time: Option<u16>,
    pub distance: Option<u32>,
    pub speed: Option<f32>,
    pub heart_rate: Option<u8>,
    pub instantaneous_power: Option<u16>,
    pub accumulated_power: Option<u16>,
    pub cadence: Option<u8>,
    pub cycle_length: Option<f32>,
    pub incline: Option<f32>,
    pub resistance: Option<f32>,
    pub fe_state: Option<u8>,
    pub trainer_status: Option<u8>,
    pub virtual_speed: Option<bool>,
    pub pedal_power: Option<u8>,
    pub right_pedal: Option<bool>,
    pub manufacturer_id: Option<u16>,
    pub model_number: Option<u16>,
    pub hardware_revision: Option<u8>,
    pub software_version: Option<u16>,
    pub serial_number: Option<u32>,
    pub max_resistance: Option<u16>,
    pub battery_status: Option<u8>,
}

/// Fitness equipment state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromBytes)]
pub enum FeState {
    Asleep = 1,
    Ready = 2,
    InUse = 3,
    Finished = 4,
}

/// Trainer activity.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromBytes)]
pub enum TrainerStatus {
    NoActivity = 0,
    WarmingUp = 1,
    Active = 2,
    Paused = 3,
    CoolingDown = 4,
}

/// Owner of the sensor state, written by the page decoder and read by the
/// encoder.
#[derive(Debug, Default)]
pub struct Aggregator {
    state: SensorState,
    new_data: bool,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the fields produced by a page, leaving all others untouched.
    pub fn apply(&mut self, update: &Update) {
        update.merge_into(&mut self.state);
        self.state.has_data = true;
        self.new_data = true;
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> SensorState {
        self.state
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    /// Zero every field, and clear both the `has_data` and new data flags.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Return whether a page was applied since the last call, clearing the
    /// flag.
    pub fn take_new_data(&mut self) -> bool {
        core::mem::take(&mut self.new_data)
    }
}
