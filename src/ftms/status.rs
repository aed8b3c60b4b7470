//! Fitness Machine Status and Training Status notifications.
//!
//! Both are derived from changes between successive snapshots rather than
//! from the snapshots themselves, see [`StatusTracker`].

use crate::state::{FeState, SensorState, TrainerStatus};

/// A short notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    data: [u8; 3],
    len: u8,
}

impl Notification {
    fn new(bytes: &[u8]) -> Self {
        let mut data = [0; 3];
        data[..bytes.len()].copy_from_slice(bytes);

        Self {
            data,
            len: bytes.len() as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

impl AsRef<[u8]> for Notification {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Parameter of a stopped or paused event.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    Stop = 0x01,
    Pause = 0x02,
}

/// A Fitness Machine Status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineStatus {
    Reset,
    StoppedOrPaused(StopKind),
    StartedOrResumed,
    /// New target speed in 0.01 km/h.
    TargetSpeedChanged(u16),
    /// New target incline in 0.1 %.
    TargetInclineChanged(i16),
    /// New target resistance level in 0.1 %, as in Indoor Bike Data.
    TargetResistanceChanged(i16),
    /// New target power in watts.
    TargetPowerChanged(i16),
}

impl MachineStatus {
    pub const fn op_code(&self) -> u8 {
        match self {
            Self::Reset => 0x01,
            Self::StoppedOrPaused(_) => 0x02,
            Self::StartedOrResumed => 0x04,
            Self::TargetSpeedChanged(_) => 0x05,
            Self::TargetInclineChanged(_) => 0x06,
            Self::TargetResistanceChanged(_) => 0x07,
            Self::TargetPowerChanged(_) => 0x08,
        }
    }

    /// Serialize this event as an op code followed by its parameter.
    pub fn encode(&self) -> Notification {
        let op = self.op_code();

        match *self {
            Self::Reset | Self::StartedOrResumed => Notification::new(&[op]),
            Self::StoppedOrPaused(kind) => Notification::new(&[op, kind as u8]),
            Self::TargetSpeedChanged(v) => {
                let [lo, hi] = v.to_le_bytes();
                Notification::new(&[op, lo, hi])
            }
            Self::TargetInclineChanged(v)
            | Self::TargetResistanceChanged(v)
            | Self::TargetPowerChanged(v) => {
                let [lo, hi] = v.to_le_bytes();
                Notification::new(&[op, lo, hi])
            }
        }
    }
}

/// A Training Status value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    Other = 0x00,
    Idle = 0x01,
    WarmingUp = 0x02,
    CoolDown = 0x0B,
    ManualMode = 0x0D,
}

impl TrainingStatus {
    /// Translate a raw trainer status.
    pub fn from_trainer(raw: u8) -> Self {
        let phase: Option<TrainerStatus> = zerocopy::try_transmute!(raw).ok();

        match phase {
            Some(TrainerStatus::NoActivity | TrainerStatus::Paused) => Self::Idle,
            Some(TrainerStatus::WarmingUp) => Self::WarmingUp,
            Some(TrainerStatus::Active) => Self::ManualMode,
            Some(TrainerStatus::CoolingDown) => Self::CoolDown,
            None => Self::Other,
        }
    }

    /// Serialize as flags (no status string) followed by the status.
    pub fn encode(self) -> [u8; 2] {
        [0x00, self as u8]
    }
}

/// The notifications owed to the central after a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusReport {
    machine: [Option<MachineStatus>; 6],
    /// The new training status, if it changed.
    pub training: Option<TrainingStatus>,
}

impl StatusReport {
    fn push(&mut self, status: MachineStatus) {
        if let Some(slot) = self.machine.iter_mut().find(|s| s.is_none()) {
            *slot = Some(status);
        }
    }

    /// Fitness Machine Status events, in the order they should be sent.
    pub fn machine(&self) -> impl Iterator<Item = MachineStatus> + '_ {
        self.machine.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.machine.iter().all(Option::is_none) && self.training.is_none()
    }
}

// Snapshot values in the units they are notified in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Reported {
    fe_state: u8,
    trainer_status: u8,
    speed: u16,
    incline: i16,
    resistance: i16,
    power: i16,
}

impl From<&SensorState> for Reported {
    fn from(s: &SensorState) -> Self {
        // Float to integer casts saturate; adding a half rounds to nearest
        // away from zero.
        let round = |v: f32| if v < 0.0 { v - 0.5 } else { v + 0.5 };

        Self {
            fe_state: s.fe_state,
            trainer_status: s.trainer_status,
            speed: round(s.speed * 100.0) as u16,
            incline: round(s.incline * 10.0) as i16,
            resistance: round(s.resistance * 10.0) as i16,
            power: s.instantaneous_power.min(i16::MAX as u16) as i16,
        }
    }
}

/// Derives status notifications from changes between snapshots.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<Reported>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous snapshot, as after the central disconnects.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Compare a snapshot with the previous one, returning the notifications
    /// it warrants.
    ///
    /// Equipment state and trainer status produce events when they change,
    /// or on the first snapshot. Speed, incline, resistance and power produce
    /// target changed events when nonzero and different from the previous
    /// snapshot.
    pub fn update(&mut self, s: &SensorState) -> StatusReport {
        let current = Reported::from(s);
        let last = self.last.replace(current);

        let mut report = StatusReport::default();

        if last.is_none_or(|l| l.fe_state != current.fe_state) {
            match s.equipment_state() {
                Some(FeState::Ready) => report.push(MachineStatus::Reset),
                Some(FeState::InUse) => report.push(MachineStatus::StartedOrResumed),
                Some(FeState::Asleep | FeState::Finished) => {
                    report.push(MachineStatus::StoppedOrPaused(StopKind::Stop))
                }
                None => {}
            }
        }

        if last.is_none_or(|l| l.trainer_status != current.trainer_status) {
            if s.training_phase() == Some(TrainerStatus::Paused) {
                report.push(MachineStatus::StoppedOrPaused(StopKind::Pause));
            }

            report.training = Some(TrainingStatus::from_trainer(current.trainer_status));
        }

        let last = last.unwrap_or_default();

        if current.speed != 0 && current.speed != last.speed {
            report.push(MachineStatus::TargetSpeedChanged(current.speed));
        }
        if current.incline != 0 && current.incline != last.incline {
            report.push(MachineStatus::TargetInclineChanged(current.incline));
        }
        if current.resistance != 0 && current.resistance != last.resistance {
            report.push(MachineStatus::TargetResistanceChanged(current.resistance));
        }
        if current.power != 0 && current.power != last.power {
            report.push(MachineStatus::TargetPowerChanged(current.power));
        }

        report
    }
}
