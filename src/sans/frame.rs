//! States recovering frames from the serial byte stream.

use either::Either::{self, Left, Right};
use thiserror::Error;

use super::check::compute_checksum;

/// Sync marker opening a sensor frame.
pub const SENSOR_SYNC: u8 = 0xA4;
/// Sync marker opening a local control command frame.
pub const COMMAND_SYNC: u8 = 0xF0;
/// Largest frame accepted, including sync, length, tag and checksum bytes.
pub const MAX_FRAME_LEN: usize = 32;
/// Payload length of every sensor frame.
pub const PAYLOAD_LEN: usize = 8;
/// Largest payload carried by any frame.
pub const MAX_PAYLOAD_LEN: usize = MAX_FRAME_LEN - 3;

/// Revision of the serial framing, deciding whether sensor frames carry a
/// device type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Revision {
    /// Frames carry no device type byte.
    Untagged,
    /// Sensor frames carry a device type byte following the length.
    #[default]
    Tagged,
}

impl Revision {
    /// Number of bytes surrounding the payload of a frame of the given kind.
    pub const fn overhead(self, kind: FrameKind) -> usize {
        if self.is_tagged(kind) { 4 } else { 3 }
    }

    const fn is_tagged(self, kind: FrameKind) -> bool {
        matches!((self, kind), (Revision::Tagged, FrameKind::Sensor))
    }
}

/// The kind of a frame, selected by its sync marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// An ANT+ data page forwarded by the radio bridge.
    Sensor,
    /// A text command addressed to the bridge itself.
    Command,
}

impl FrameKind {
    /// Identify the frame kind opened by a sync marker, if any.
    pub const fn from_sync(b: u8) -> Option<Self> {
        match b {
            SENSOR_SYNC => Some(Self::Sensor),
            COMMAND_SYNC => Some(Self::Command),
            _ => None,
        }
    }
}

/// An ANT+ device type, selecting how pages are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// A device type number without a known profile.
    Unknown,
    /// Bicycle power meter (11).
    PowerMeter,
    /// Fitness equipment, such as a smart trainer (17).
    FitnessEquipment,
    /// Heart rate monitor (120).
    HeartRate,
    /// Bicycle cadence sensor (122).
    BikeCadence,
    /// Bicycle speed sensor (123).
    BikeSpeed,
    /// Combined bicycle speed and cadence sensor (121).
    CombinedSpeedCadence,
    /// Stride based speed and distance monitor (124).
    StrideSpeed,
}

impl DeviceType {
    /// The ANT+ device type number, or zero if unknown.
    pub const fn number(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::PowerMeter => 11,
            Self::FitnessEquipment => 17,
            Self::HeartRate => 120,
            Self::CombinedSpeedCadence => 121,
            Self::BikeCadence => 122,
            Self::BikeSpeed => 123,
            Self::StrideSpeed => 124,
        }
    }
}

impl From<u8> for DeviceType {
    fn from(number: u8) -> Self {
        match number {
            11 => Self::PowerMeter,
            17 => Self::FitnessEquipment,
            120 => Self::HeartRate,
            121 => Self::CombinedSpeedCadence,
            122 => Self::BikeCadence,
            123 => Self::BikeSpeed,
            124 => Self::StrideSpeed,
            _ => Self::Unknown,
        }
    }
}

/// A validated frame, stripped of its sync, length and checksum bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    kind: FrameKind,
    device_type: Option<u8>,
    payload: [u8; MAX_PAYLOAD_LEN],
    len: u8,
}

impl Frame {
    /// The kind of frame, selected by its sync marker.
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// The device type tag, if this frame carried one.
    pub fn device_type(&self) -> Option<DeviceType> {
        self.device_type.map(DeviceType::from)
    }

    /// The payload, without the device type tag.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len as usize]
    }

    /// The payload as an ANT+ data page, if this is a sensor frame.
    pub fn page(&self) -> Option<&[u8; PAYLOAD_LEN]> {
        match self.kind {
            FrameKind::Sensor => self.payload().try_into().ok(),
            FrameKind::Command => None,
        }
    }
}

/// An error recovering a frame. The frame is discarded in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Calculated and found checksum values do not match.
    #[error("Calculated ({calculated:#04x}) and found ({found:#04x}) checksums do not match.")]
    Checksum { found: u8, calculated: u8 },
    /// A sensor frame declared a payload other than a single page.
    #[error("Sensor frame declared a payload of {0} bytes.")]
    MalformedLength(u8),
    /// The declared length does not fit the frame buffer.
    #[error("Declared length ({0}) exceeds the maximum frame size.")]
    Oversized(u8),
    /// More bytes arrived than the frame buffer holds.
    #[error("Frame buffer overflowed.")]
    Overflow,
}

/// A rejected frame, with the bytes to feed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discarded {
    pub error: FramingError,
    pub backlog: Backlog,
}

/// Bytes buffered by a rejected frame, from the first sync marker following
/// its own.
///
/// The sync marker of a rejected frame may have been noise, in which case a
/// real frame can begin among the bytes it swallowed. These bytes must be fed
/// again, ahead of any further input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backlog {
    buffer: [u8; MAX_FRAME_LEN],
    len: u8,
}

impl Backlog {
    fn after_sync(r: &[u8]) -> Self {
        let start = r
            .iter()
            .position(|&b| FrameKind::from_sync(b).is_some())
            .unwrap_or(r.len());
        let r = &r[start..];

        let mut buffer = [0; MAX_FRAME_LEN];
        let len = r.len().min(MAX_FRAME_LEN);
        buffer[..len].copy_from_slice(&r[..len]);

        Self {
            buffer,
            len: len as u8,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.len as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// State token waiting for a sync marker.
#[derive(Debug)]
pub struct Idle {
    revision: Revision,
}

impl Idle {
    /// Create the initial state for a framing revision.
    pub const fn new(revision: Revision) -> Self {
        Self { revision }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Transition to another state by examining a byte.
    ///
    /// Bytes other than a sync marker are ignored, returning this state.
    pub fn advance(self, b: u8) -> Either<Idle, Receiving> {
        let Some(kind) = FrameKind::from_sync(b) else {
            return Left(self);
        };

        let mut buffer = [0; MAX_FRAME_LEN];
        buffer[0] = b;

        Right(Receiving {
            revision: self.revision,
            kind,
            buffer,
            index: 1,
            expected: None,
        })
    }
}

/// State token accumulating the bytes of a frame.
#[derive(Debug)]
pub struct Receiving {
    revision: Revision,
    kind: FrameKind,
    buffer: [u8; MAX_FRAME_LEN],
    index: usize,
    expected: Option<usize>,
}

impl Receiving {
    /// The kind of frame being received.
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Number of bytes buffered so far, including the sync marker.
    pub fn received(&self) -> usize {
        self.index
    }

    /// Transition to another state by buffering a byte.
    ///
    /// Returns this state while the frame is incomplete. Otherwise returns an
    /// idle successor, with either the validated frame or the reason it was
    /// discarded and the [`Backlog`] to feed again.
    pub fn advance(mut self, b: u8) -> Either<Receiving, (Idle, Result<Frame, Discarded>)> {
        let Some(slot) = self.buffer.get_mut(self.index) else {
            return Right(self.discard(FramingError::Overflow));
        };

        *slot = b;
        self.index += 1;

        let expected = match self.expected {
            Some(expected) => expected,
            // The first byte after the sync marker declares the length.
            None => match self.declare(b) {
                Ok(expected) => *self.expected.insert(expected),
                Err(err) => return Right(self.discard(err)),
            },
        };

        if self.index < expected {
            return Left(self);
        }

        match self.finish() {
            Ok(frame) => Right((Idle::new(self.revision), Ok(frame))),
            Err(err) => Right(self.discard(err)),
        }
    }

    fn discard(self, error: FramingError) -> (Idle, Result<Frame, Discarded>) {
        let backlog = Backlog::after_sync(&self.buffer[1..self.index]);

        (Idle::new(self.revision), Err(Discarded { error, backlog }))
    }

    fn declare(&self, length: u8) -> Result<usize, FramingError> {
        if self.kind == FrameKind::Sensor && length as usize != PAYLOAD_LEN {
            Err(FramingError::MalformedLength(length))?;
        }

        let expected = length as usize + self.revision.overhead(self.kind);

        if expected > MAX_FRAME_LEN {
            Err(FramingError::Oversized(length))?;
        }

        Ok(expected)
    }

    fn finish(&self) -> Result<Frame, FramingError> {
        let end = self.index - 1;

        let found = self.buffer[end];
        let calculated = compute_checksum(0, &self.buffer[1..end]);

        if found != calculated {
            Err(FramingError::Checksum { found, calculated })?;
        }

        let tagged = self.revision.is_tagged(self.kind);
        let device_type = tagged.then_some(self.buffer[2]);
        let body = &self.buffer[if tagged { 3 } else { 2 }..end];

        let mut payload = [0; MAX_PAYLOAD_LEN];
        payload[..body.len()].copy_from_slice(body);

        Ok(Frame {
            kind: self.kind,
            device_type,
            payload,
            len: body.len() as u8,
        })
    }
}
