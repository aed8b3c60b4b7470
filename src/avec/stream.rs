//! Push-based decoder implementation.

use either::Either::{Left, Right};
use log::{debug, warn};

use crate::sans::{
    Decoder,
    frame::{Frame, FramingError, Idle, MAX_FRAME_LEN, Receiving, Revision},
};

#[derive(Debug)]
enum State {
    Idle(Idle),
    Receiving(Receiving),
}

/// Bytes of a discarded frame waiting to be fed again.
#[derive(Debug, Default)]
struct Pending {
    buffer: [u8; MAX_FRAME_LEN],
    start: usize,
    end: usize,
}

impl Pending {
    fn pop(&mut self) -> Option<u8> {
        let b = *self.buffer[..self.end].get(self.start)?;
        self.start += 1;
        Some(b)
    }

    /// Queue bytes ahead of those still pending.
    ///
    /// Both spans follow the sync marker of the same discarded frame, so
    /// together they never exceed a frame.
    fn prepend(&mut self, r: &[u8]) {
        let mut buffer = [0; MAX_FRAME_LEN];
        let rest = &self.buffer[self.start..self.end];
        let mut end = 0;

        for (slot, &b) in buffer.iter_mut().zip(r.iter().chain(rest)) {
            *slot = b;
            end += 1;
        }

        *self = Self {
            buffer,
            start: 0,
            end,
        };
    }

    fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Recovers frames from a byte stream delivered in arbitrary pieces.
///
/// A discarded frame may have opened on a sync byte within noise. The bytes
/// it swallowed from the next sync marker onwards are fed again before any
/// further input, so a frame following noise is not lost.
#[derive(Debug)]
pub struct FrameDecoder {
    revision: Revision,
    state: State,
    pending: Pending,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(Revision::default())
    }
}

impl FrameDecoder {
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            state: State::Idle(Decoder::new(revision)),
            pending: Pending::default(),
        }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Whether the decoder is between frames with nothing left to feed again.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle(_)) && self.pending.is_empty()
    }

    /// Discard any partially received frame.
    pub fn reset(&mut self) {
        self.state = State::Idle(Decoder::new(self.revision));
        self.pending = Pending::default();
    }

    /// Feed a slice of bytes, iterating over the frames and framing errors
    /// they complete.
    ///
    /// Bytes may be delivered in pieces of any size, down to one at a time.
    pub fn frames<'a>(&'a mut self, r: &'a [u8]) -> Frames<'a> {
        Frames {
            decoder: self,
            r: r.iter(),
        }
    }

    fn step(&mut self, b: u8) -> Option<Result<Frame, FramingError>> {
        let idle = State::Idle(Decoder::new(self.revision));

        let (state, result) = match core::mem::replace(&mut self.state, idle) {
            State::Idle(state) => match state.advance(b) {
                Left(state) => (State::Idle(state), None),
                Right(state) => (State::Receiving(state), None),
            },
            State::Receiving(state) => match state.advance(b) {
                Left(state) => (State::Receiving(state), None),
                Right((state, result)) => (State::Idle(state), Some(result)),
            },
        };

        self.state = state;

        match result? {
            Ok(frame) => {
                debug!("Received {:?} frame: {:02x?}", frame.kind(), frame.payload());
                Some(Ok(frame))
            }
            Err(discarded) => {
                warn!("Discarding frame: {}", discarded.error);

                if !discarded.backlog.is_empty() {
                    debug!("Rescanning {:02x?}", discarded.backlog.as_slice());
                    self.pending.prepend(discarded.backlog.as_slice());
                }

                Some(Err(discarded.error))
            }
        }
    }
}

/// Iterator returned by [`FrameDecoder::frames`].
///
/// Bytes not consumed when the iterator is dropped are never fed. Bytes
/// queued from a discarded frame stay with the decoder and are fed first by
/// the next iterator.
#[derive(Debug)]
pub struct Frames<'a> {
    decoder: &'a mut FrameDecoder,
    r: core::slice::Iter<'a, u8>,
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame, FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let b = match self.decoder.pending.pop() {
                Some(b) => b,
                None => *self.r.next()?,
            };

            if let Some(result) = self.decoder.step(b) {
                return Some(result);
            }
        }
    }
}
