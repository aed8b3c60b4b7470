//! Internal finite-state machine for recovering frames.
//!
//! This module is intended for applications that need fine control over how
//! bytes are pulled from the serial link. See [`crate::avec`] for decoders
//! covering common patterns.
//!
//! # Architecture
//!
//! Each state is represented by a non-copy token. Transition to another state
//! by calling the token's `advance` method with the next byte, which returns a
//! successor state token and, once a frame is complete, either the frame or
//! the reason it was discarded.
//!
//! ```text
//! Idle --sync--> Receiving --length, tag, payload--> Receiving --checksum--> Idle
//! ```
//!
//! Only the initial state, re-exported for convenience as [`Decoder`], can be
//! constructed. A discarded frame always leads back to [`frame::Idle`],
//! together with a [`frame::Backlog`] of the bytes it swallowed from the next
//! sync marker onwards. Feeding the backlog again before any further input
//! means neither a corrupt frame nor a sync byte within noise desynchronizes
//! the frames following it.
//!
//! Some areas of the decoding process are not represented in the finite-state
//! machine:
//!
//! - Pulling bytes from the link without blocking.
//!
//! - Interpreting the payload. Sensor payloads are ANT+ data pages, see
//! [`crate::page`] and [`crate::router`]; command payloads are text, see
//! [`crate::command`].

pub mod check;
pub mod frame;

/// Entrypoint to the finite-state machine.
pub type Decoder = frame::Idle;
