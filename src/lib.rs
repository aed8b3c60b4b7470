#![no_std]

//! A bridge from ANT+ fitness sensors to the Bluetooth Fitness Machine
//! Service.
//!
//! Freehub recovers ANT+ data pages from the byte stream of a serial radio
//! bridge, accumulates the telemetry they carry into a single sensor state,
//! and serializes that state into FTMS Indoor Bike Data and status
//! notifications for a training application.
//!
//! ```text
//! bytes -> sans / avec -> router / page -> state -> ftms -> transport
//! ```
//!
//! Most users should begin with [`bridge::Bridge`], which joins every stage
//! behind a non-blocking control loop. The stages are usable on their own: the
//! framing state machine in [`sans`] and its drivers in [`avec`], page
//! extraction in [`page`] and [`router`], the aggregator in [`state`], and
//! the encoders in [`ftms`].
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoding (default).

pub mod avec;
pub mod bridge;
pub mod command;
pub mod ftms;
pub mod page;
pub mod router;
pub mod sans;
pub mod state;
