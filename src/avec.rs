//! Convenience decoders for common byte sources.
//!
//! [`FrameDecoder`] drives the finite-state machine of [`crate::sans`] one
//! byte at a time, keeping its state between calls so a frame may be split
//! across any number of reads. The functions in [`reader`] pull bytes from a
//! [`std::io::Read`] without blocking.

#[cfg(feature = "std")]
pub mod reader;
pub mod stream;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use stream::{FrameDecoder, Frames};
