//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::io::{ErrorKind, Read};

use thiserror::Error;

use crate::{
    bridge::{Bridge, Console, Feed},
    sans::frame::{Frame, FramingError},
};

use super::FrameDecoder;

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Decode frames from the bytes a reader has available, publishing each
/// frame or framing error to a receiver.
///
/// Reading stops without error once the reader would block or reaches its
/// end; a partial frame is kept by the decoder for the next call. Returns the
/// number of bytes read.
///
/// This method is also re-exported as `freehub::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(
    r: &mut impl Read,
    decoder: &mut FrameDecoder,
    mut o: impl FnMut(Result<Frame, FramingError>),
) -> Result<usize, Error> {
    let mut read = 0;

    while let Some((buf, n)) = take(r)? {
        read += n;
        decoder.frames(&buf[..n]).for_each(&mut o);
    }

    Ok(read)
}

/// Feed the bytes a reader has available through a bridge.
///
/// Reading stops as for [`decode`].
///
/// _Requires Cargo feature `std`._
pub fn drain(
    r: &mut impl Read,
    bridge: &mut Bridge,
    console: &mut impl Console,
) -> Result<Feed, Error> {
    let mut feed = Feed::default();

    while let Some((buf, n)) = take(r)? {
        feed += bridge.feed(&buf[..n], console);
    }

    Ok(feed)
}

/// Take the next chunk of available bytes from a reader, or `None` once it
/// would block or has ended.
fn take(r: &mut impl Read) -> Result<Option<([u8; 64], usize)>, Error> {
    let mut buf = [0; 64];

    loop {
        return match r.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some((buf, n))),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(err) => Err(err.into()),
        };
    }
}
