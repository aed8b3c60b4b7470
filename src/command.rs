//! Local control commands sharing the serial link with sensor frames.
//!
//! Commands are ASCII text carried in frames opened by
//! [`COMMAND_SYNC`](crate::sans::frame::COMMAND_SYNC). This module only parses
//! them; executing a command is left to a [`Console`](crate::bridge::Console).

use core::ops::RangeInclusive;

use thiserror::Error;

/// Accepted lengths of a device name.
pub const NAME_LEN: RangeInclusive<usize> = 3..=20;

/// A parsed control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Persist a new advertised name and reboot.
    SetName(&'a str),
    Reboot,
    Status,
    Help,
}

/// An error parsing a control command. The command is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The frame carried no text.
    #[error("Command frame was empty.")]
    Empty,
    /// The frame carried bytes other than ASCII text.
    #[error("Command frame is not ASCII text.")]
    NotText,
    /// The command word was not recognized.
    #[error("Unknown command.")]
    Unknown,
    /// The name given to `SETNAME` has an unacceptable length.
    #[error("Name must have between 3 and 20 characters, found {0}.")]
    NameLength(usize),
}

impl<'a> Command<'a> {
    /// Parse a command from the payload of a command frame.
    ///
    /// Command words are matched without regard to case. Trailing line
    /// endings and padding are ignored.
    pub fn parse(payload: &'a [u8]) -> Result<Self, CommandError> {
        if !payload.is_ascii() {
            Err(CommandError::NotText)?;
        }

        let text = core::str::from_utf8(payload).map_err(|_| CommandError::NotText)?;
        let text = text.trim_end_matches(['\r', '\n', '\0']).trim();

        if text.is_empty() {
            Err(CommandError::Empty)?;
        }

        let (word, argument) = text.split_once(' ').unwrap_or((text, ""));

        let command = if word.eq_ignore_ascii_case("SETNAME") {
            let name = argument.trim();

            if !NAME_LEN.contains(&name.len()) {
                Err(CommandError::NameLength(name.len()))?;
            }

            Self::SetName(name)
        } else if word.eq_ignore_ascii_case("REBOOT") {
            Self::Reboot
        } else if word.eq_ignore_ascii_case("STATUS") {
            Self::Status
        } else if word.eq_ignore_ascii_case("HELP") {
            Self::Help
        } else {
            Err(CommandError::Unknown)?
        };

        Ok(command)
    }
}
