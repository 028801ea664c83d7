//! Command fragmentation
//!
//! Wire form of a command:
//! - DATA: UTF-8 text followed by exactly one 0x00 byte
//! - FRAGMENTS: DATA cut into consecutive slices of at most 20 bytes
//!
//! Fragments are only meaningful in order. The writer must send them one at
//! a time and must not interleave fragments of another command.

use heapless::Vec;

use crate::command::{CommandError, MAX_COMMAND_LEN};

/// Largest payload of a single BLE write on this link
pub const FRAGMENT_SIZE: usize = 20;

/// Command text plus NUL terminator
pub const MAX_DATA_LEN: usize = MAX_COMMAND_LEN + 1;

/// Serialized command bytes
pub type CommandData = Vec<u8, MAX_DATA_LEN>;

/// Serialize command text into its NUL-terminated wire form
pub fn command_data(text: &str) -> Result<CommandData, CommandError> {
    let mut data = CommandData::new();
    data.extend_from_slice(text.as_bytes())
        .map_err(|_| CommandError::TooLong)?;
    data.push(0).map_err(|_| CommandError::TooLong)?;
    Ok(data)
}

/// Number of fragments needed for `len` bytes of data
pub const fn fragment_count(len: usize) -> usize {
    len.div_ceil(FRAGMENT_SIZE)
}

/// One ordered slice of a command's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fragment<'a> {
    /// Position within the command (0-based)
    pub index: usize,
    /// Bytes to write, never longer than [`FRAGMENT_SIZE`]
    pub bytes: &'a [u8],
}

/// Iterator over the fragments of serialized command data
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    chunks: core::slice::Chunks<'a, u8>,
    index: usize,
}

impl<'a> Fragments<'a> {
    /// Fragment already serialized data
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            chunks: data.chunks(FRAGMENT_SIZE),
            index: 0,
        }
    }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.chunks.next()?;
        let fragment = Fragment {
            index: self.index,
            bytes,
        };
        self.index += 1;
        Some(fragment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Fragments<'_> {}
