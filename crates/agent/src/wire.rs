// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format encoding/decoding for the orchestrator socket.
//!
//! Wire format: one JSON object per line, UTF-8, `\n`-terminated. A partial
//! trailing fragment is buffered until the next read.

use pc_core::IpcMessage;
use thiserror::Error;

/// Maximum frame size (8 MB)
pub const MAX_FRAME_SIZE: usize = 8 * 1024 * 1024;

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },
}

/// Encode a message as one newline-terminated JSON frame.
pub fn encode(msg: &IpcMessage) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = serde_json::to_vec(msg)?;
    if bytes.len() >= MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: bytes.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    bytes.push(b'\n');
    Ok(bytes)
}

/// Decode one frame (without its newline terminator).
pub fn decode_line(line: &[u8]) -> Result<IpcMessage, ProtocolError> {
    Ok(serde_json::from_slice(line)?)
}

/// Splits an inbound byte stream into complete frames.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    /// Append received bytes.
    ///
    /// A frame that outgrows [`MAX_FRAME_SIZE`] without a newline is
    /// discarded and reported; the decoder stays usable.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        self.buf.extend_from_slice(bytes);
        if self.buf.len() > MAX_FRAME_SIZE && !self.buf.contains(&b'\n') {
            let size = self.buf.len();
            self.buf.clear();
            return Err(ProtocolError::FrameTooLarge {
                size,
                max: MAX_FRAME_SIZE,
            });
        }
        Ok(())
    }

    /// Next complete frame, skipping blank lines. `None` until more bytes arrive.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        loop {
            let pos = self.buf.iter().position(|&b| b == b'\n')?;
            let mut line = self.buf[..pos].to_vec();
            self.buf.drain(..=pos);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.iter().any(|b| !b.is_ascii_whitespace()) {
                return Some(line);
            }
        }
    }

    /// Drop any buffered partial frame (used across reconnects).
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Bytes of the buffered partial frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
