//! Computer-to-bridge communication protocol.
//!
//! This module implements the host side of the block protocol spoken with the card
//! bridge: T=1 blocks are wrapped in a small frame, written to a byte stream and
//! acknowledged by the far end.
//!
//! # Overview
//!
//! Every exchange is a [`FrameTransport::send`] followed by a [`FrameTransport::receive`].
//! Sending blocks until the bridge acknowledges the block; receiving reads the block field
//! by field under a single deadline and acknowledges it once the check byte is validated.
//!
//! # Key Components
//!
//! - [`Frame`]: In-memory representation of a data or reset block.
//! - [`FrameTransport`]: Stateful encoder/decoder bound to one [`ByteStream`].
//! - [`ByteStream`]: Minimal duplex stream contract the transport runs over.
//! - [`FrameLogger`]: Observer notified of every completed exchange.
//!
//! # Binary Format
//!
//! - Data block: control byte `0x00`, 3-byte big-endian length, payload, check byte `0x00`.
//! - Reset block: control byte `0x02`, check byte `0x00`.
//! - Acknowledgment: `0x05` followed by the status byte `0x00`.
//!
//! The check byte is not computed from the payload; any non-zero value is rejected.
//!
//! # Failure Model
//!
//! Nothing is retried. A field that does not arrive in time, a bad check byte or a bad
//! acknowledgment aborts the call with a [`TransportError`] and the caller decides
//! whether to try again.
mod frame;
mod logger;
mod stream;
mod transport;

pub use frame::{
    ACK, ACK_OK, CHECK_BYTE, CTRL_ACK, CTRL_DATA, CTRL_RESET, Frame, FrameError,
    MAX_PAYLOAD_LEN, decode_length, encode_length,
};
pub use logger::{FrameLogger, LogLogger, NoopLogger, hex_str};
pub use stream::ByteStream;
pub use transport::{FrameTransport, TransportConfig, TransportError};
