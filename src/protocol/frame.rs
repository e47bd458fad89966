//! Wire representation of a bridge block.
//!
//! A data block is laid out as:
//!
//! | Field   | Size             |
//! |---------|------------------|
//! | Control | 1 (`0x00`)       |
//! | Length  | 3, big-endian    |
//! | Payload | `Length` bytes   |
//! | Check   | 1 (`0x00`)       |
//!
//! A reset block is only the control byte `0x02` followed by the check byte.
use thiserror::Error;

pub const CTRL_DATA: u8 = 0x00;
pub const CTRL_RESET: u8 = 0x02;
pub const CTRL_ACK: u8 = 0x05;
pub const ACK_OK: u8 = 0x00;
pub const CHECK_BYTE: u8 = 0x00;

pub const CTRL_FIELD_SIZE: usize = 1;
pub const LEN_FIELD_SIZE: usize = 3;
pub const CHECK_FIELD_SIZE: usize = 1;

pub const ACK: [u8; 2] = [CTRL_ACK, ACK_OK];

/// Largest payload the 3-byte length field can describe.
pub const MAX_PAYLOAD_LEN: usize = (1 << (8 * LEN_FIELD_SIZE)) - 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("payload of {0} bytes does not fit a 3-byte length field")]
    PayloadTooLarge(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(Vec<u8>),
    Reset,
}

impl Frame {
    /// An empty payload always becomes a reset block, never a zero-length data block.
    pub fn from_payload(payload: &[u8]) -> Self {
        if payload.is_empty() {
            Frame::Reset
        } else {
            Frame::Data(payload.to_vec())
        }
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Frame::Data(payload) => payload,
            Frame::Reset => &[],
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, FrameError> {
        match self {
            Frame::Reset => Ok(vec![CTRL_RESET, CHECK_BYTE]),
            Frame::Data(payload) => {
                let length = encode_length(payload.len())?;
                let mut bytes =
                    Vec::with_capacity(CTRL_FIELD_SIZE + LEN_FIELD_SIZE + payload.len() + 1);
                bytes.push(CTRL_DATA);
                bytes.extend_from_slice(&length);
                bytes.extend_from_slice(payload);
                bytes.push(CHECK_BYTE);
                Ok(bytes)
            }
        }
    }
}

pub fn encode_length(len: usize) -> Result<[u8; LEN_FIELD_SIZE], FrameError> {
    if len > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge(len));
    }
    let [_, hi, mid, lo] = (len as u32).to_be_bytes();
    Ok([hi, mid, lo])
}

pub fn decode_length(field: [u8; LEN_FIELD_SIZE]) -> usize {
    let [hi, mid, lo] = field;
    u32::from_be_bytes([0, hi, mid, lo]) as usize
}
