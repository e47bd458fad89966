use std::{
    io::{self, ErrorKind},
    thread,
    time::{Duration, Instant},
};

use log::{debug, trace};
use thiserror::Error;

use super::{
    ByteStream, FrameLogger,
    frame::{
        ACK, ACK_OK, CHECK_BYTE, CHECK_FIELD_SIZE, CTRL_ACK, CTRL_DATA, CTRL_FIELD_SIZE,
        CTRL_RESET, Frame, FrameError, LEN_FIELD_SIZE, decode_length,
    },
    hex_str,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_PACING: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("control field: expected {expected} byte(s), read {read}")]
    CtrlField { expected: usize, read: usize },
    #[error("length field: expected {expected} byte(s), read {read}")]
    LenField { expected: usize, read: usize },
    #[error("information field: expected {expected} byte(s), read {read}")]
    InfField { expected: usize, read: usize },
    #[error("check field: expected {expected} byte(s), read {read}")]
    CheckField { expected: usize, read: usize },
    #[error("invalid check byte {0:#04x}")]
    Checksum(u8),
    #[error("ack carried non-success status {0:#04x}")]
    AckMismatch(u8),
    #[error("unexpected control byte {0:#04x}")]
    UnexpectedControl(u8),
    #[error("failed to encode block: {0}")]
    Frame(#[from] FrameError),
    #[error("Transport IO Error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    /// True when a field ran out of time before all of its bytes arrived.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            TransportError::CtrlField { .. }
                | TransportError::LenField { .. }
                | TransportError::InfField { .. }
                | TransportError::CheckField { .. }
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Control,
    Length,
    Information,
    Check,
}

impl Field {
    fn short_read(self, expected: usize, read: usize) -> TransportError {
        match self {
            Field::Control => TransportError::CtrlField { expected, read },
            Field::Length => TransportError::LenField { expected, read },
            Field::Information => TransportError::InfField { expected, read },
            Field::Check => TransportError::CheckField { expected, read },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Budget shared by every field of a single [`FrameTransport::receive`].
    pub timeout: Duration,
    /// Pause before each request of [`FrameTransport::run_batch`].
    pub pacing: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            pacing: DEFAULT_PACING,
        }
    }
}

/// Exchanges framed blocks with the bridge over a [`ByteStream`].
///
/// One transport per connection. It is not meant to be shared: every call assumes it is
/// the only user of the stream, and nothing of a frame survives past the call that
/// handled it.
pub struct FrameTransport<S: ByteStream, L: FrameLogger> {
    stream: S,
    logger: L,
    config: TransportConfig,
}

impl<S: ByteStream, L: FrameLogger> FrameTransport<S, L> {
    pub fn new(stream: S, logger: L, config: TransportConfig) -> Self {
        Self {
            stream,
            logger,
            config,
        }
    }

    pub fn with_defaults(stream: S, logger: L) -> Self {
        Self::new(stream, logger, TransportConfig::default())
    }

    pub fn config(&self) -> TransportConfig {
        self.config
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Sends `payload` and waits for the peer's acknowledgment.
    ///
    /// An empty payload is sent as a reset block. Returns the number of bytes put on
    /// the wire, framing included.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize, TransportError> {
        let frame = Frame::from_payload(payload);
        let bytes = frame.encode()?;
        debug!("sending block: {}", hex_str(&bytes));

        let written = self.write_all(&bytes)?;
        self.wait_for_ack()?;

        self.logger.log_send(frame.payload());
        Ok(written)
    }

    /// Blocks until the peer acknowledges the last block.
    ///
    /// Bytes are read one at a time with no deadline and anything before the ack
    /// control byte is discarded, so this may never return if the peer stays silent.
    /// Callers needing a bound must cancel from outside (e.g. by closing the stream).
    pub fn wait_for_ack(&mut self) -> Result<(), TransportError> {
        let mut byte = [0u8; 1];
        loop {
            self.read_blocking(&mut byte)?;
            if byte[0] == CTRL_ACK {
                break;
            }
            trace!("skipping stray byte {:#04x}", byte[0]);
        }

        self.read_blocking(&mut byte)?;
        if byte[0] != ACK_OK {
            return Err(TransportError::AckMismatch(byte[0]));
        }
        Ok(())
    }

    /// Receives one block within the configured timeout and acknowledges it.
    ///
    /// A reset block yields an empty payload. No ack is sent when any step fails.
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let deadline = Instant::now() + self.config.timeout;

        let ctrl = self.read_field(Field::Control, CTRL_FIELD_SIZE, deadline)?[0];
        let payload = match ctrl {
            CTRL_DATA => {
                let field = self.read_field(Field::Length, LEN_FIELD_SIZE, deadline)?;
                let len = decode_length([field[0], field[1], field[2]]);
                self.read_field(Field::Information, len, deadline)?
            }
            CTRL_RESET => Vec::new(),
            other => return Err(TransportError::UnexpectedControl(other)),
        };

        let check = self.read_field(Field::Check, CHECK_FIELD_SIZE, deadline)?[0];
        if check != CHECK_BYTE {
            return Err(TransportError::Checksum(check));
        }

        self.write_all(&ACK)?;
        self.logger.log_receive(&payload);
        Ok(payload)
    }

    pub fn reset(&mut self) -> Result<(), TransportError> {
        self.send(&[])?;
        self.logger.log_info("device reset");
        Ok(())
    }

    /// Sends every request in order and collects the matching responses.
    ///
    /// The first failure aborts the batch and is returned as is.
    pub fn run_batch<I, P>(&mut self, requests: I) -> Result<Vec<Vec<u8>>, TransportError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut responses = Vec::new();
        for request in requests {
            thread::sleep(self.config.pacing);
            self.logger.log_info("#################### sending request ####################");

            self.send(request.as_ref())?;
            responses.push(self.receive()?);
        }
        Ok(responses)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        let mut written = 0;
        while written < bytes.len() {
            match self.stream.write(&bytes[written..]) {
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.stream.flush()?;
        Ok(written)
    }

    fn read_field(
        &mut self,
        field: Field,
        len: usize,
        deadline: Instant,
    ) -> Result<Vec<u8>, TransportError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let mut buf = vec![0u8; len];

        let read = self.stream.read(&mut buf, Some(remaining))?;
        if read != len {
            return Err(field.short_read(len, read));
        }

        trace!("{field:?} field: {}", hex_str(&buf));
        Ok(buf)
    }

    fn read_blocking(&mut self, byte: &mut [u8; 1]) -> Result<(), TransportError> {
        if self.stream.read(byte, None)? == 0 {
            return Err(io::Error::from(ErrorKind::UnexpectedEof).into());
        }
        Ok(())
    }
}
