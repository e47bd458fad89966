use std::{
    io::{self, ErrorKind, Read, Write},
    net::TcpStream,
    time::{Duration, Instant},
};

/// Duplex byte channel the [`FrameTransport`](super::FrameTransport) runs over.
///
/// Implementations are allowed to short-write and to short-read on timeout; the
/// transport is responsible for looping and for turning short reads into errors.
pub trait ByteStream {
    /// Writes some prefix of `buf`, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()>;

    /// Reads up to `buf.len()` bytes.
    ///
    /// With `Some(timeout)` the call returns once `buf` is full or the timeout elapsed,
    /// whichever comes first; running out of time is not an error, the count is simply
    /// smaller than requested. `Some(Duration::ZERO)` only collects bytes that are
    /// already available. `None` blocks until `buf` is full or the stream ends.
    fn read(&mut self, buf: &mut [u8], timeout: Option<Duration>) -> io::Result<usize>;
}

/// Serial lines exposed over TCP (ser2net and friends).
impl ByteStream for TcpStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Option<Duration>) -> io::Result<usize> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut filled = 0;

        while filled < buf.len() {
            match deadline {
                None => {
                    self.set_nonblocking(false)?;
                    self.set_read_timeout(None)?;
                }
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        self.set_nonblocking(true)?;
                    } else {
                        self.set_nonblocking(false)?;
                        self.set_read_timeout(Some(remaining))?;
                    }
                }
            }

            match Read::read(self, &mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    break;
                }
                Err(e) => {
                    self.set_nonblocking(false)?;
                    return Err(e);
                }
            }
        }

        self.set_nonblocking(false)?;
        Ok(filled)
    }
}
