pub mod protocol;
pub mod requests;

pub use protocol::{
    ByteStream, Frame, FrameLogger, FrameTransport, TransportConfig, TransportError,
};
pub use requests::{RequestError, load_requests, parse_hex};
