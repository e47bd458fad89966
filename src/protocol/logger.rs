use log::{error, info};

/// Observer notified of completed exchanges.
///
/// Calls are synchronous and never affect the outcome of an exchange.
pub trait FrameLogger {
    fn log_info(&mut self, msg: &str);
    fn log_send(&mut self, payload: &[u8]);
    fn log_receive(&mut self, payload: &[u8]);

    fn log_error(&mut self, _msg: &str) {}
}

/// Forwards exchanges to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

impl FrameLogger for LogLogger {
    fn log_info(&mut self, msg: &str) {
        info!("{msg}");
    }

    fn log_send(&mut self, payload: &[u8]) {
        info!("[SENT] {}", hex_str(payload));
    }

    fn log_receive(&mut self, payload: &[u8]) {
        info!("[RECV] {}", hex_str(payload));
    }

    fn log_error(&mut self, msg: &str) {
        error!("{msg}");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl FrameLogger for NoopLogger {
    fn log_info(&mut self, _msg: &str) {}
    fn log_send(&mut self, _payload: &[u8]) {}
    fn log_receive(&mut self, _payload: &[u8]) {}
}

/// Renders bytes as lower-case, space separated hex pairs: `00 40 06`.
pub fn hex_str(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<String>>()
        .join(" ")
}
