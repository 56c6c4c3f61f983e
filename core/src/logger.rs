//! Debug output sinks.
//!
//! The client only calls a [`Logger`] when debug output is switched on, so a
//! sink never has to check the flag itself.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Receives one pre-formatted debug line at a time.
pub trait Logger: Send + Sync {
    fn print(&self, message: &str);
}

impl<T: Logger + ?Sized> Logger for Arc<T> {
    fn print(&self, message: &str) {
        (**self).print(message);
    }
}

/// Forwards debug lines to `tracing` under the `hawkflow` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn print(&self, message: &str) {
        tracing::debug!(target: "hawkflow", "{}", message.trim_end());
    }
}

/// Writes `<prefix><message>` to any writer, adding a newline when the
/// message does not end with one.
pub struct WriterLogger {
    prefix: String,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl WriterLogger {
    pub fn new(writer: impl Write + Send + 'static, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr(), "hawkflow ")
    }
}

impl std::fmt::Debug for WriterLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterLogger").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

impl Logger for WriterLogger {
    fn print(&self, message: &str) {
        let mut line = String::with_capacity(self.prefix.len() + message.len() + 1);
        line.push_str(&self.prefix);
        line.push_str(message);
        if !line.ends_with('\n') {
            line.push('\n');
        }

        // A poisoned lock only means another thread panicked mid-write.
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Debug output is best-effort; the caller's result never depends on it.
        let _ = writer.write_all(line.as_bytes()).and_then(|()| writer.flush());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_logger_appends_newline() {
        let buffer = SharedBuffer::default();
        let logger = WriterLogger::new(buffer.clone(), "");
        logger.print("HF test log message");
        assert_eq!(buffer.contents(), "HF test log message\n");
    }

    #[test]
    fn writer_logger_keeps_existing_newline() {
        let buffer = SharedBuffer::default();
        let logger = WriterLogger::new(buffer.clone(), "hawkflow ");
        logger.print("HF done\n");
        logger.print("HF again");
        assert_eq!(buffer.contents(), "hawkflow HF done\nhawkflow HF again\n");
    }

    #[test]
    fn tracing_logger_accepts_messages_without_subscriber() {
        TracingLogger.print("HF no subscriber installed");
    }
}
