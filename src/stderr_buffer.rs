use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Activate buffering. While active, log lines are stored instead of
/// being printed to stderr.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected lines.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Stderr sink for the log subscriber that honors the buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

impl Write for BufferedStderr {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let mut guard = lock();
        match guard.as_mut() {
            Some(buf) => {
                let text = String::from_utf8_lossy(bytes);
                buf.extend(text.lines().map(str::to_string));
                Ok(bytes.len())
            }
            None => {
                drop(guard);
                io::stderr().write(bytes)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for BufferedStderr {
    type Writer = BufferedStderr;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the global buffer so parallel tests cannot interleave
    #[test]
    fn test_buffering_lifecycle() {
        activate();
        let mut writer = BufferedStderr;
        writer.write_all(b"first\n").unwrap();
        writer.write_all(b"second\nthird\n").unwrap();

        let lines = drain();
        assert_eq!(lines, vec!["first", "second", "third"]);
        // Drained: later writes go straight to stderr
        assert!(drain().is_empty());
    }
}
