pub mod entry;
pub mod format;
pub mod properties;
pub mod staleness;

pub use entry::{parse_entries, Entry};
pub use format::{format_history_row, format_status, DisplayPrefs, Units};
pub use properties::OtherInfo;
pub use staleness::{is_stale, DEFAULT_STALE_THRESHOLD_MIN};

#[cfg(test)]
pub(crate) mod test_log {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Runs `f` with a thread-local subscriber and returns what it logged,
    /// one event per line.
    pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        let lines = String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect();
        (out, lines)
    }
}
