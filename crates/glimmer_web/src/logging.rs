//! Routes `tracing` output to the browser console.
//!
//! Each event is formatted by `tracing-subscriber` into a [`ConsoleWriter`],
//! which emits the finished line through the console method matching the
//! event level. Off the browser the line goes to stderr.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Creates one [`ConsoleWriter`] per log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it on flush or drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    /// Creates an empty writer for an event at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            buf: Vec::with_capacity(128),
        }
    }

    /// Level the line will be emitted at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Buffered text without the trailing newline.
    #[must_use]
    pub fn line(&self) -> String {
        String::from_utf8_lossy(&self.buf).trim_end().to_owned()
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            emit(self.level, &self.line());
            self.buf.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    use web_sys::console;

    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{line}");
}

/// Installs the console subscriber. Returns `false` if a global subscriber
/// was already set.
pub fn init(max_level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(max_level)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Records the level of every writer the subscriber asks for.
    #[derive(Clone, Default)]
    struct LevelLog(Arc<Mutex<Vec<Level>>>);

    impl<'a> MakeWriter<'a> for LevelLog {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleMakeWriter.make_writer()
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            let writer = ConsoleMakeWriter.make_writer_for(meta);
            self.0.lock().unwrap().push(writer.level());
            writer
        }
    }

    #[test]
    fn test_writer_buffers_until_flush() {
        let mut writer = ConsoleWriter::new(Level::WARN);
        writeln!(writer, "rain started").unwrap();
        assert_eq!(writer.line(), "rain started");
        writer.flush().unwrap();
        assert_eq!(writer.line(), "");
    }

    #[test]
    fn test_writer_keeps_event_level() {
        let log = LevelLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_max_level(Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("rain container removed");
            tracing::debug!("pointer effects enabled");
        });

        assert_eq!(*log.0.lock().unwrap(), vec![Level::WARN, Level::DEBUG]);
        assert_eq!(ConsoleMakeWriter.make_writer().level(), Level::INFO);
    }

    #[test]
    fn test_init_is_once() {
        init(Level::DEBUG);
        assert!(!init(Level::DEBUG));
    }
}
