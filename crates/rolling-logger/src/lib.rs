//! Rolling Logger
//!
//! `tracing` output to the browser console (stderr off wasm), with the
//! most recent formatted lines kept in a circular buffer so the app can
//! show them.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::Layer;

pub use tracing_subscriber::filter::LevelFilter;

static RECENT: OnceLock<RingBuffer> = OnceLock::new();

/// Fixed-capacity line buffer, oldest lines dropped first
#[derive(Clone, Debug)]
pub struct RingBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn guard(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let mut lines = self.guard();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<String> {
        self.guard().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }
}

/// `MakeWriter` that hands out one `LineWriter` per event
#[derive(Clone, Debug)]
pub struct ConsoleMakeWriter {
    buffer: RingBuffer,
    echo: bool,
}

impl ConsoleMakeWriter {
    pub fn new(buffer: RingBuffer) -> Self {
        Self { buffer, echo: true }
    }

    /// Keep lines only in the buffer
    pub fn quiet(buffer: RingBuffer) -> Self {
        Self { buffer, echo: false }
    }

    fn writer(&self, level: Level) -> LineWriter {
        LineWriter {
            target: self.clone(),
            level,
            bytes: Vec::new(),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        self.writer(*meta.level())
    }
}

/// Collects one formatted event, emits it when dropped
pub struct LineWriter {
    target: ConsoleMakeWriter,
    level: Level,
    bytes: Vec<u8>,
}

impl io::Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        if self.bytes.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.bytes).trim_end().to_string();
        if self.target.echo {
            emit(self.level, &line);
        }
        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        self.target.buffer.push(format!("{} {}", stamp, line));
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// fmt layer writing through `writer`. No timestamps from the formatter:
/// the system clock is unavailable on wasm, lines are stamped on buffering.
pub fn console_layer<S>(writer: ConsoleMakeWriter, level: LevelFilter) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .without_time()
        .with_target(true)
        .with_filter(level)
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_logger(capacity: usize, app_name: &str, level: LevelFilter) -> Result<(), TryInitError> {
    let buffer = RingBuffer::new(capacity);
    tracing_subscriber::registry()
        .with(console_layer(ConsoleMakeWriter::new(buffer.clone()), level))
        .try_init()?;
    let _ = RECENT.set(buffer);
    tracing::info!("{} logger ready, keeping {} lines", app_name, capacity);
    Ok(())
}

/// Lines kept by the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    RECENT.get().map(RingBuffer::lines).unwrap_or_default()
}
