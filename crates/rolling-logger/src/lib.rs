//! Rolling Logger
//!
//! A `tracing` layer that keeps the most recent log records in a circular
//! buffer and, in the browser, mirrors each record to the devtools console.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{DateTime, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Default number of records kept
pub const DEFAULT_CAPACITY: usize = 500;

/// A captured log record
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Shared circular buffer of records
#[derive(Clone, Debug)]
pub struct LogBuffer {
    records: Arc<Mutex<VecDeque<LogRecord>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest when full
    pub fn push(&self, record: LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            if records.len() == self.capacity {
                records.pop_front();
            }
            records.push_back(record);
        }
    }

    /// Oldest-first copy of the buffered records
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects the `message` field and renders the rest as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Layer writing every event into a [`LogBuffer`]
pub struct RollingLayer {
    buffer: LogBuffer,
    console: bool,
}

impl RollingLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer, console: cfg!(target_arch = "wasm32") }
    }

    /// Disable the console mirror (records are only buffered)
    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        let record = LogRecord {
            timestamp: Utc::now(),
            level: *meta.level(),
            target: meta.target().to_string(),
            message: format!("{}{}", visitor.message, visitor.fields),
        };
        if self.console {
            write_console(&record);
        }
        self.buffer.push(record);
    }
}

#[cfg(target_arch = "wasm32")]
fn write_console(record: &LogRecord) {
    let line = wasm_bindgen::JsValue::from_str(&record.to_string());
    if record.level == Level::ERROR {
        web_sys::console::error_1(&line);
    } else if record.level == Level::WARN {
        web_sys::console::warn_1(&line);
    } else if record.level == Level::INFO {
        web_sys::console::log_1(&line);
    } else {
        web_sys::console::debug_1(&line);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(record: &LogRecord) {
    eprintln!("{record}");
}

static GLOBAL_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// Install the rolling layer as the global subscriber.
/// Calling it again returns the already installed buffer.
pub fn init(capacity: usize, max_level: Level) -> LogBuffer {
    GLOBAL_BUFFER
        .get_or_init(|| {
            let buffer = LogBuffer::new(capacity);
            // Fails only when another global subscriber is already installed
            let _ = tracing_subscriber::registry()
                .with(LevelFilter::from_level(max_level))
                .with(RollingLayer::new(buffer.clone()))
                .try_init();
            buffer
        })
        .clone()
}

/// Records captured by the global layer, oldest first
pub fn recent() -> Vec<LogRecord> {
    GLOBAL_BUFFER.get().map(LogBuffer::snapshot).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;

    fn scoped(buffer: &LogBuffer) -> impl Subscriber + Send + Sync + 'static {
        Registry::default().with(RollingLayer::new(buffer.clone()).without_console())
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        tracing::subscriber::with_default(scoped(&buffer), || {
            tracing::info!("first");
            tracing::info!("second");
            tracing::info!("third");
        });
        let messages: Vec<_> = buffer.snapshot().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn test_fields_are_rendered() {
        let buffer = LogBuffer::new(8);
        tracing::subscriber::with_default(scoped(&buffer), || {
            tracing::warn!(task_id = "t1", status = 500u16, "move failed");
        });
        let records = buffer.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::WARN);
        assert_eq!(records[0].message, "move failed task_id=t1 status=500");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let buffer = LogBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        assert!(buffer.is_empty());
    }
}
