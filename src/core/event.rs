//! Log event record, call-site capture, and exception info

use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::sync::OnceLock;
use std::time::Instant;

use super::field::FieldMap;
use super::level::Level;

// Thread-local cache for the thread label to avoid repeated allocations
thread_local! {
    static THREAD_LABEL_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// Record the process-start reference instant for elapsed-seconds stamping.
///
/// Idempotent; invoked when a pipeline is constructed so the first recorded
/// instant wins.
pub(crate) fn mark_start() {
    let _ = PROCESS_START.get_or_init(Instant::now);
}

fn elapsed_secs() -> f64 {
    PROCESS_START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Get the cached thread label (name if set, otherwise the numeric id)
fn thread_label() -> String {
    THREAD_LABEL_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.is_none() {
            let current = std::thread::current();
            let label = match current.name() {
                Some(name) => name.to_string(),
                None => format!("{:?}", current.id()),
            };
            *cache = Some(label);
        }
        cache.clone().unwrap_or_default()
    })
}

/// Call-site metadata attached to every enabled event
#[derive(Debug, Clone)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    /// Module path when the call came through a macro; absent for plain
    /// method calls, which fall back to the source file stem
    pub module: Option<&'static str>,
    pub thread: String,
    pub process: u32,
}

impl CallSite {
    #[track_caller]
    pub fn capture(module: Option<&'static str>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
            module,
            thread: thread_label(),
            process: std::process::id(),
        }
    }

    /// Abbreviated origin for the human-readable renderer
    pub fn short_module(&self) -> &str {
        if let Some(module) = self.module {
            return module;
        }
        let stem = self
            .file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file);
        stem.strip_suffix(".rs").unwrap_or(stem)
    }
}

/// Captured error information attached to an event
#[derive(Debug, Clone)]
pub struct ExceptionInfo {
    /// Short type name of the originating error
    pub kind: String,
    pub message: String,
    /// Messages of the source chain, outermost first
    pub chain: Vec<String>,
}

impl ExceptionInfo {
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let full = std::any::type_name::<E>();
        let kind = full.rsplit("::").next().unwrap_or(full).to_string();

        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        Self {
            kind,
            message: error.to_string(),
            chain,
        }
    }

    /// Build exception info from an unwinding panic payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self {
            kind: "panic".to_string(),
            message,
            chain: Vec::new(),
        }
    }

    /// Render the kind, message and cause chain as a single segment
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}", self.kind, self.message);
        for cause in &self.chain {
            out.push_str("; caused by: ");
            out.push_str(cause);
        }
        out
    }
}

/// Transient event record, created per enabled call and consumed by the
/// pipeline immediately
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: Level,
    pub message: String,
    /// Bound fields merged with per-call fields (per-call wins)
    pub fields: FieldMap,
    pub timestamp: DateTime<Local>,
    /// Seconds since the process-start reference instant
    pub elapsed: f64,
    pub site: CallSite,
    pub exception: Option<ExceptionInfo>,
}

impl LogEvent {
    pub fn new(
        level: Level,
        message: String,
        fields: FieldMap,
        site: CallSite,
        exception: Option<ExceptionInfo>,
    ) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message),
            fields,
            timestamp: Local::now(),
            elapsed: elapsed_secs(),
            site,
            exception,
        }
    }

    /// Sanitize the message so one event stays one physical line.
    ///
    /// Embedded newlines would otherwise let a caller forge additional log
    /// records.
    fn sanitize_message(message: &str) -> String {
        if !message.contains(['\n', '\r', '\t']) {
            return message.to_string();
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }
}
