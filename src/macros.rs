//! Logging macros for ergonomic message formatting.
//!
//! The macros hoist the threshold check in front of `format!`, so a call at
//! a disabled level evaluates none of its arguments. They also record the
//! calling module for the human-readable renderer.
//!
//! # Examples
//!
//! ```
//! use scopelog::prelude::*;
//! use scopelog::info;
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let config = PipelineConfig { colors: false, ..PipelineConfig::default() };
//! let pipeline = Arc::new(Pipeline::with_sink(&config, Box::new(sink.clone())));
//! let logger = BoundLogger::new(pipeline, Level::Info);
//!
//! let port = 8080;
//! info!(logger, "server listening on port {}", port).unwrap();
//! ```

/// Log a message with automatic formatting at a dynamically chosen level.
///
/// Evaluates to the dispatch `Result`; a disabled level yields `Ok(())`
/// without touching the arguments.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level = $level;
        if $logger.enabled(level) {
            $logger.write(level, format!($($arg)+), module_path!())
        } else {
            $crate::Result::Ok(())
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Like [`BoundLogger::fatal`](crate::BoundLogger::fatal) this evaluates to
/// the distinguished fatal error after the line is emitted.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

/// Build a [`FieldMap`](crate::FieldMap) from `key => value` pairs.
///
/// ```
/// use scopelog::fields;
///
/// let map = fields! { "user" => "alice", "attempt" => 3 };
/// assert_eq!(map.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::FieldMap::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::FieldMap::new();
        $( map.insert($key, $value); )+
        map
    }};
}
