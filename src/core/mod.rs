//! Core facade types and dispatch

pub mod bridge;
pub mod catcher;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod field;
pub mod level;
pub mod logger;
pub mod template;

pub use bridge::ForeignBridge;
pub use catcher::{CatchIter, Catcher};
pub use config::{OutputMode, PipelineConfig};
pub use context::{adopt, contextualize, snapshot, ContextScope};
pub use error::{LogError, Result};
pub use event::{CallSite, ExceptionInfo, LogEvent};
pub use field::{FieldMap, FieldValue};
pub use level::Level;
pub use logger::BoundLogger;
