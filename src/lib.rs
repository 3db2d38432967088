//! # Scopelog
//!
//! A structured-logging facade with immutable bound loggers, scoped ambient
//! context, and interchangeable text/JSON rendering pipelines.
//!
//! ## Features
//!
//! - **Free when disabled**: a call below the logger's fixed threshold
//!   returns before any formatting or context access
//! - **Immutable loggers**: `bind`/`unbind` fork new instances, never mutate
//! - **Scoped context**: per-thread ambient fields with guaranteed
//!   restoration on every exit path
//! - **Two pipelines**: human-readable columns or one JSON record per line,
//!   frozen at first use
//! - **Error trapping**: a `Catcher` combinator covering plain, iterator,
//!   and async call shapes
//!
//! ## Quick start
//!
//! ```no_run
//! use scopelog::prelude::*;
//!
//! let logger = scopelog::root().unwrap();
//! logger.info("server started").unwrap();
//!
//! let request_logger = logger.bind(FieldMap::new().with_field("request", "r-42"));
//! let _scope = scopelog::contextualize(FieldMap::new().with_field("user", "alice"));
//! request_logger.info("handling request").unwrap();
//! ```

pub mod core;
pub mod macros;
pub mod pipeline;

pub mod prelude {
    pub use crate::core::{
        contextualize, BoundLogger, CatchIter, Catcher, ContextScope, FieldMap, FieldValue,
        ForeignBridge, Level, LogError, LogEvent, OutputMode, PipelineConfig, Result,
    };
    pub use crate::pipeline::{
        configure, configure_with, MemorySink, Pipeline, Renderer, Sink, StderrSink,
    };
}

pub use crate::core::{
    adopt, contextualize, snapshot, BoundLogger, CallSite, CatchIter, Catcher, ContextScope,
    ExceptionInfo, FieldMap, FieldValue, ForeignBridge, Level, LogError, LogEvent, OutputMode,
    PipelineConfig, Result,
};
pub use crate::pipeline::{
    configure, configure_with, JsonRenderer, MemorySink, Pipeline, Renderer, Sink, StderrSink,
    TextRenderer,
};

/// The root logger, bound to the process-wide pipeline.
///
/// The first call freezes the pipeline: an earlier [`configure`] wins,
/// otherwise the environment configuration applies. The returned logger
/// carries the frozen mode's minimum level; fork it with
/// [`BoundLogger::bind`] or [`BoundLogger::with_threshold`] as needed.
pub fn root() -> Result<BoundLogger> {
    let pipeline = pipeline::global()?;
    let threshold = pipeline.threshold();
    Ok(BoundLogger::new(pipeline, threshold))
}
