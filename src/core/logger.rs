//! The bound logger and level dispatch
//!
//! A `BoundLogger` is an immutable value: a fixed minimum level, a fixed set
//! of bound fields, and a shared pipeline handle. `bind`, `unbind`,
//! `try_unbind` and `with_threshold` all return new instances; nothing is
//! ever mutated in place. Dispatch is one integer comparison: a call below
//! the threshold returns before any formatting, field merging, or context
//! access happens.

use std::sync::Arc;

use crate::pipeline::Pipeline;

use super::error::{LogError, Result};
use super::event::{CallSite, ExceptionInfo, LogEvent};
use super::field::{FieldMap, FieldValue};
use super::level::Level;
use super::template;

#[derive(Clone)]
pub struct BoundLogger {
    threshold: Level,
    fields: FieldMap,
    pipeline: Arc<Pipeline>,
}

impl BoundLogger {
    /// Construct a logger with a fixed minimum level.
    ///
    /// There is no runtime set-level: changing the threshold of an existing
    /// logger means constructing a new one via [`with_threshold`].
    ///
    /// [`with_threshold`]: BoundLogger::with_threshold
    pub fn new(pipeline: Arc<Pipeline>, threshold: Level) -> Self {
        Self {
            threshold,
            fields: FieldMap::new(),
            pipeline,
        }
    }

    /// A new logger sharing this one's fields and pipeline at a different
    /// fixed threshold
    #[must_use]
    pub fn with_threshold(&self, threshold: Level) -> Self {
        Self {
            threshold,
            fields: self.fields.clone(),
            pipeline: Arc::clone(&self.pipeline),
        }
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    /// A new logger with `fields` merged over the current bound fields
    #[must_use]
    pub fn bind(&self, fields: FieldMap) -> Self {
        let mut merged = self.fields.clone();
        merged.merge(fields);
        Self {
            threshold: self.threshold,
            fields: merged,
            pipeline: Arc::clone(&self.pipeline),
        }
    }

    /// A new logger without the given keys; a key that is not bound is an
    /// error
    pub fn unbind(&self, keys: &[&str]) -> Result<Self> {
        let mut fields = self.fields.clone();
        for key in keys {
            if fields.remove(key).is_none() {
                return Err(LogError::KeyNotBound((*key).to_string()));
            }
        }
        Ok(Self {
            threshold: self.threshold,
            fields,
            pipeline: Arc::clone(&self.pipeline),
        })
    }

    /// Like [`unbind`](BoundLogger::unbind), silently skipping absent keys
    #[must_use]
    pub fn try_unbind(&self, keys: &[&str]) -> Self {
        let mut fields = self.fields.clone();
        for key in keys {
            fields.remove(key);
        }
        Self {
            threshold: self.threshold,
            fields,
            pipeline: Arc::clone(&self.pipeline),
        }
    }

    /// Generic dispatch for callers that only know the level dynamically.
    ///
    /// With no positional arguments the template is used verbatim; with
    /// arguments, ordinal `{}` substitution runs lazily on the enabled path
    /// only. An argument-count mismatch propagates to the caller.
    #[track_caller]
    pub fn log(&self, level: Level, template: &str, args: &[FieldValue]) -> Result<()> {
        self.log_with(level, template, args, FieldMap::new())
    }

    /// Generic dispatch with per-call fields attached
    #[track_caller]
    pub fn log_with(
        &self,
        level: Level,
        template: &str,
        args: &[FieldValue],
        fields: FieldMap,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        let message = if args.is_empty() {
            template.to_string()
        } else {
            template::render(template, args)?
        };
        self.emit(level, message, fields, None, None)
    }

    #[track_caller]
    pub fn trace(&self, template: &str) -> Result<()> {
        self.log(Level::Trace, template, &[])
    }

    #[track_caller]
    pub fn debug(&self, template: &str) -> Result<()> {
        self.log(Level::Debug, template, &[])
    }

    #[track_caller]
    pub fn info(&self, template: &str) -> Result<()> {
        self.log(Level::Info, template, &[])
    }

    #[track_caller]
    pub fn warning(&self, template: &str) -> Result<()> {
        self.log(Level::Warning, template, &[])
    }

    #[track_caller]
    pub fn error(&self, template: &str) -> Result<()> {
        self.log(Level::Error, template, &[])
    }

    /// Log at the highest severity.
    ///
    /// Policy: after the line is emitted this returns the distinguished
    /// [`LogError::Fatal`] carrying the rendered message and merged fields.
    /// It never terminates the process; the caller decides what a fatal
    /// event means.
    #[track_caller]
    pub fn fatal(&self, template: &str) -> Result<()> {
        self.log(Level::Fatal, template, &[])
    }

    #[track_caller]
    pub fn trace_with(&self, template: &str, fields: FieldMap) -> Result<()> {
        self.log_with(Level::Trace, template, &[], fields)
    }

    #[track_caller]
    pub fn debug_with(&self, template: &str, fields: FieldMap) -> Result<()> {
        self.log_with(Level::Debug, template, &[], fields)
    }

    #[track_caller]
    pub fn info_with(&self, template: &str, fields: FieldMap) -> Result<()> {
        self.log_with(Level::Info, template, &[], fields)
    }

    #[track_caller]
    pub fn warning_with(&self, template: &str, fields: FieldMap) -> Result<()> {
        self.log_with(Level::Warning, template, &[], fields)
    }

    #[track_caller]
    pub fn error_with(&self, template: &str, fields: FieldMap) -> Result<()> {
        self.log_with(Level::Error, template, &[], fields)
    }

    #[track_caller]
    pub fn fatal_with(&self, template: &str, fields: FieldMap) -> Result<()> {
        self.log_with(Level::Fatal, template, &[], fields)
    }

    /// `error` with the in-flight error's kind, message and source chain
    /// attached to the event
    #[track_caller]
    pub fn exception<E>(&self, message: &str, error: &E) -> Result<()>
    where
        E: std::error::Error + ?Sized,
    {
        self.exception_with(message, error, FieldMap::new())
    }

    #[track_caller]
    pub fn exception_with<E>(&self, message: &str, error: &E, fields: FieldMap) -> Result<()>
    where
        E: std::error::Error + ?Sized,
    {
        if !self.enabled(Level::Error) {
            return Ok(());
        }
        self.emit(
            Level::Error,
            message.to_string(),
            fields,
            Some(ExceptionInfo::from_error(error)),
            None,
        )
    }

    /// Dispatch an already-rendered message; used by the logging macros,
    /// which hoist the enabled check in front of formatting and supply the
    /// call site's module path
    #[track_caller]
    pub fn write(&self, level: Level, message: String, module: &'static str) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.emit(level, message, FieldMap::new(), None, Some(module))
    }

    /// Build the event and hand it to the pipeline. Callers have already
    /// passed the threshold check.
    #[track_caller]
    fn emit(
        &self,
        level: Level,
        message: String,
        extra: FieldMap,
        exception: Option<ExceptionInfo>,
        module: Option<&'static str>,
    ) -> Result<()> {
        let site = CallSite::capture(module);
        let mut fields = self.fields.clone();
        fields.merge(extra);
        let event = LogEvent::new(level, message, fields, site, exception);
        self.pipeline.process(&event)?;
        if level == Level::Fatal {
            return Err(LogError::Fatal {
                message: event.message,
                fields: event.fields,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for BoundLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundLogger")
            .field("threshold", &self.threshold)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PipelineConfig;
    use crate::pipeline::MemorySink;

    fn capture_logger(threshold: Level) -> (BoundLogger, MemorySink) {
        let sink = MemorySink::new();
        let config = PipelineConfig {
            colors: false,
            ..PipelineConfig::default()
        };
        let pipeline = Arc::new(Pipeline::with_sink(&config, Box::new(sink.clone())));
        (BoundLogger::new(pipeline, threshold), sink)
    }

    #[test]
    fn test_disabled_levels_produce_no_output() {
        let (logger, sink) = capture_logger(Level::Warning);

        logger.trace("t").unwrap();
        logger.debug("d").unwrap();
        logger.info("i").unwrap();

        assert!(sink.is_empty());

        logger.warning("w").unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_disabled_call_skips_template_rendering() {
        let (logger, sink) = capture_logger(Level::Error);

        // arity is wrong, but the disabled path must never reach the
        // formatter
        logger.log(Level::Debug, "broken {} {}", &[1.into()]).unwrap();
        assert!(sink.is_empty());

        let err = logger.log(Level::Error, "broken {} {}", &[1.into()]).unwrap_err();
        assert!(matches!(err, LogError::TemplateArity { .. }));
    }

    #[test]
    fn test_positional_substitution() {
        let (logger, sink) = capture_logger(Level::Trace);

        logger.log(Level::Info, "hello {}", &["world".into()]).unwrap();

        let lines = sink.lines();
        assert!(lines[0].contains("hello world"));
        assert!(!lines[0].contains("{}"));
    }

    #[test]
    fn test_bind_unbind_round_trip() {
        let (logger, _sink) = capture_logger(Level::Trace);
        let before = logger.fields().clone();

        let bound = logger.bind(FieldMap::new().with_field("a", 1));
        assert!(bound.fields().contains_key("a"));

        let unbound = bound.unbind(&["a"]).unwrap();
        assert_eq!(unbound.fields(), &before);
    }

    #[test]
    fn test_unbind_absent_key_errors() {
        let (logger, _sink) = capture_logger(Level::Trace);
        let err = logger.unbind(&["ghost"]).unwrap_err();
        assert!(matches!(err, LogError::KeyNotBound(ref k) if k == "ghost"));

        // try_unbind never errors
        let same = logger.try_unbind(&["ghost"]);
        assert_eq!(same.fields(), logger.fields());
    }

    #[test]
    fn test_nested_bind_immutability() {
        let (logger, sink) = capture_logger(Level::Trace);

        let outer = logger.bind(FieldMap::new().with_field("key", "outer"));
        let inner = outer.bind(FieldMap::new().with_field("key", "inner"));

        inner.info("from inner").unwrap();
        outer.info("from outer").unwrap();

        let lines = sink.lines();
        assert!(lines[0].contains("key=\"inner\""));
        assert!(lines[1].contains("key=\"outer\""));
    }

    #[test]
    fn test_bound_fields_win_over_ambient_context() {
        let (logger, sink) = capture_logger(Level::Trace);
        let bound = logger.bind(FieldMap::new().with_field("origin", "bound"));

        let _scope =
            crate::core::context::contextualize(FieldMap::new().with_field("origin", "ambient"));
        bound.info("collision").unwrap();

        let lines = sink.lines();
        assert!(lines[0].contains("origin=\"bound\""));
    }

    #[test]
    fn test_per_call_fields_win_over_bound() {
        let (logger, sink) = capture_logger(Level::Trace);
        let bound = logger.bind(FieldMap::new().with_field("origin", "bound"));

        bound
            .info_with("call", FieldMap::new().with_field("origin", "call"))
            .unwrap();

        assert!(sink.lines()[0].contains("origin=\"call\""));
    }

    #[test]
    fn test_fatal_emits_then_returns_distinguished_error() {
        let (logger, sink) = capture_logger(Level::Trace);
        let bound = logger.bind(FieldMap::new().with_field("stage", "boot"));

        let err = bound.fatal("cannot continue").unwrap_err();

        assert_eq!(sink.len(), 1, "the fatal line is emitted before the error");
        match err {
            LogError::Fatal { message, fields } => {
                assert_eq!(message, "cannot continue");
                assert!(fields.contains_key("stage"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exception_attaches_error_info() {
        let (logger, sink) = capture_logger(Level::Trace);
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");

        logger.exception("write failed", &io_err).unwrap();

        let lines = sink.lines();
        assert!(lines[0].contains("write failed"));
        assert!(lines[0].contains("access denied"));
    }

    #[test]
    fn test_with_threshold_is_a_new_instance() {
        let (logger, sink) = capture_logger(Level::Error);
        let verbose = logger.with_threshold(Level::Trace);

        logger.debug("silent").unwrap();
        assert!(sink.is_empty());

        verbose.debug("audible").unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(logger.threshold(), Level::Error);
    }
}
