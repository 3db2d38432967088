//! Adapter for externally sourced log records
//!
//! Foreign systems hand over a numeric severity and an already-rendered
//! message. The bridge maps the number onto the enumerated level set and
//! re-dispatches through a [`BoundLogger`], so foreign and native events
//! flow through the same pipeline and output format. An unmapped severity
//! is a configuration error raised at the call, never silently coerced.

use super::error::Result;
use super::field::FieldMap;
use super::level::Level;
use super::logger::BoundLogger;

pub struct ForeignBridge {
    logger: BoundLogger,
}

impl ForeignBridge {
    pub fn new(logger: BoundLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &BoundLogger {
        &self.logger
    }

    /// Re-dispatch a foreign record through the native pipeline
    #[track_caller]
    pub fn dispatch(&self, severity: u32, message: &str) -> Result<()> {
        let level = Level::from_severity(severity)?;
        self.logger.log(level, message, &[])
    }

    /// Re-dispatch with structured fields carried over from the foreign
    /// record
    #[track_caller]
    pub fn dispatch_with(&self, severity: u32, message: &str, fields: FieldMap) -> Result<()> {
        let level = Level::from_severity(severity)?;
        self.logger.log_with(level, message, &[], fields)
    }
}
