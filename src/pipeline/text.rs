//! Human-readable renderer
//!
//! Stage order: local timestamp, fixed-width level label, message,
//! abbreviated call-site, thread, captured exception, then remaining fields
//! as `key=value` pairs in sorted key order. Strings are quoted so a field
//! holding the string `"2"` is distinguishable from the number `2`.

use colored::Colorize;
use std::fmt::Write;

use crate::core::{FieldMap, Level, LogEvent, Result};

use super::Renderer;

pub struct TextRenderer {
    colors: bool,
}

impl TextRenderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Fixed-width level label, optionally color-highlighted.
    ///
    /// Trace is additionally dimmed so the most verbose level stands apart
    /// from the rest.
    fn label(&self, level: Level) -> String {
        let padded = format!("{:<7}", level.as_str());
        if !self.colors {
            return padded;
        }
        let colored = padded.as_str().color(level.color());
        match level {
            Level::Trace => colored.dimmed().to_string(),
            _ => colored.to_string(),
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, event: &LogEvent, extras: &FieldMap) -> Result<String> {
        let mut line = format!(
            "{} [{}] {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.label(event.level),
            event.message
        );

        let _ = write!(
            line,
            " [{}:{}] thread={}",
            event.site.short_module(),
            event.site.line,
            event.site.thread
        );

        if let Some(ref exception) = event.exception {
            let _ = write!(line, " error={:?}", exception.render());
        }

        for (key, value) in extras.iter() {
            let _ = write!(line, " {}={}", key, value.repr());
        }

        Ok(line)
    }
}
