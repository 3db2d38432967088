//! Rendering pipelines
//!
//! A `Pipeline` owns the ordered transformation stages for one output mode
//! (a `Renderer`) plus the `Sink` that receives the finished line. The
//! process-wide pipeline freezes at first use: `configure` before any event
//! installs it explicitly, otherwise the first enabled log call initializes
//! it from the environment. Later configuration calls are ignored.

pub mod json;
pub mod sink;
pub mod text;

pub use json::JsonRenderer;
pub use sink::{MemorySink, Sink, StderrSink};
pub use text::TextRenderer;

use std::sync::{Arc, OnceLock};

use crate::core::config::{OutputMode, PipelineConfig};
use crate::core::{context, event, FieldMap, Level, LogEvent, Result};

/// One ordered rendering stage set turning an event into a final line
pub trait Renderer: Send + Sync {
    /// Render the event with the already-merged ambient fields
    fn render(&self, event: &LogEvent, extras: &FieldMap) -> Result<String>;
}

pub struct Pipeline {
    renderer: Box<dyn Renderer>,
    sink: Box<dyn Sink>,
    threshold: Level,
}

impl Pipeline {
    /// Build a pipeline writing to standard error
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_sink(config, Box::new(StderrSink::new()))
    }

    /// Build a pipeline writing to a custom sink
    pub fn with_sink(config: &PipelineConfig, sink: Box<dyn Sink>) -> Self {
        event::mark_start();
        let renderer: Box<dyn Renderer> = match config.mode {
            OutputMode::Json => Box::new(JsonRenderer::new()),
            OutputMode::Text => Box::new(TextRenderer::new(config.colors)),
        };
        Self {
            renderer,
            sink,
            threshold: config.min_level(),
        }
    }

    /// Default minimum level of the configured output mode
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// Merge ambient context under the event's own fields, render, and hand
    /// the line to the sink. Only ever reached on the enabled path.
    pub fn process(&self, event: &LogEvent) -> Result<()> {
        let mut extras = context::snapshot();
        extras.merge(event.fields.clone());
        let line = self.renderer.render(event, &extras)?;
        self.sink.write_line(&line);
        Ok(())
    }
}

static GLOBAL: OnceLock<Arc<Pipeline>> = OnceLock::new();

/// Install the process-wide pipeline if no event has frozen it yet.
///
/// Returns `true` when the configuration took effect; `false` when the
/// pipeline was already frozen and the call was ignored.
pub fn configure(config: PipelineConfig) -> bool {
    GLOBAL.set(Arc::new(Pipeline::new(&config))).is_ok()
}

/// Like [`configure`] with a custom sink
pub fn configure_with(config: PipelineConfig, sink: Box<dyn Sink>) -> bool {
    GLOBAL
        .set(Arc::new(Pipeline::with_sink(&config, sink)))
        .is_ok()
}

/// The frozen pipeline, initializing from the environment on first use
pub(crate) fn global() -> Result<Arc<Pipeline>> {
    if let Some(pipeline) = GLOBAL.get() {
        return Ok(Arc::clone(pipeline));
    }
    let config = PipelineConfig::from_env()?;
    Ok(Arc::clone(
        GLOBAL.get_or_init(|| Arc::new(Pipeline::new(&config))),
    ))
}
