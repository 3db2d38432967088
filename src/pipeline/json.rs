//! Machine-readable renderer
//!
//! Emits one compact JSON record per event: wall-clock time with UTC offset
//! at microsecond precision, numeric unix timestamp, elapsed seconds since
//! process start, level name, the message under the stable `msg` key,
//! call-site metadata, the rendered exception chain when present, and all
//! merged fields under `extra`. Keys serialize in sorted order, so identical
//! records (timestamps aside) produce byte-identical lines.

use serde_json::{Map, Value};

use crate::core::{FieldMap, LogEvent, Result};

use super::Renderer;

pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, event: &LogEvent, extras: &FieldMap) -> Result<String> {
        let mut record = Map::new();

        record.insert(
            "time".to_string(),
            Value::String(
                event
                    .timestamp
                    .format("%Y-%m-%dT%H:%M:%S%.6f%:z")
                    .to_string(),
            ),
        );
        let unix = event.timestamp.timestamp_micros() as f64 / 1_000_000.0;
        record.insert(
            "timestamp".to_string(),
            serde_json::Number::from_f64(unix)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(unix.to_string())),
        );
        record.insert(
            "elapsed".to_string(),
            serde_json::Number::from_f64(event.elapsed)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(event.elapsed.to_string())),
        );

        record.insert(
            "level".to_string(),
            Value::String(event.level.as_str().to_string()),
        );
        record.insert("msg".to_string(), Value::String(event.message.clone()));

        record.insert(
            "pathname".to_string(),
            Value::String(event.site.file.to_string()),
        );
        record.insert("lineno".to_string(), Value::Number(event.site.line.into()));
        record.insert(
            "thread".to_string(),
            Value::String(event.site.thread.clone()),
        );
        record.insert(
            "process".to_string(),
            Value::Number(event.site.process.into()),
        );

        if let Some(ref exception) = event.exception {
            record.insert("exc_info".to_string(), Value::String(exception.render()));
        }

        if !extras.is_empty() {
            let extra: Map<String, Value> = extras
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_json_value()))
                .collect();
            record.insert("extra".to_string(), Value::Object(extra));
        }

        Ok(serde_json::to_string(&Value::Object(record))?)
    }
}
