use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::domain::ExportError;
use crate::engine::RunEvent;

const PID: u32 = 1;
/// Track for the worker-side picture (state changes and snapshots).
const TID_RUN: u32 = 1;

/// Chrome Trace Event format
#[derive(Debug, Clone, Serialize)]
struct ChromeTraceEvent {
    name: String,
    cat: &'static str,
    /// "C" = counter, "i" = instant, "M" = metadata
    ph: &'static str,
    /// Microseconds since the exporter was created
    ts: f64,
    pid: u32,
    tid: u32,
    /// Instant event scope ("t" = thread)
    #[serde(skip_serializing_if = "Option::is_none")]
    s: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<BTreeMap<String, JsonValue>>,
}

#[derive(Debug, Serialize)]
struct ChromeTrace<'a> {
    #[serde(rename = "traceEvents")]
    trace_events: &'a [ChromeTraceEvent],
    #[serde(rename = "displayTimeUnit")]
    display_time_unit: &'static str,
}

/// Collects [`RunEvent`]s and exports them as a Chrome trace.
///
/// Counters become `"C"` events (two series, comparisons and accesses), state
/// changes and snapshots become `"i"` instant events. Snapshot events carry
/// how many bars were touched and assigned, not their contents.
pub struct RunTraceExporter {
    algorithm: String,
    element_count: usize,
    started: Instant,
    events: Vec<ChromeTraceEvent>,
}

impl RunTraceExporter {
    #[must_use]
    pub fn new(algorithm: &str, element_count: usize) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            element_count,
            started: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Record an event stamped with the time elapsed since construction.
    pub fn record(&mut self, event: &RunEvent) {
        let at = self.started.elapsed();
        self.record_at(event, at);
    }

    /// Record an event at an explicit offset from the start of the trace.
    pub fn record_at(&mut self, event: &RunEvent, at: Duration) {
        let ts = at.as_secs_f64() * 1_000_000.0;
        match event {
            RunEvent::StateChanged(state) => {
                self.events.push(instant(state.to_string(), "state", ts, None));
            }
            RunEvent::Snapshot(snapshot) => {
                let args = BTreeMap::from([
                    ("touched".to_string(), json!(snapshot.touched().len())),
                    ("assigned".to_string(), json!(snapshot.assigned().len())),
                ]);
                let name = if snapshot.is_empty() { "clear" } else { "snapshot" };
                self.events.push(instant(name.to_string(), "snapshot", ts, Some(args)));
            }
            RunEvent::Counters(counters) => {
                let args = BTreeMap::from([
                    ("comparisons".to_string(), json!(counters.comparisons)),
                    ("accesses".to_string(), json!(counters.accesses)),
                ]);
                self.events.push(ChromeTraceEvent {
                    name: "counters".to_string(),
                    cat: "counters",
                    ph: "C",
                    ts,
                    pid: PID,
                    tid: TID_RUN,
                    s: None,
                    args: Some(args),
                });
            }
        }
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Write the trace to any writer (file, stdout, buffer).
    ///
    /// # Errors
    /// Returns [`ExportError`] if serialization or the writer fails.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        let mut all_events = Vec::with_capacity(self.events.len() + 2);
        all_events.push(metadata("process_name", json!({ "name": "sortscope" })));
        all_events.push(metadata(
            "thread_name",
            json!({ "name": format!("{} ({} elements)", self.algorithm, self.element_count) }),
        ));
        all_events.extend(self.events.iter().cloned());

        let trace = ChromeTrace { trace_events: &all_events, display_time_unit: "ms" };
        serde_json::to_writer_pretty(&mut writer, &trace)?;
        writer.flush()?;
        Ok(())
    }

    /// Create `path` and write the trace into it.
    ///
    /// # Errors
    /// [`ExportError::WriteFailed`] if the file cannot be created, otherwise as
    /// [`RunTraceExporter::export`].
    pub fn export_to_path(&self, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path)
            .map_err(|e| ExportError::WriteFailed(format!("{}: {e}", path.display())))?;
        self.export(BufWriter::new(file))
    }
}

fn instant(
    name: String,
    cat: &'static str,
    ts: f64,
    args: Option<BTreeMap<String, JsonValue>>,
) -> ChromeTraceEvent {
    ChromeTraceEvent { name, cat, ph: "i", ts, pid: PID, tid: TID_RUN, s: Some("t"), args }
}

fn metadata(name: &str, args: JsonValue) -> ChromeTraceEvent {
    let args = match args {
        JsonValue::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    };
    ChromeTraceEvent {
        name: name.to_string(),
        cat: "",
        ph: "M",
        ts: 0.0,
        pid: PID,
        tid: TID_RUN,
        s: None,
        args: Some(args),
    }
}
