#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] drives a [`SiteHost`] over a [`RecordingPage`] with a
//! deterministic clock and records every event, time step and resulting
//! state checkpoint. [`replay`] feeds the same records through a fresh host
//! and reports the first checkpoint whose [`UiState`] checksum differs.
//!
//! Given identical records, config and page, replay must reproduce identical
//! checksums: time only moves through tick records and events only arrive
//! from the trace.
//!
//! ```ignore
//! let mut recorder = SessionRecorder::new(config.clone(), Viewport::new(375.0, 0.0), page.clone());
//! recorder.push_event(PageEvent::Scroll { y: 250.0, width: 375.0 });
//! recorder.step();
//! recorder.advance_time(Duration::from_millis(120));
//! let trace = recorder.finish();
//! assert!(replay(config, page, &trace)?.ok());
//! ```

use core::time::Duration;

use crate::config::SiteConfig;
use crate::event::PageEvent;
use crate::host::{SiteHost, StepResult};
use crate::page::RecordingPage;
use crate::state::{UiState, Viewport, fnv1a64_u64, FNV_OFFSET_BASIS};

/// Schema version for session traces.
pub const SCHEMA_VERSION: &str = "siteui-trace-v1";

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = fnv1a64_u64(FNV_OFFSET_BASIS, prev);
    fnv1a64_u64(hash, next)
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    /// Session header (must be first).
    Header { width: f64, scroll_y: f64 },
    /// An event queued at a timestamp.
    Event { ts_ns: u64, event: PageEvent },
    /// Explicit time advancement to an absolute timestamp.
    Tick { ts_ns: u64 },
    /// State checkpoint taken after a step.
    Checkpoint {
        index: u64,
        ts_ns: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    Summary {
        total_checkpoints: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded session trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Number of checkpoints in the trace.
    #[must_use]
    pub fn checkpoint_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Checkpoint { .. }))
            .count() as u64
    }

    /// Final checksum chain from the summary record.
    #[must_use]
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }
}

#[cfg(feature = "serde")]
impl SessionTrace {
    /// One JSON object per line, `schema` on the header.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        use serde_json::json;

        let mut out = String::new();
        for record in &self.records {
            let line = match record {
                TraceRecord::Header { width, scroll_y } => json!({
                    "type": "header",
                    "schema": SCHEMA_VERSION,
                    "width": width,
                    "scroll_y": scroll_y,
                }),
                TraceRecord::Event { ts_ns, event } => json!({
                    "type": "event",
                    "ts_ns": ts_ns,
                    "event": crate::event_parser::event_to_value(event),
                }),
                TraceRecord::Tick { ts_ns } => json!({"type": "tick", "ts_ns": ts_ns}),
                TraceRecord::Checkpoint {
                    index,
                    ts_ns,
                    checksum,
                    checksum_chain,
                } => json!({
                    "type": "checkpoint",
                    "index": index,
                    "ts_ns": ts_ns,
                    "checksum": format!("{checksum:016x}"),
                    "checksum_chain": format!("{checksum_chain:016x}"),
                }),
                TraceRecord::Summary {
                    total_checkpoints,
                    final_checksum_chain,
                } => json!({
                    "type": "summary",
                    "total_checkpoints": total_checkpoints,
                    "final_checksum_chain": format!("{final_checksum_chain:016x}"),
                }),
            };
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    /// Parse the format written by [`Self::to_jsonl`]. Blank lines are skipped.
    pub fn from_jsonl(input: &str) -> Result<Self, ReplayError> {
        use serde_json::Value;

        fn field<'a>(line: usize, v: &'a Value, name: &str) -> Result<&'a Value, ReplayError> {
            v.get(name)
                .ok_or_else(|| ReplayError::Parse(format!("line {line}: missing {name}")))
        }
        fn as_u64(line: usize, v: &Value, name: &str) -> Result<u64, ReplayError> {
            field(line, v, name)?
                .as_u64()
                .ok_or_else(|| ReplayError::Parse(format!("line {line}: {name} is not a u64")))
        }
        fn as_f64(line: usize, v: &Value, name: &str) -> Result<f64, ReplayError> {
            field(line, v, name)?
                .as_f64()
                .ok_or_else(|| ReplayError::Parse(format!("line {line}: {name} is not a number")))
        }
        fn as_hex(line: usize, v: &Value, name: &str) -> Result<u64, ReplayError> {
            let s = field(line, v, name)?
                .as_str()
                .ok_or_else(|| ReplayError::Parse(format!("line {line}: {name} is not a string")))?;
            u64::from_str_radix(s, 16)
                .map_err(|e| ReplayError::Parse(format!("line {line}: {name}: {e}")))
        }

        let mut records = Vec::new();
        for (idx, raw) in input.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let v: Value = serde_json::from_str(raw)
                .map_err(|e| ReplayError::Parse(format!("line {line}: {e}")))?;
            let kind = field(line, &v, "type")?.as_str().unwrap_or_default();
            let record = match kind {
                "header" => TraceRecord::Header {
                    width: as_f64(line, &v, "width")?,
                    scroll_y: as_f64(line, &v, "scroll_y")?,
                },
                "event" => TraceRecord::Event {
                    ts_ns: as_u64(line, &v, "ts_ns")?,
                    event: crate::event_parser::parse_event_value(field(line, &v, "event")?.clone())
                        .map_err(|e| ReplayError::Parse(format!("line {line}: {e}")))?,
                },
                "tick" => TraceRecord::Tick {
                    ts_ns: as_u64(line, &v, "ts_ns")?,
                },
                "checkpoint" => TraceRecord::Checkpoint {
                    index: as_u64(line, &v, "index")?,
                    ts_ns: as_u64(line, &v, "ts_ns")?,
                    checksum: as_hex(line, &v, "checksum")?,
                    checksum_chain: as_hex(line, &v, "checksum_chain")?,
                },
                "summary" => TraceRecord::Summary {
                    total_checkpoints: as_u64(line, &v, "total_checkpoints")?,
                    final_checksum_chain: as_hex(line, &v, "final_checksum_chain")?,
                },
                other => {
                    return Err(ReplayError::Parse(format!(
                        "line {line}: unknown record type {other:?}"
                    )));
                }
            };
            records.push(record);
        }
        Ok(Self { records })
    }
}

/// Records a session for deterministic replay.
#[derive(Debug)]
pub struct SessionRecorder {
    host: SiteHost<RecordingPage>,
    records: Vec<TraceRecord>,
    checksum_chain: u64,
    checkpoints: u64,
}

impl SessionRecorder {
    #[must_use]
    pub fn new(config: SiteConfig, viewport: Viewport, page: RecordingPage) -> Self {
        let host = SiteHost::deterministic(config, viewport, page);
        Self {
            host,
            records: vec![TraceRecord::Header {
                width: viewport.width,
                scroll_y: viewport.scroll_y,
            }],
            checksum_chain: 0,
            checkpoints: 0,
        }
    }

    fn ts_ns(&self) -> u64 {
        u64::try_from(self.host.now().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Queue an event at the current time.
    pub fn push_event(&mut self, event: PageEvent) {
        self.records.push(TraceRecord::Event {
            ts_ns: self.ts_ns(),
            event: event.clone(),
        });
        self.host.push_event(event);
    }

    /// Advance time by `dt` and record the resulting timestamp.
    pub fn advance_time(&mut self, dt: Duration) {
        self.host.advance_time(dt);
        self.records.push(TraceRecord::Tick {
            ts_ns: self.ts_ns(),
        });
    }

    /// Process queued events and due timers, then record a checkpoint.
    pub fn step(&mut self) -> StepResult {
        let result = self.host.step();
        let checksum = self.host.state().checksum();
        let chain = fnv1a64_pair(self.checksum_chain, checksum);
        self.records.push(TraceRecord::Checkpoint {
            index: self.checkpoints,
            ts_ns: self.ts_ns(),
            checksum,
            checksum_chain: chain,
        });
        self.checksum_chain = chain;
        self.checkpoints += 1;
        result
    }

    #[must_use]
    pub fn state(&self) -> &UiState {
        self.host.state()
    }

    #[must_use]
    pub fn host(&self) -> &SiteHost<RecordingPage> {
        &self.host
    }

    /// Finish recording and return the completed trace.
    #[must_use]
    pub fn finish(mut self) -> SessionTrace {
        self.records.push(TraceRecord::Summary {
            total_checkpoints: self.checkpoints,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: self.records,
        }
    }
}

/// Result of replaying a session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    pub total_checkpoints: u64,
    pub final_checksum_chain: u64,
    /// First checkpoint whose checksum differed, if any.
    pub first_mismatch: Option<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether the replay reproduced every checkpoint.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Description of a checksum mismatch during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    pub index: u64,
    pub expected: u64,
    pub actual: u64,
}

/// Errors that can occur during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The trace does not start with a header record.
    MissingHeader,
    /// A JSONL trace line could not be decoded.
    Parse(String),
}

impl core::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "trace missing header record"),
            Self::Parse(msg) => write!(f, "trace parse error: {msg}"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// Replay `trace` through a fresh host built from `config` and `page`.
///
/// Event and tick records feed the host; each checkpoint triggers a step and
/// a checksum comparison, matching the recording cadence.
pub fn replay(
    config: SiteConfig,
    page: RecordingPage,
    trace: &SessionTrace,
) -> Result<ReplayResult, ReplayError> {
    let viewport = trace
        .records
        .first()
        .and_then(|r| match r {
            TraceRecord::Header { width, scroll_y } => Some(Viewport::new(*width, *scroll_y)),
            _ => None,
        })
        .ok_or(ReplayError::MissingHeader)?;

    let mut host = SiteHost::deterministic(config, viewport, page);
    let mut checksum_chain: u64 = 0;
    let mut total_checkpoints: u64 = 0;
    let mut first_mismatch = None;

    for record in &trace.records {
        match record {
            TraceRecord::Event { event, .. } => host.push_event(event.clone()),
            TraceRecord::Tick { ts_ns } => host.set_time(Duration::from_nanos(*ts_ns)),
            TraceRecord::Checkpoint {
                index,
                checksum: expected,
                ..
            } => {
                host.step();
                let actual = host.state().checksum();
                checksum_chain = fnv1a64_pair(checksum_chain, actual);
                if actual != *expected && first_mismatch.is_none() {
                    tracing::warn!(index, expected, actual, "replay checkpoint mismatch");
                    first_mismatch = Some(ReplayMismatch {
                        index: *index,
                        expected: *expected,
                        actual,
                    });
                }
                total_checkpoints += 1;
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_checkpoints,
        final_checksum_chain: checksum_chain,
        first_mismatch,
    })
}
