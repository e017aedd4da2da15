// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Handing committed strokes to a persistence backend.
//!
//! Submission is explicit and happens outside of drawing. A failed
//! submission never loses strokes: they stay in the engine and are retried on
//! the next attempt.

use crate::engine::StrokeEngine;
use crate::models::annotation::{NormalizedPoint, Stroke, StrokeStyle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("backend rejected stroke {stroke_id}: {reason}")]
    Rejected { stroke_id: String, reason: String },
    #[error("could not reach backend: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode stroke payload: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeMetadata {
    pub stroke_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Wire payload for one stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokePayload {
    pub image_id: String,
    pub points: Vec<NormalizedPoint>,
    pub style: StrokeStyle,
    pub metadata: StrokeMetadata,
}

impl StrokePayload {
    pub fn new(image_id: &str, stroke: &Stroke, author: Option<&str>) -> Self {
        Self {
            image_id: image_id.to_string(),
            points: stroke.points.clone(),
            style: stroke.style,
            metadata: StrokeMetadata {
                stroke_id: stroke.id.clone(),
                created_at: stroke.created_at,
                author: author.map(str::to_string),
            },
        }
    }
}

/// A backend that accepts stroke payloads.
pub trait StrokeSink {
    /// Store one payload, returning the backend's identifier for it.
    fn submit(&mut self, payload: &StrokePayload) -> Result<String, PersistenceError>;
}

/// Backend that writes each payload as a JSON file in a directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl StrokeSink for DirectorySink {
    fn submit(&mut self, payload: &StrokePayload) -> Result<String, PersistenceError> {
        let remote_id = payload.metadata.stroke_id.clone();
        // The id becomes a file name; it must not leave the directory.
        if Path::new(&remote_id).file_name() != Some(OsStr::new(&remote_id)) {
            return Err(PersistenceError::Rejected {
                stroke_id: remote_id,
                reason: "stroke id is not a plain file name".into(),
            });
        }
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(payload)?;
        std::fs::write(self.dir.join(format!("{remote_id}.json")), json)?;
        Ok(remote_id)
    }
}

/// Outcome of a submission run.
#[derive(Debug, Default)]
pub struct SubmitReport {
    pub submitted: usize,
    /// Strokes still waiting after this run.
    pub remaining: usize,
    pub error: Option<PersistenceError>,
}

/// Submit every stroke the backend has not acknowledged, in order.
///
/// Stops at the first failure; everything not acknowledged stays pending.
pub fn submit_pending(
    engine: &mut StrokeEngine,
    sink: &mut dyn StrokeSink,
    image_id: &str,
    author: Option<&str>,
) -> SubmitReport {
    let payloads: Vec<StrokePayload> = engine
        .pending_submission()
        .into_iter()
        .map(|s| StrokePayload::new(image_id, s, author))
        .collect();

    let mut report = SubmitReport::default();
    for payload in &payloads {
        match sink.submit(payload) {
            Ok(remote_id) => {
                engine.mark_submitted(&payload.metadata.stroke_id, remote_id);
                report.submitted += 1;
            }
            Err(e) => {
                log::error!("Stroke submission failed: {e}");
                report.error = Some(e);
                break;
            }
        }
    }
    report.remaining = engine.pending_submission().len();
    if report.submitted > 0 {
        log::info!(
            "Submitted {} stroke(s), {} remaining",
            report.submitted,
            report.remaining
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(id: &str) -> Stroke {
        Stroke {
            id: id.into(),
            points: vec![NormalizedPoint::new(0.1, 0.2), NormalizedPoint::new(0.3, 0.4)],
            style: StrokeStyle::default(),
            created_at: Utc::now(),
        }
    }

    /// Accepts a fixed number of payloads, then fails.
    struct FlakySink {
        accept: usize,
        received: Vec<String>,
    }

    impl StrokeSink for FlakySink {
        fn submit(&mut self, payload: &StrokePayload) -> Result<String, PersistenceError> {
            if self.received.len() >= self.accept {
                return Err(PersistenceError::Rejected {
                    stroke_id: payload.metadata.stroke_id.clone(),
                    reason: "offline".into(),
                });
            }
            self.received.push(payload.metadata.stroke_id.clone());
            Ok(format!("remote-{}", self.received.len()))
        }
    }

    #[test]
    fn failure_keeps_strokes_for_retry() {
        let mut engine = StrokeEngine::new();
        engine.load_strokes(vec![stroke("a"), stroke("b"), stroke("c")]);
        let mut sink = FlakySink {
            accept: 1,
            received: Vec::new(),
        };

        let report = submit_pending(&mut engine, &mut sink, "img", None);
        assert_eq!(report.submitted, 1);
        assert_eq!(report.remaining, 2);
        assert!(matches!(report.error, Some(PersistenceError::Rejected { .. })));
        assert_eq!(engine.strokes().len(), 3);

        sink.accept = 10;
        let retry = submit_pending(&mut engine, &mut sink, "img", None);
        assert_eq!(retry.submitted, 2);
        assert_eq!(retry.remaining, 0);
        assert_eq!(sink.received, vec!["a", "b", "c"]);
        assert_eq!(engine.remote_id("c"), Some("remote-3"));
    }

    #[test]
    fn payload_uses_camel_case_and_exact_points() {
        let payload = StrokePayload::new("slide.tif", &stroke("x"), Some("ana"));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["imageId"], "slide.tif");
        assert_eq!(value["metadata"]["author"], "ana");
        assert_eq!(value["points"][1]["y"], 0.4);
        let back: StrokePayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn directory_sink_writes_one_file_per_stroke() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = StrokeEngine::new();
        engine.load_strokes(vec![stroke("s1"), stroke("s2")]);
        let mut sink = DirectorySink::new(dir.path().join("outbox"));

        let report = submit_pending(&mut engine, &mut sink, "img", Some("me"));
        assert!(report.error.is_none());
        assert!(dir.path().join("outbox/s1.json").exists());
        assert!(dir.path().join("outbox/s2.json").exists());
        assert!(engine.pending_submission().is_empty());
    }

    #[test]
    fn directory_sink_rejects_ids_that_leave_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("a/b/outbox");
        let mut engine = StrokeEngine::new();
        engine.load_strokes(vec![stroke("../../escaped"), stroke("ok")]);
        let mut sink = DirectorySink::new(&outbox);

        let report = submit_pending(&mut engine, &mut sink, "img", None);
        assert!(matches!(report.error, Some(PersistenceError::Rejected { .. })));
        assert_eq!(report.submitted, 0);
        assert_eq!(report.remaining, 2);
        assert!(!dir.path().join("a/escaped.json").exists());

        for id in ["..", "", "x/y"] {
            let err = sink.submit(&StrokePayload::new("img", &stroke(id), None));
            assert!(err.is_err(), "{id:?} accepted");
        }
    }
}
