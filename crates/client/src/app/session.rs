use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scrapline_engine::{EngineConfig, ServerEvent};
use serde::Deserialize;
use thiserror::Error;

/// Frames run after the last scripted step when a session does not set
/// `frames` explicitly.
const TRAILING_FRAMES: u64 = 1;

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("read session '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse session json{}: {source}", at_location(.location))]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {path}: {message}")]
    Invalid { path: String, message: String },
}

fn at_location(location: &str) -> String {
    if location.is_empty() || location == "." {
        String::new()
    } else {
        format!(" at {location}")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSession {
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    frames: Option<u64>,
    #[serde(default)]
    target_fps: Option<u32>,
    #[serde(default)]
    timeline: Vec<RawTimelineEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTimelineEntry {
    frame: u64,
    #[serde(default)]
    server: Option<ServerEvent>,
    #[serde(default)]
    control: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StepAction {
    Server(ServerEvent),
    Control(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScriptedStep {
    pub(crate) frame: u64,
    pub(crate) action: StepAction,
}

/// A validated scripted session: engine configuration plus server pushes
/// and local verbs keyed to the frame they land before.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Session {
    pub(crate) engine: EngineConfig,
    pub(crate) frame_count: u64,
    pub(crate) target_fps: Option<u32>,
    pub(crate) steps: Vec<ScriptedStep>,
}

pub(crate) fn load_session(path: &Path) -> Result<Session, SessionError> {
    let raw = fs::read_to_string(path).map_err(|source| SessionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_session(&raw)
}

pub(crate) fn parse_session(raw: &str) -> Result<Session, SessionError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let session = serde_path_to_error::deserialize::<_, RawSession>(&mut deserializer).map_err(
        |error| {
            let location = error.path().to_string();
            SessionError::Parse {
                location,
                source: error.into_inner(),
            }
        },
    )?;
    validate_session(session)
}

fn invalid(path: impl Into<String>, message: impl Into<String>) -> SessionError {
    SessionError::Invalid {
        path: path.into(),
        message: message.into(),
    }
}

fn validate_session(raw: RawSession) -> Result<Session, SessionError> {
    if raw.engine.local_player_id.as_str().is_empty() {
        return Err(invalid("engine.local_player_id", "must not be empty"));
    }
    if raw.engine.viewport.width == 0 || raw.engine.viewport.height == 0 {
        return Err(invalid("engine.viewport", "width and height must be positive"));
    }
    if raw.frames == Some(0) {
        return Err(invalid("frames", "must be positive when set"));
    }

    let mut steps = Vec::with_capacity(raw.timeline.len());
    let mut previous_frame = 0;
    for (index, entry) in raw.timeline.into_iter().enumerate() {
        let path = format!("timeline[{index}]");
        if entry.frame < previous_frame {
            return Err(invalid(
                format!("{path}.frame"),
                format!(
                    "expected frame >= {previous_frame}, got {}",
                    entry.frame
                ),
            ));
        }
        if let Some(frames) = raw.frames {
            if entry.frame >= frames {
                return Err(invalid(
                    format!("{path}.frame"),
                    format!("frame {} is outside the {frames}-frame session", entry.frame),
                ));
            }
        }
        previous_frame = entry.frame;

        let action = match (entry.server, entry.control) {
            (Some(event), None) => StepAction::Server(event),
            (None, Some(verb)) => StepAction::Control(verb),
            (Some(_), Some(_)) => {
                return Err(invalid(path, "set either server or control, not both"));
            }
            (None, None) => {
                return Err(invalid(path, "expected a server event or a control verb"));
            }
        };
        steps.push(ScriptedStep {
            frame: entry.frame,
            action,
        });
    }

    let frame_count = match (raw.frames, steps.last()) {
        (Some(frames), _) => frames,
        (None, None) => TRAILING_FRAMES,
        (None, Some(step)) => step
            .frame
            .checked_add(1 + TRAILING_FRAMES)
            .ok_or_else(|| {
                invalid(
                    format!("timeline[{}].frame", steps.len() - 1),
                    format!("frame {} leaves no room for a frame count", step.frame),
                )
            })?,
    };

    Ok(Session {
        engine: raw.engine,
        frame_count,
        target_fps: raw.target_fps,
        steps,
    })
}
