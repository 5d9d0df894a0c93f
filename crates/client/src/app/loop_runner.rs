use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use scrapline_engine::{Collaborators, Engine, Layer, NodeKey, ObjectCategory, ReconcileError, RenderBackend};
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;
use super::headless::{HeadlessRadar, HeadlessRenderer, LoggingNetwork, WaveTerrain};
use super::session::{Session, StepAction};

pub(crate) const DEFAULT_MAX_FRAMES: u64 = 36_000;

pub(crate) type HeadlessEngine =
    Engine<HeadlessRenderer, LoggingNetwork, HeadlessRadar, WaveTerrain>;

#[derive(Debug, Clone)]
pub(crate) struct LoopConfig {
    /// Frame cap; `None` runs frames back to back.
    pub(crate) target_fps: Option<u32>,
    /// Upper bound on frames for any session.
    pub(crate) max_frames: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_fps: Some(60),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SessionSummary {
    pub(crate) frames: u64,
    pub(crate) players: usize,
    pub(crate) stations: usize,
    pub(crate) ships: usize,
    pub(crate) wrecks: usize,
    pub(crate) network_events: usize,
    pub(crate) terrain_draws: u32,
    pub(crate) name_tags_hidden: bool,
    pub(crate) anchor: Option<NodeKey>,
    pub(crate) radar_players: usize,
    pub(crate) radar_objects: usize,
    pub(crate) radar_dots: usize,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring { config, session } = app;
    let mut engine = build_engine(&session);
    match run_session(&mut engine, &session, &config) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                players = summary.players,
                stations = summary.stations,
                ships = summary.ships,
                wrecks = summary.wrecks,
                network_events = summary.network_events,
                terrain_draws = summary.terrain_draws,
                name_tags_hidden = summary.name_tags_hidden,
                anchor = ?summary.anchor,
                radar_players = summary.radar_players,
                radar_objects = summary.radar_objects,
                radar_dots = summary.radar_dots,
                "session_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "reconciliation_failed");
            ExitCode::FAILURE
        }
    }
}

pub(crate) fn build_engine(session: &Session) -> HeadlessEngine {
    Engine::new(
        session.engine.clone(),
        Collaborators {
            renderer: HeadlessRenderer::default(),
            network: LoggingNetwork::default(),
            radar: HeadlessRadar::default(),
            terrain: WaveTerrain::default(),
        },
    )
}

/// Drives the engine through a scripted session: every step scheduled for a
/// frame is applied before that frame's update.
pub(crate) fn run_session(
    engine: &mut HeadlessEngine,
    session: &Session,
    config: &LoopConfig,
) -> Result<SessionSummary, ReconcileError> {
    let frame_count = session.frame_count.min(config.max_frames.max(1));
    if frame_count < session.frame_count {
        warn!(
            requested = session.frame_count,
            max_frames = config.max_frames,
            "session_frames_capped"
        );
    }
    let frame_target = target_frame_duration(normalize_render_fps_cap(config.target_fps));
    info!(
        frame_count,
        steps = session.steps.len(),
        render_fps_cap = %format_render_cap(config.target_fps),
        "loop_config"
    );

    let mut steps = session.steps.iter().peekable();
    for frame in 0..frame_count {
        let frame_start = Instant::now();
        while let Some(step) = steps.next_if(|step| step.frame == frame) {
            match &step.action {
                StepAction::Server(event) => engine.handle_server_event(event.clone())?,
                StepAction::Control(verb) => {
                    if engine.control(verb).is_none() {
                        warn!(frame, verb = verb.as_str(), "unknown_control_verb");
                    }
                }
            }
        }

        let report = engine.update();
        if let Some(metrics) = report.metrics {
            info!(
                fps = metrics.fps,
                frame_time_ms = metrics.frame_time_ms,
                terrain_redraws = metrics.terrain_redraws,
                offset = report.offset,
                "loop_metrics"
            );
        }

        let sleep = compute_cap_sleep(frame_start.elapsed(), frame_target);
        if !sleep.is_zero() {
            thread::sleep(sleep);
        }
    }

    let store = engine.store();
    let radar = engine.radar();
    Ok(SessionSummary {
        frames: frame_count,
        players: store.players().len(),
        stations: store.collection(ObjectCategory::Stations).len(),
        ships: store.collection(ObjectCategory::Ships).len(),
        wrecks: store.collection(ObjectCategory::Wrecks).len(),
        network_events: engine.network().sent.len(),
        terrain_draws: engine.renderer().terrain_draws,
        name_tags_hidden: engine.renderer().layer_hidden(Layer::NameTags),
        anchor: engine.renderer().anchor().cloned(),
        radar_players: radar.players,
        radar_objects: radar.ships + radar.stations,
        radar_dots: radar.dots,
    })
}

pub(crate) fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match normalize_render_fps_cap(cap) {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}
