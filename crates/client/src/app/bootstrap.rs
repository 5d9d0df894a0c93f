use std::env;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::loop_runner::{normalize_render_fps_cap, LoopConfig};
use super::session::{load_session, parse_session, Session, SessionError};

pub(crate) const SESSION_ENV_VAR: &str = "SCRAPLINE_SESSION";
pub(crate) const TARGET_FPS_ENV_VAR: &str = "SCRAPLINE_TARGET_FPS";

const DEMO_SESSION: &str = include_str!("../../sessions/demo.json");

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) session: Session,
}

pub(crate) fn build_app() -> Result<AppWiring, SessionError> {
    init_tracing();
    info!("=== Scrapline Client Startup ===");

    let session = match resolve_session_path() {
        Some(path) => {
            info!(path = %path.display(), "session_file");
            load_session(&path)?
        }
        None => {
            info!(env_var = SESSION_ENV_VAR, "session_builtin_demo");
            parse_session(DEMO_SESSION)?
        }
    };

    let config = LoopConfig {
        target_fps: resolve_target_fps(session.target_fps.or(LoopConfig::default().target_fps)),
        ..LoopConfig::default()
    };

    Ok(AppWiring { config, session })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_session_path() -> Option<PathBuf> {
    env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::var_os(SESSION_ENV_VAR).map(PathBuf::from))
        .filter(|path| !path.as_os_str().is_empty())
}

fn resolve_target_fps(configured: Option<u32>) -> Option<u32> {
    match env::var(TARGET_FPS_ENV_VAR) {
        Ok(value) => parse_target_fps(&value).unwrap_or_else(|| {
            warn!(
                env_var = TARGET_FPS_ENV_VAR,
                value = value.as_str(),
                "invalid target-fps env var value; falling back to config"
            );
            configured
        }),
        Err(env::VarError::NotPresent) => configured,
        Err(err) => {
            warn!(
                env_var = TARGET_FPS_ENV_VAR,
                error = %err,
                "unable to read target-fps env var; falling back to config"
            );
            configured
        }
    }
}

/// `off` or `0` disables the cap.
fn parse_target_fps(raw: &str) -> Option<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("off") {
        return Some(None);
    }
    trimmed
        .parse::<u32>()
        .ok()
        .map(|fps| normalize_render_fps_cap(Some(fps)))
}
