use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::Engine;
use super::players::ReconcileError;
use super::{
    NetworkChannel, ObjectCategory, PlayerState, Radar, RenderBackend, TerrainSampler,
    WorldObjectState,
};

/// Inbound server push, as `{"event": "...", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    PlayersUpdated(Vec<PlayerState>),
    PlayerUpdated(PlayerState),
    RechargeStationsUpdated(Vec<WorldObjectState>),
    ShipsUpdated(Vec<WorldObjectState>),
    DeadPlayersUpdated(Vec<WorldObjectState>),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::PlayersUpdated(_) => "PLAYERS_UPDATED",
            ServerEvent::PlayerUpdated(_) => "PLAYER_UPDATED",
            ServerEvent::RechargeStationsUpdated(_) => "RECHARGE_STATIONS_UPDATED",
            ServerEvent::ShipsUpdated(_) => "SHIPS_UPDATED",
            ServerEvent::DeadPlayersUpdated(_) => "DEAD_PLAYERS_UPDATED",
        }
    }
}

impl<R, N, M, T> Engine<R, N, M, T>
where
    R: RenderBackend,
    N: NetworkChannel,
    M: Radar,
    T: TerrainSampler,
{
    /// Routes one server push. Only a roster without the local player is
    /// surfaced; everything else recovers locally.
    pub fn handle_server_event(&mut self, event: ServerEvent) -> Result<(), ReconcileError> {
        debug!(event = event.name(), "server_event_received");
        match event {
            ServerEvent::PlayersUpdated(roster) => self.apply_roster(roster)?,
            ServerEvent::PlayerUpdated(update) => self.apply_delta(update),
            ServerEvent::RechargeStationsUpdated(objects) => {
                self.replace_collection(ObjectCategory::Stations, objects)
            }
            ServerEvent::ShipsUpdated(objects) => {
                self.replace_collection(ObjectCategory::Ships, objects)
            }
            ServerEvent::DeadPlayersUpdated(objects) => {
                self.replace_collection(ObjectCategory::Wrecks, objects)
            }
        }
        Ok(())
    }
}
