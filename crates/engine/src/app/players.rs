use thiserror::Error;
use tracing::{debug, info, warn};

use super::coords::{name_tag_anchor, world_to_screen};
use super::engine::Engine;
use super::nodes::{player_label, player_label_lines};
use super::store::LocalPlayer;
use super::{
    Layer, NetworkChannel, Node, NodeKey, PlayerEntity, PlayerId, PlayerNode, PlayerState, Radar,
    RenderBackend, TerrainSampler, Transform,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("roster does not contain local player {local_player_id}; camera has no anchor target")]
    LocalPlayerMissing { local_player_id: PlayerId },
}

impl<R, N, M, T> Engine<R, N, M, T>
where
    R: RenderBackend,
    N: NetworkChannel,
    M: Radar,
    T: TerrainSampler,
{
    /// Replaces the whole player roster and re-anchors the camera on the
    /// local player.
    ///
    /// A roster without the local player is rejected before anything is torn
    /// down; the store and installed nodes are left as they were.
    pub fn apply_roster(&mut self, roster: Vec<PlayerState>) -> Result<(), ReconcileError> {
        let local_player_id = self.store.local_player_id.clone();
        if !roster.iter().any(|player| player.id == local_player_id) {
            warn!(
                local_player_id = %local_player_id,
                roster_len = roster.len(),
                "roster_missing_local_player"
            );
            return Err(ReconcileError::LocalPlayerMissing { local_player_id });
        }

        let previous_count = self.store.players.len();
        for (_, player) in self.store.players.drain() {
            remove_player_nodes(&mut self.renderer, &player);
        }

        let viewport = self.config.viewport;
        let mut radar_players: Vec<PlayerState> = Vec::with_capacity(roster.len());
        for state in roster {
            if let Some(duplicate) = self.store.players.remove(&state.id) {
                warn!(player_id = %state.id, "roster_duplicate_player");
                remove_player_nodes(&mut self.renderer, &duplicate);
                radar_players.retain(|radar_player| radar_player.id != state.id);
            }

            let is_local = state.id == local_player_id;
            let node = NodeKey::player(&state.id);
            let position = if is_local {
                state.position
            } else {
                world_to_screen(state.position, viewport)
            };
            self.renderer.add_node(
                Layer::Players,
                Node::Player(PlayerNode {
                    key: node.clone(),
                    id: state.id.clone(),
                    display_name: state.name.clone(),
                    transform: Transform {
                        position,
                        rotation_radians: state.rotation,
                    },
                    is_local,
                }),
            );

            let label = if is_local {
                None
            } else {
                let label = player_label(
                    &state.id,
                    &state.name,
                    state.value,
                    name_tag_anchor(state.position, viewport),
                );
                let key = label.key.clone();
                self.renderer.add_node(Layer::NameTags, Node::Label(label));
                radar_players.push(state.clone());
                Some(key)
            };

            self.store.players.insert(
                state.id.clone(),
                PlayerEntity::from_state(state, is_local, node, label),
            );
        }

        self.radar.set_players(&radar_players);
        self.store.radar_players = radar_players;

        let anchor = match self.store.local_player() {
            LocalPlayer::Present(player) => player.node.clone(),
            LocalPlayer::Absent => {
                return Err(ReconcileError::LocalPlayerMissing { local_player_id });
            }
        };
        self.set_anchor(anchor);

        info!(
            previous_count,
            count = self.store.players.len(),
            remote_count = self.store.radar_players.len(),
            "roster_applied"
        );
        Ok(())
    }

    /// Applies one per-tick update. Remote players only move, fire and
    /// refresh their label; the local player also takes velocity, resources
    /// and health from the server. Unknown ids are dropped.
    pub fn apply_delta(&mut self, update: PlayerState) {
        let viewport = self.config.viewport;
        let Some(player) = self.store.players.get_mut(&update.id) else {
            debug!(player_id = %update.id, "delta_dropped_unknown_player");
            return;
        };

        player.position = update.position;
        player.rotation = update.rotation;

        if player.is_local {
            self.renderer.transform_node(
                &player.node,
                Transform {
                    position: update.position,
                    rotation_radians: update.rotation,
                },
            );
            player.velocity = update.velocity;
            player.resources = update.resources;
            player.health = update.health;
        } else {
            self.renderer.transform_node(
                &player.node,
                Transform {
                    position: world_to_screen(update.position, viewport),
                    rotation_radians: update.rotation,
                },
            );
            if let Some(label) = &player.label {
                self.renderer.transform_node(
                    label,
                    Transform {
                        position: name_tag_anchor(update.position, viewport),
                        rotation_radians: 0.0,
                    },
                );
            }
            for _ in 0..update.fire {
                self.renderer.play_fire(&player.node);
            }

            self.store
                .radar_players
                .retain(|radar_player| radar_player.id != update.id);
            self.store.radar_players.push(update.clone());
            self.radar.set_players(&self.store.radar_players);
        }

        player.value = update.value;
        player.movement_state = update.movement_state;
        if let Some(label) = &player.label {
            self.renderer
                .set_label_text(label, &player_label_lines(&player.name, player.value));
        }
        self.renderer
            .set_movement_state(&player.node, update.movement_state);

        debug!(
            player_id = %update.id,
            fire = update.fire,
            is_local = player.is_local,
            "delta_applied"
        );
    }
}

fn remove_player_nodes<R: RenderBackend>(renderer: &mut R, player: &PlayerEntity) {
    if let Some(label) = &player.label {
        renderer.remove_node(label);
    }
    renderer.remove_node(&player.node);
}
