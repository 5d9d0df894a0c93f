use std::fmt;

use serde::{Deserialize, Serialize};

use super::nodes::{NodeKey, ObjectCategory};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fuel, W and scrap carried by a player or offered by a world object.
/// World objects never carry scrap on the wire; it defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceBundle {
    #[serde(default)]
    pub fuel: f32,
    #[serde(rename = "W", default)]
    pub w: f32,
    #[serde(default)]
    pub scrap: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovementState {
    #[default]
    Idle,
    Thrust,
    Boost,
}

/// Authoritative snapshot of one player as pushed by the server, used both
/// for roster entries and per-tick deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    pub position: Vec2,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default)]
    pub health: f32,
    #[serde(default)]
    pub resources: ResourceBundle,
    #[serde(default)]
    pub value: f32,
    /// Shots fired since the previous delta for this player.
    #[serde(default)]
    pub fire: u32,
    #[serde(default)]
    pub movement_state: MovementState,
}

/// Station, ship or wreck. Wrecks arrive with `uuid` instead of `id` and
/// carry the name of the player that died there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldObjectState {
    #[serde(alias = "uuid")]
    pub id: String,
    pub name: String,
    pub x_position: f32,
    #[serde(default)]
    pub resources: ResourceBundle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

/// Local mirror of a connected player plus the keys of the nodes the
/// engine installed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntity {
    pub id: PlayerId,
    pub name: String,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub health: f32,
    pub resources: ResourceBundle,
    pub value: f32,
    pub movement_state: MovementState,
    pub is_local: bool,
    pub node: NodeKey,
    pub label: Option<NodeKey>,
}

impl PlayerEntity {
    pub(crate) fn from_state(
        state: PlayerState,
        is_local: bool,
        node: NodeKey,
        label: Option<NodeKey>,
    ) -> Self {
        Self {
            id: state.id,
            name: state.name,
            position: state.position,
            rotation: state.rotation,
            velocity: state.velocity,
            health: state.health,
            resources: state.resources,
            value: state.value,
            movement_state: state.movement_state,
            is_local,
            node,
            label,
        }
    }
}

/// World object the local player is currently docked at.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentResource {
    pub category: ObjectCategory,
    pub id: String,
    pub name: String,
    pub resources: ResourceBundle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemsReadout {
    pub fuel: f32,
    pub health: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceReadout {
    pub w: f32,
    pub scrap: f32,
    pub value: f32,
}
