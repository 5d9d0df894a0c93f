use serde_json::{json, Value};

use super::store::PlayerMap;
use super::{
    CurrentResource, Layer, MovementState, Node, NodeKey, PlayerEntity, PlayerId, PlayerState,
    TerrainBand, Transform, WorldObjectState,
};

/// Scene-graph backend. Nodes installed through `add_node` are owned by the
/// engine until it removes them again.
pub trait RenderBackend {
    fn add_node(&mut self, layer: Layer, node: Node);
    fn remove_node(&mut self, key: &NodeKey) -> bool;
    fn has_node(&self, key: &NodeKey) -> bool;
    fn transform_node(&mut self, key: &NodeKey, transform: Transform);
    fn set_label_text(&mut self, key: &NodeKey, lines: &[String]);
    fn play_fire(&mut self, key: &NodeKey);
    fn set_movement_state(&mut self, key: &NodeKey, state: MovementState);
    fn explode(&mut self, key: &NodeKey);
    fn set_anchor(&mut self, key: &NodeKey);
    fn layer_hidden(&self, layer: Layer) -> bool;
    fn show_layer(&mut self, layer: Layer);
    fn hide_layer(&mut self, layer: Layer);
    fn draw_terrain(&mut self, band: TerrainBand, offset: f32);
    fn render(
        &mut self,
        pass: RenderPass,
        players: &mut dyn PlayerCapabilities,
        resources: &mut dyn ResourceCapabilities,
    );
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPass {
    pub offset: f32,
    pub dt_seconds: f32,
}

pub trait NetworkChannel {
    fn emit(&mut self, event: NetworkEvent);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    PlayerHasShot,
    PlayerHasDamaged { id: PlayerId, val: u32 },
}

impl NetworkEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            NetworkEvent::PlayerHasShot => "PLAYER_HAS_SHOT",
            NetworkEvent::PlayerHasDamaged { .. } => "PLAYER_HAS_DAMAGED",
        }
    }

    pub fn payload(&self) -> Option<Value> {
        match self {
            NetworkEvent::PlayerHasShot => None,
            NetworkEvent::PlayerHasDamaged { id, val } => Some(json!({ "id": id, "val": val })),
        }
    }
}

/// Minimap widget. Wrecks are pushed through `set_ships`; the radar has no
/// dedicated wreck list.
pub trait Radar {
    fn set_players(&mut self, players: &[PlayerState]);
    fn set_ships(&mut self, objects: &[WorldObjectState]);
    fn set_recharge_stations(&mut self, stations: &[WorldObjectState]);
    fn add_dot(&mut self, world_x: f32, local_player_x: f32);
    fn interrupt(&self) -> bool;
    fn set_interrupt(&mut self, interrupt: bool);
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
}

pub trait TerrainSampler {
    fn sample(&self, world_x: f32, camera_offset: f32) -> f32;
}

impl<F> TerrainSampler for F
where
    F: Fn(f32, f32) -> f32,
{
    fn sample(&self, world_x: f32, camera_offset: f32) -> f32 {
        self(world_x, camera_offset)
    }
}

/// What a player render entity may reach during a render pass.
pub trait PlayerCapabilities {
    fn players(&self) -> &PlayerMap;
    fn local_player_id(&self) -> &PlayerId;
    fn report_damage(&mut self, id: &PlayerId, magnitude: u32);

    fn player(&self, id: &PlayerId) -> Option<&PlayerEntity> {
        self.players().get(id)
    }
}

/// What a world-object render entity may reach during a render pass.
pub trait ResourceCapabilities {
    fn set_current_resource(&mut self, resource: Option<CurrentResource>);
    fn radar_interrupt(&self) -> bool;
    fn radar_text(&self) -> String;
    fn set_radar_text(&mut self, text: &str);
}

pub(crate) struct PlayerHooks<'a> {
    pub(crate) players: &'a PlayerMap,
    pub(crate) local_player_id: &'a PlayerId,
    pub(crate) network: &'a mut dyn NetworkChannel,
}

impl PlayerCapabilities for PlayerHooks<'_> {
    fn players(&self) -> &PlayerMap {
        self.players
    }

    fn local_player_id(&self) -> &PlayerId {
        self.local_player_id
    }

    fn report_damage(&mut self, id: &PlayerId, magnitude: u32) {
        self.network.emit(NetworkEvent::PlayerHasDamaged {
            id: id.clone(),
            val: magnitude,
        });
    }
}

pub(crate) struct ResourceHooks<'a> {
    pub(crate) current_resource: &'a mut Option<CurrentResource>,
    pub(crate) radar: &'a mut dyn Radar,
}

impl ResourceCapabilities for ResourceHooks<'_> {
    fn set_current_resource(&mut self, resource: Option<CurrentResource>) {
        *self.current_resource = resource;
    }

    fn radar_interrupt(&self) -> bool {
        self.radar.interrupt()
    }

    fn radar_text(&self) -> String {
        self.radar.text()
    }

    fn set_radar_text(&mut self, text: &str) {
        self.radar.set_text(text);
    }
}
