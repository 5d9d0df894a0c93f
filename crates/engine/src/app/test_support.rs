use std::collections::{BTreeMap, HashMap, HashSet};

use super::engine::{Collaborators, Engine, EngineConfig};
use super::{
    CurrentResource, Layer, MovementState, NetworkChannel, NetworkEvent, Node, NodeKey,
    PlayerCapabilities, PlayerId, PlayerState, Radar, RenderBackend, RenderPass,
    ResourceBundle, ResourceCapabilities, TerrainBand, Transform, Vec2, WorldObjectState,
};

pub(crate) const FLAT_TERRAIN_HEIGHT: f32 = 480.0;

pub(crate) type FlatTerrain = fn(f32, f32) -> f32;

pub(crate) type TestEngine =
    Engine<RecordingRenderer, RecordingNetwork, RecordingRadar, FlatTerrain>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RendererOp {
    Add(NodeKey),
    Remove(NodeKey),
    Transform(NodeKey),
    LabelText(NodeKey),
    Fire(NodeKey),
    Movement(NodeKey),
    Explode(NodeKey),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub(crate) nodes: BTreeMap<NodeKey, (Layer, Node)>,
    pub(crate) ops: Vec<RendererOp>,
    pub(crate) duplicate_adds: usize,
    pub(crate) hidden: HashSet<Layer>,
    pub(crate) anchor: Option<NodeKey>,
    pub(crate) exploded: Vec<NodeKey>,
    pub(crate) fires: HashMap<NodeKey, u32>,
    pub(crate) transforms: HashMap<NodeKey, Transform>,
    pub(crate) labels: HashMap<NodeKey, Vec<String>>,
    pub(crate) movement_states: HashMap<NodeKey, MovementState>,
    pub(crate) terrain_draws: Vec<(TerrainBand, f32)>,
    pub(crate) render_passes: Vec<RenderPass>,
    pub(crate) players_seen: Vec<usize>,
    pub(crate) damage_on_render: Option<(PlayerId, u32)>,
    pub(crate) dock_on_render: Option<CurrentResource>,
    pub(crate) radar_text_on_render: Option<String>,
}

impl RecordingRenderer {
    pub(crate) fn keys_in(&self, layer: Layer) -> Vec<NodeKey> {
        self.nodes
            .iter()
            .filter(|(_, (node_layer, _))| *node_layer == layer)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub(crate) fn node_count(&self, layer: Layer) -> usize {
        self.nodes
            .values()
            .filter(|(node_layer, _)| *node_layer == layer)
            .count()
    }

    pub(crate) fn transform_of(&self, key: &NodeKey) -> Option<Transform> {
        self.transforms.get(key).copied()
    }

    pub(crate) fn fire_count(&self, key: &NodeKey) -> u32 {
        self.fires.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn total_fires(&self) -> u32 {
        self.fires.values().sum()
    }

    pub(crate) fn label_lines(&self, key: &NodeKey) -> Option<Vec<String>> {
        self.labels.get(key).cloned()
    }

    pub(crate) fn movement_state_of(&self, key: &NodeKey) -> Option<MovementState> {
        self.movement_states.get(key).copied()
    }
}

impl RenderBackend for RecordingRenderer {
    fn add_node(&mut self, layer: Layer, node: Node) {
        let key = node.key().clone();
        match &node {
            Node::Sprite(sprite) => {
                self.transforms.insert(
                    key.clone(),
                    Transform {
                        position: sprite.position,
                        rotation_radians: sprite.rotation_radians,
                    },
                );
            }
            Node::Player(player) => {
                self.transforms.insert(key.clone(), player.transform);
            }
            Node::Label(label) => {
                self.transforms.insert(
                    key.clone(),
                    Transform {
                        position: label.position,
                        rotation_radians: 0.0,
                    },
                );
                self.labels.insert(key.clone(), label.lines.clone());
            }
            Node::Terrain(_) => {}
        }
        if self.nodes.insert(key.clone(), (layer, node)).is_some() {
            self.duplicate_adds += 1;
        }
        self.ops.push(RendererOp::Add(key));
    }

    fn remove_node(&mut self, key: &NodeKey) -> bool {
        self.ops.push(RendererOp::Remove(key.clone()));
        self.transforms.remove(key);
        self.labels.remove(key);
        self.nodes.remove(key).is_some()
    }

    fn has_node(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    fn transform_node(&mut self, key: &NodeKey, transform: Transform) {
        self.ops.push(RendererOp::Transform(key.clone()));
        self.transforms.insert(key.clone(), transform);
    }

    fn set_label_text(&mut self, key: &NodeKey, lines: &[String]) {
        self.ops.push(RendererOp::LabelText(key.clone()));
        self.labels.insert(key.clone(), lines.to_vec());
    }

    fn play_fire(&mut self, key: &NodeKey) {
        self.ops.push(RendererOp::Fire(key.clone()));
        *self.fires.entry(key.clone()).or_insert(0) += 1;
    }

    fn set_movement_state(&mut self, key: &NodeKey, state: MovementState) {
        self.ops.push(RendererOp::Movement(key.clone()));
        self.movement_states.insert(key.clone(), state);
    }

    fn explode(&mut self, key: &NodeKey) {
        self.ops.push(RendererOp::Explode(key.clone()));
        self.exploded.push(key.clone());
    }

    fn set_anchor(&mut self, key: &NodeKey) {
        self.anchor = Some(key.clone());
    }

    fn layer_hidden(&self, layer: Layer) -> bool {
        self.hidden.contains(&layer)
    }

    fn show_layer(&mut self, layer: Layer) {
        self.hidden.remove(&layer);
    }

    fn hide_layer(&mut self, layer: Layer) {
        self.hidden.insert(layer);
    }

    fn draw_terrain(&mut self, band: TerrainBand, offset: f32) {
        self.terrain_draws.push((band, offset));
    }

    fn render(
        &mut self,
        pass: RenderPass,
        players: &mut dyn PlayerCapabilities,
        resources: &mut dyn ResourceCapabilities,
    ) {
        self.render_passes.push(pass);
        self.players_seen.push(players.players().len());
        if let Some((id, magnitude)) = self.damage_on_render.take() {
            players.report_damage(&id, magnitude);
        }
        if let Some(resource) = self.dock_on_render.take() {
            resources.set_current_resource(Some(resource));
        }
        if let Some(text) = self.radar_text_on_render.take() {
            resources.set_radar_text(&text);
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNetwork {
    pub(crate) sent: Vec<NetworkEvent>,
}

impl NetworkChannel for RecordingNetwork {
    fn emit(&mut self, event: NetworkEvent) {
        self.sent.push(event);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingRadar {
    pub(crate) players: Vec<PlayerState>,
    pub(crate) ships: Vec<WorldObjectState>,
    pub(crate) stations: Vec<WorldObjectState>,
    pub(crate) dots: Vec<(f32, f32)>,
    pub(crate) interrupt: bool,
    pub(crate) text: String,
}

impl Radar for RecordingRadar {
    fn set_players(&mut self, players: &[PlayerState]) {
        self.players = players.to_vec();
    }

    fn set_ships(&mut self, objects: &[WorldObjectState]) {
        self.ships = objects.to_vec();
    }

    fn set_recharge_stations(&mut self, stations: &[WorldObjectState]) {
        self.stations = stations.to_vec();
    }

    fn add_dot(&mut self, world_x: f32, local_player_x: f32) {
        self.dots.push((world_x, local_player_x));
    }

    fn interrupt(&self) -> bool {
        self.interrupt
    }

    fn set_interrupt(&mut self, interrupt: bool) {
        self.interrupt = interrupt;
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

fn flat_terrain(_world_x: f32, _camera_offset: f32) -> f32 {
    FLAT_TERRAIN_HEIGHT
}

pub(crate) fn test_engine() -> TestEngine {
    Engine::new(
        EngineConfig::default(),
        Collaborators {
            renderer: RecordingRenderer::default(),
            network: RecordingNetwork::default(),
            radar: RecordingRadar::default(),
            terrain: flat_terrain as FlatTerrain,
        },
    )
}

pub(crate) fn remote_player(id: &str, x: f32) -> PlayerState {
    PlayerState {
        id: PlayerId::from(id),
        name: id.to_string(),
        position: Vec2::new(x, 0.0),
        rotation: 0.0,
        velocity: Vec2::default(),
        health: 100.0,
        resources: ResourceBundle::default(),
        value: 0.0,
        fire: 0,
        movement_state: MovementState::Idle,
    }
}

pub(crate) fn local_player(x: f32) -> PlayerState {
    remote_player("me", x)
}

pub(crate) fn world_object(name: &str, x: f32) -> WorldObjectState {
    WorldObjectState {
        id: format!("{name}-id"),
        name: name.to_string(),
        x_position: x,
        resources: ResourceBundle::default(),
        player_name: None,
    }
}
