use std::collections::{HashMap, HashSet};

use scrapline_engine::{
    CurrentResource, Layer, MovementState, NetworkChannel, NetworkEvent, Node, NodeKey,
    ObjectCategory, PlayerCapabilities, PlayerState, Radar, RenderBackend, RenderPass,
    ResourceCapabilities, SpriteNode, TerrainBand, TerrainSampler, Transform, WorldObjectState,
};
use tracing::{debug, info, trace, warn};

/// Smallest docking reach, for categories whose hitbox is narrower.
const MIN_DOCK_REACH: f32 = 20.0;

/// Scene graph kept in memory. Stands in for a drawing backend and
/// performs the docking checks a station sprite would do on screen.
#[derive(Debug, Default)]
pub(crate) struct HeadlessRenderer {
    nodes: HashMap<NodeKey, (Layer, Node)>,
    hidden: HashSet<Layer>,
    anchor: Option<NodeKey>,
    docked_at: Option<NodeKey>,
    pub(crate) fires: u32,
    pub(crate) terrain_draws: u32,
    pub(crate) render_passes: u32,
    pub(crate) explosions: u32,
}

impl HeadlessRenderer {
    pub(crate) fn node_count(&self, layer: Layer) -> usize {
        self.nodes
            .values()
            .filter(|(node_layer, _)| *node_layer == layer)
            .count()
    }

    pub(crate) fn anchor(&self) -> Option<&NodeKey> {
        self.anchor.as_ref()
    }

    fn docking_candidate(&self, local_x: f32) -> Option<&SpriteNode> {
        self.nodes.values().find_map(|(_, node)| match node {
            Node::Sprite(sprite) if sprite.category != ObjectCategory::Ships => {
                let reach = sprite.hitbox.w.max(MIN_DOCK_REACH);
                ((sprite.world_x - local_x).abs() <= reach).then_some(sprite)
            }
            _ => None,
        })
    }
}

impl RenderBackend for HeadlessRenderer {
    fn add_node(&mut self, layer: Layer, node: Node) {
        let key = node.key().clone();
        trace!(layer = layer.name(), key = %key, "node_added");
        if self.nodes.insert(key.clone(), (layer, node)).is_some() {
            warn!(key = %key, "node_replaced_without_removal");
        }
    }

    fn remove_node(&mut self, key: &NodeKey) -> bool {
        if self.docked_at.as_ref() == Some(key) {
            self.docked_at = None;
        }
        self.nodes.remove(key).is_some()
    }

    fn has_node(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    fn transform_node(&mut self, key: &NodeKey, transform: Transform) {
        match self.nodes.get_mut(key) {
            Some((_, Node::Player(player))) => player.transform = transform,
            Some((_, Node::Label(label))) => label.position = transform.position,
            Some((_, Node::Sprite(sprite))) => {
                sprite.position = transform.position;
                sprite.rotation_radians = transform.rotation_radians;
            }
            Some((_, Node::Terrain(_))) | None => {}
        }
    }

    fn set_label_text(&mut self, key: &NodeKey, lines: &[String]) {
        if let Some((_, Node::Label(label))) = self.nodes.get_mut(key) {
            label.lines = lines.to_vec();
        }
    }

    fn play_fire(&mut self, key: &NodeKey) {
        self.fires = self.fires.saturating_add(1);
        debug!(key = %key, "fire_played");
    }

    fn set_movement_state(&mut self, key: &NodeKey, state: MovementState) {
        trace!(key = %key, state = ?state, "movement_state_set");
    }

    fn explode(&mut self, key: &NodeKey) {
        self.explosions = self.explosions.saturating_add(1);
        info!(key = %key, "explosion_played");
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
        self.terrain_draws = self.terrain_draws.saturating_add(1);
        debug!(band = band.name(), offset, "terrain_drawn");
    }

    fn render(
        &mut self,
        pass: RenderPass,
        players: &mut dyn PlayerCapabilities,
        resources: &mut dyn ResourceCapabilities,
    ) {
        self.render_passes = self.render_passes.saturating_add(1);

        let local_x = players
            .player(players.local_player_id())
            .map(|player| player.position.x);
        let candidate = local_x.and_then(|x| {
            self.docking_candidate(x).map(|sprite| {
                (
                    sprite.key.clone(),
                    CurrentResource {
                        category: sprite.category,
                        id: sprite.object_id.clone(),
                        name: sprite.name.clone(),
                        resources: sprite.resources,
                    },
                )
            })
        });

        match candidate {
            Some((key, resource)) if self.docked_at.as_ref() != Some(&key) => {
                if !resources.radar_interrupt() {
                    resources.set_radar_text(&format!("Docked at {}", resource.name));
                }
                info!(key = %key, offset = pass.offset, "docked");
                resources.set_current_resource(Some(resource));
                self.docked_at = Some(key);
            }
            Some(_) => {}
            None => {
                if self.docked_at.take().is_some() {
                    info!(offset = pass.offset, "undocked");
                    resources.set_current_resource(None);
                    if !resources.radar_interrupt() {
                        resources.set_radar_text("");
                    }
                }
            }
        }
    }
}

/// Network channel that only logs outbound intents.
#[derive(Debug, Default)]
pub(crate) struct LoggingNetwork {
    pub(crate) sent: Vec<NetworkEvent>,
}

impl NetworkChannel for LoggingNetwork {
    fn emit(&mut self, event: NetworkEvent) {
        match event.payload() {
            Some(payload) => info!(event = event.name(), %payload, "network_emit"),
            None => info!(event = event.name(), "network_emit"),
        }
        self.sent.push(event);
    }
}

#[derive(Debug, Default)]
pub(crate) struct HeadlessRadar {
    pub(crate) players: usize,
    pub(crate) ships: usize,
    pub(crate) stations: usize,
    pub(crate) dots: usize,
    interrupt: bool,
    text: String,
}

impl Radar for HeadlessRadar {
    fn set_players(&mut self, players: &[PlayerState]) {
        self.players = players.len();
    }

    fn set_ships(&mut self, objects: &[WorldObjectState]) {
        self.ships = objects.len();
    }

    fn set_recharge_stations(&mut self, stations: &[WorldObjectState]) {
        self.stations = stations.len();
    }

    fn add_dot(&mut self, world_x: f32, local_player_x: f32) {
        self.dots = self.dots.saturating_add(1);
        trace!(world_x, local_player_x, "radar_dot");
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

/// Rolling sine ground line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WaveTerrain {
    pub(crate) base: f32,
    pub(crate) amplitude: f32,
    pub(crate) wavelength: f32,
}

impl Default for WaveTerrain {
    fn default() -> Self {
        Self {
            base: 520.0,
            amplitude: 40.0,
            wavelength: 600.0,
        }
    }
}

impl TerrainSampler for WaveTerrain {
    fn sample(&self, world_x: f32, camera_offset: f32) -> f32 {
        let phase = (world_x - camera_offset) / self.wavelength.max(f32::EPSILON);
        self.base + self.amplitude * (phase * std::f32::consts::TAU).sin()
    }
}
