use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::coords::Viewport;
use super::loop_runner::FrameClock;
use super::metrics::{MetricsAccumulator, MetricsHandle};
use super::store::{LocalPlayer, WorldStore};
use super::{
    CurrentResource, Layer, NetworkChannel, NetworkEvent, Node, NodeKey, PlayerId, Radar,
    RenderBackend, ResourceReadout, SystemsReadout, TerrainBand, TerrainNode, TerrainSampler,
    Vec2,
};

pub const DEFAULT_LOCAL_PLAYER_ID: &str = "me";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub local_player_id: PlayerId,
    pub viewport: Viewport,
    pub metrics_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            local_player_id: PlayerId::from(DEFAULT_LOCAL_PLAYER_ID),
            viewport: Viewport::default(),
            metrics_interval_ms: 1_000,
        }
    }
}

impl EngineConfig {
    pub fn metrics_interval(&self) -> Duration {
        if self.metrics_interval_ms == 0 {
            Duration::from_secs(1)
        } else {
            Duration::from_millis(self.metrics_interval_ms)
        }
    }
}

/// External collaborators handed to the engine at construction.
pub struct Collaborators<R, N, M, T> {
    pub renderer: R,
    pub network: N,
    pub radar: M,
    pub terrain: T,
}

/// Owned engine context: the world store plus every collaborator the
/// synchronizer, reconciliation, paging, command and frame operations use.
pub struct Engine<R, N, M, T> {
    pub(crate) config: EngineConfig,
    pub(crate) store: WorldStore,
    pub(crate) renderer: R,
    pub(crate) network: N,
    pub(crate) radar: M,
    pub(crate) terrain: T,
    pub(crate) clock: FrameClock,
    pub(crate) last_dt_seconds: f32,
    pub(crate) metrics: MetricsAccumulator,
    pub(crate) metrics_handle: MetricsHandle,
}

impl<R, N, M, T> Engine<R, N, M, T>
where
    R: RenderBackend,
    N: NetworkChannel,
    M: Radar,
    T: TerrainSampler,
{
    pub fn new(config: EngineConfig, collaborators: Collaborators<R, N, M, T>) -> Self {
        let Collaborators {
            mut renderer,
            network,
            radar,
            terrain,
        } = collaborators;

        for band in TerrainBand::ALL {
            renderer.add_node(
                Layer::Terrain,
                Node::Terrain(TerrainNode {
                    key: NodeKey::terrain(band),
                    band,
                }),
            );
        }

        info!(
            local_player_id = %config.local_player_id,
            viewport_width = config.viewport.width,
            viewport_height = config.viewport.height,
            "engine_started"
        );

        let metrics = MetricsAccumulator::new(config.metrics_interval());
        Self {
            store: WorldStore::new(config.local_player_id.clone()),
            config,
            renderer,
            network,
            radar,
            terrain,
            clock: FrameClock::new(),
            last_dt_seconds: 0.0,
            metrics,
            metrics_handle: MetricsHandle::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &WorldStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn radar(&self) -> &M {
        &self.radar
    }

    pub fn metrics_handle(&self) -> MetricsHandle {
        self.metrics_handle.clone()
    }

    /// Seconds between the two most recent frame updates.
    pub fn last_dt_seconds(&self) -> f32 {
        self.last_dt_seconds
    }

    pub fn has_node(&self, key: &NodeKey) -> bool {
        self.renderer.has_node(key)
    }

    pub fn report_damage(&mut self, id: &PlayerId, magnitude: u32) {
        self.network.emit(NetworkEvent::PlayerHasDamaged {
            id: id.clone(),
            val: magnitude,
        });
    }

    pub fn velocity(&self) -> Option<Vec2> {
        match self.store.local_player() {
            LocalPlayer::Present(player) => Some(player.velocity),
            LocalPlayer::Absent => None,
        }
    }

    pub fn systems(&self) -> Option<SystemsReadout> {
        match self.store.local_player() {
            LocalPlayer::Present(player) => Some(SystemsReadout {
                fuel: player.resources.fuel,
                health: player.health,
            }),
            LocalPlayer::Absent => None,
        }
    }

    pub fn resources(&self) -> Option<ResourceReadout> {
        match self.store.local_player() {
            LocalPlayer::Present(player) => Some(ResourceReadout {
                w: player.resources.w,
                scrap: player.resources.scrap,
                value: player.value,
            }),
            LocalPlayer::Absent => None,
        }
    }

    /// Plays the explosion on the local player's node. Returns whether the
    /// local player was present.
    pub fn explode_local_player(&mut self) -> bool {
        match self.store.local_player() {
            LocalPlayer::Present(player) => {
                let key = player.node.clone();
                self.renderer.explode(&key);
                info!(player_id = %self.store.local_player_id, "local_player_exploded");
                true
            }
            LocalPlayer::Absent => false,
        }
    }

    pub fn current_resource(&self) -> Option<&CurrentResource> {
        self.store.current_resource()
    }

    pub fn set_current_resource(&mut self, resource: Option<CurrentResource>) {
        self.store.current_resource = resource;
    }

    pub fn radar_interrupt(&self) -> bool {
        self.radar.interrupt()
    }

    pub fn set_radar_interrupt(&mut self, interrupt: bool) {
        self.radar.set_interrupt(interrupt);
    }

    pub fn radar_text(&self) -> String {
        self.radar.text()
    }

    pub fn set_radar_text(&mut self, text: &str) {
        self.radar.set_text(text);
    }

    pub(crate) fn set_anchor(&mut self, key: NodeKey) {
        self.renderer.set_anchor(&key);
        self.store.camera.anchored = true;
        self.store.camera.anchor = Some(key);
    }
}
