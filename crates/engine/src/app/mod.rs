mod collaborators;
mod commands;
mod coords;
mod engine;
mod loop_runner;
mod metrics;
mod nodes;
mod paging;
mod players;
mod protocol;
mod store;
mod sync;
#[cfg(test)]
mod test_support;
mod types;

pub use collaborators::{
    NetworkChannel, NetworkEvent, PlayerCapabilities, Radar, RenderBackend, RenderPass,
    ResourceCapabilities, TerrainSampler,
};
pub use commands::{ControlVerb, SELF_DESTRUCT_DAMAGE};
pub use coords::{
    name_tag_anchor, screen_to_world_x, world_to_screen, world_to_screen_x, Viewport,
    NAME_TAG_RISE_PX,
};
pub use engine::{Collaborators, Engine, EngineConfig, DEFAULT_LOCAL_PLAYER_ID};
pub use loop_runner::{FrameClock, FrameReport};
pub use metrics::{FrameMetricsSnapshot, MetricsHandle};
pub use nodes::{
    player_label_lines, world_object_label_lines, CategoryStyle, Extent, LabelNode, Layer, Node,
    NodeKey, ObjectCategory, PlayerNode, SpriteNode, TerrainBand, TerrainNode, Transform,
};
pub use paging::advance_camera;
pub use players::ReconcileError;
pub use protocol::ServerEvent;
pub use store::{CameraState, LocalPlayer, PlayerMap, TerrainSegment, WorldStore};
pub use types::{
    CurrentResource, MovementState, PlayerEntity, PlayerId, PlayerState, ResourceBundle,
    ResourceReadout, SystemsReadout, Vec2, WorldObjectState,
};
