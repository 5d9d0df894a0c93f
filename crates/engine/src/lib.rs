pub mod app;

pub use app::{
    advance_camera, name_tag_anchor, player_label_lines, screen_to_world_x,
    world_object_label_lines, world_to_screen, world_to_screen_x, CameraState, CategoryStyle,
    Collaborators, ControlVerb, CurrentResource, Engine, EngineConfig, Extent, FrameClock,
    FrameMetricsSnapshot, FrameReport, LabelNode, Layer, LocalPlayer, MetricsHandle,
    MovementState, NetworkChannel, NetworkEvent, Node, NodeKey, ObjectCategory,
    PlayerCapabilities, PlayerEntity, PlayerId, PlayerMap, PlayerNode, PlayerState, Radar,
    ReconcileError, RenderBackend, RenderPass, ResourceBundle, ResourceCapabilities,
    ResourceReadout, ServerEvent, SpriteNode, SystemsReadout, TerrainBand, TerrainNode,
    TerrainSampler, TerrainSegment, Transform, Vec2, Viewport, WorldObjectState, WorldStore,
    DEFAULT_LOCAL_PLAYER_ID, NAME_TAG_RISE_PX, SELF_DESTRUCT_DAMAGE,
};
