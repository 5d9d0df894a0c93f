use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::coords::{world_to_screen_x, Viewport};
use super::{PlayerId, ResourceBundle, Vec2, WorldObjectState};

const STATION_LABEL_COLOR: [u8; 4] = [0xee, 0xed, 0xab, 0xff];
const SHIP_LABEL_COLOR: [u8; 4] = [0xab, 0xee, 0xab, 0xff];
const PLAYER_LABEL_COLOR: [u8; 4] = [0xee, 0xab, 0xab, 0xff];
const TILT_BASE_RADIANS: f32 = -0.5;
const TILT_SPREAD_RADIANS: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Terrain,
    Players,
    Resources,
    NameTags,
}

impl Layer {
    pub const fn name(self) -> &'static str {
        match self {
            Layer::Terrain => "Terrain",
            Layer::Players => "Players",
            Layer::Resources => "Resources",
            Layer::NameTags => "NameTags",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn world_object(category: ObjectCategory, name: &str) -> Self {
        Self(format!("{}-{name}", category.node_prefix()))
    }

    pub fn name_tag(name: &str) -> Self {
        Self(format!("{}-{name}", Layer::NameTags.name()))
    }

    pub fn player(id: &PlayerId) -> Self {
        Self(format!("{}-{id}", Layer::Players.name()))
    }

    pub fn terrain(band: TerrainBand) -> Self {
        Self(format!("{}-{}", Layer::Terrain.name(), band.name()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainBand {
    Near,
    Far,
}

impl TerrainBand {
    pub const ALL: [TerrainBand; 2] = [TerrainBand::Near, TerrainBand::Far];

    pub const fn name(self) -> &'static str {
        match self {
            TerrainBand::Near => "near",
            TerrainBand::Far => "far",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation_radians: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteNode {
    pub key: NodeKey,
    pub category: ObjectCategory,
    pub object_id: String,
    pub name: String,
    /// Server x of the object, before screen conversion.
    pub world_x: f32,
    pub sprite: &'static str,
    pub animated: bool,
    pub position: Vec2,
    pub hitbox: Extent,
    pub size: Option<Extent>,
    pub scale: f32,
    pub rotation_radians: f32,
    pub z_index: i32,
    pub resources: ResourceBundle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerNode {
    pub key: NodeKey,
    pub id: PlayerId,
    pub display_name: String,
    pub transform: Transform,
    pub is_local: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelNode {
    pub key: NodeKey,
    pub color: [u8; 4],
    pub lines: Vec<String>,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainNode {
    pub key: NodeKey,
    pub band: TerrainBand,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Sprite(SpriteNode),
    Player(PlayerNode),
    Label(LabelNode),
    Terrain(TerrainNode),
}

impl Node {
    pub fn key(&self) -> &NodeKey {
        match self {
            Node::Sprite(node) => &node.key,
            Node::Player(node) => &node.key,
            Node::Label(node) => &node.key,
            Node::Terrain(node) => &node.key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectCategory {
    Stations,
    Ships,
    Wrecks,
}

impl ObjectCategory {
    pub const ALL: [ObjectCategory; 3] = [
        ObjectCategory::Stations,
        ObjectCategory::Ships,
        ObjectCategory::Wrecks,
    ];

    pub const fn node_prefix(self) -> &'static str {
        match self {
            ObjectCategory::Stations => "stations",
            ObjectCategory::Ships => "ships",
            ObjectCategory::Wrecks => "wrecks",
        }
    }

    pub fn style(self) -> &'static CategoryStyle {
        match self {
            ObjectCategory::Stations => &STATION_STYLE,
            ObjectCategory::Ships => &SHIP_STYLE,
            ObjectCategory::Wrecks => &WRECK_STYLE,
        }
    }
}

/// Fixed presentation parameters for one world-object category. Offsets are
/// relative to the screen x of the object and the sampled terrain height.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStyle {
    pub sprite: &'static str,
    pub animated: bool,
    pub node_offset: Vec2,
    pub hitbox: Extent,
    pub size: Option<Extent>,
    pub scale: f32,
    pub z_index: i32,
    pub tilted: bool,
    pub label_color: [u8; 4],
    pub label_offset: Vec2,
}

const STATION_STYLE: CategoryStyle = CategoryStyle {
    sprite: "misc/recharge_station",
    animated: true,
    node_offset: Vec2::new(-60.0, -60.0),
    hitbox: Extent { w: 60.0, h: 60.0 },
    size: None,
    scale: 3.0,
    z_index: 11,
    tilted: false,
    label_color: STATION_LABEL_COLOR,
    label_offset: Vec2::new(60.0, -110.0),
};

const SHIP_STYLE: CategoryStyle = CategoryStyle {
    sprite: "misc/ships",
    animated: true,
    node_offset: Vec2::new(-300.0, -300.0),
    hitbox: Extent { w: 300.0, h: 300.0 },
    size: Some(Extent { w: 100.0, h: 100.0 }),
    scale: 5.0,
    z_index: 10,
    tilted: true,
    label_color: SHIP_LABEL_COLOR,
    label_offset: Vec2::new(30.0, -180.0),
};

const WRECK_STYLE: CategoryStyle = CategoryStyle {
    sprite: "drone/drone_3",
    animated: false,
    node_offset: Vec2::new(0.0, -20.0),
    hitbox: Extent { w: 0.0, h: 20.0 },
    size: Some(Extent { w: 0.0, h: 0.0 }),
    scale: 5.0,
    z_index: 10,
    tilted: true,
    label_color: SHIP_LABEL_COLOR,
    label_offset: Vec2::new(30.0, -150.0),
};

/// Builds the render and label node for one world object given the terrain
/// height sampled at its x position.
pub(crate) fn world_object_nodes(
    category: ObjectCategory,
    object: &WorldObjectState,
    terrain_height: f32,
    viewport: Viewport,
) -> (SpriteNode, LabelNode) {
    let style = category.style();
    let screen_x = world_to_screen_x(object.x_position, viewport);
    let rotation_radians = if style.tilted {
        tilt_for(&object.id)
    } else {
        0.0
    };

    let sprite = SpriteNode {
        key: NodeKey::world_object(category, &object.name),
        category,
        object_id: object.id.clone(),
        name: object.name.clone(),
        world_x: object.x_position,
        sprite: style.sprite,
        animated: style.animated,
        position: Vec2 {
            x: screen_x + style.node_offset.x,
            y: terrain_height + style.node_offset.y,
        },
        hitbox: style.hitbox,
        size: style.size,
        scale: style.scale,
        rotation_radians,
        z_index: style.z_index,
        resources: object.resources,
    };
    let label = LabelNode {
        key: NodeKey::name_tag(&object.name),
        color: style.label_color,
        lines: world_object_label_lines(object),
        position: Vec2 {
            x: screen_x + style.label_offset.x,
            y: terrain_height + style.label_offset.y,
        },
    };
    (sprite, label)
}

pub(crate) fn player_label(id: &PlayerId, name: &str, value: f32, position: Vec2) -> LabelNode {
    LabelNode {
        key: NodeKey::name_tag(id.as_str()),
        color: PLAYER_LABEL_COLOR,
        lines: player_label_lines(name, value),
        position,
    }
}

pub fn world_object_label_lines(object: &WorldObjectState) -> Vec<String> {
    vec![
        object.name.clone(),
        "{".to_string(),
        format!("Fuel: {}", object.resources.fuel),
        format!("W: {}", object.resources.w),
        "}".to_string(),
    ]
}

pub fn player_label_lines(name: &str, value: f32) -> Vec<String> {
    vec![
        name.to_string(),
        "{".to_string(),
        format!("Value: {value}"),
        "}".to_string(),
    ]
}

/// Tilt in `[-0.5, -0.3)` radians, stable for a given object id so that a
/// re-pushed ship does not visibly jump.
fn tilt_for(object_id: &str) -> f32 {
    let mut hasher = DefaultHasher::new();
    object_id.hash(&mut hasher);
    let jitter = (hasher.finish() % 10_000) as f32 / 10_000.0;
    TILT_BASE_RADIANS + jitter * TILT_SPREAD_RADIANS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, x: f32) -> WorldObjectState {
        WorldObjectState {
            id: format!("id-{name}"),
            name: name.to_string(),
            x_position: x,
            resources: ResourceBundle {
                fuel: 40.0,
                w: 7.0,
                scrap: 0.0,
            },
            player_name: None,
        }
    }

    #[test]
    fn keys_use_category_and_layer_prefixes() {
        assert_eq!(
            NodeKey::world_object(ObjectCategory::Stations, "A").as_str(),
            "stations-A"
        );
        assert_eq!(NodeKey::name_tag("A").as_str(), "NameTags-A");
        assert_eq!(NodeKey::player(&PlayerId::from("me")).as_str(), "Players-me");
        assert_eq!(NodeKey::terrain(TerrainBand::Far).as_str(), "Terrain-far");
    }

    #[test]
    fn station_nodes_follow_style_offsets() {
        let viewport = Viewport {
            width: 800,
            height: 600,
        };
        let (sprite, label) =
            world_object_nodes(ObjectCategory::Stations, &station("A", 100.0), 300.0, viewport);

        assert_eq!(sprite.position, Vec2::new(440.0, 240.0));
        assert_eq!(sprite.rotation_radians, 0.0);
        assert_eq!(sprite.z_index, 11);
        assert_eq!(label.position, Vec2::new(560.0, 190.0));
        assert_eq!(label.lines, vec!["A", "{", "Fuel: 40", "W: 7", "}"]);
    }

    #[test]
    fn ship_tilt_is_stable_and_in_range() {
        let viewport = Viewport::default();
        let ship = station("S", 0.0);
        let (first, _) = world_object_nodes(ObjectCategory::Ships, &ship, 0.0, viewport);
        let (second, _) = world_object_nodes(ObjectCategory::Ships, &ship, 0.0, viewport);

        assert_eq!(first.rotation_radians, second.rotation_radians);
        assert!(first.rotation_radians >= -0.5 && first.rotation_radians < -0.3);
    }

    #[test]
    fn player_label_shows_value() {
        assert_eq!(
            player_label_lines("Xeno", 12.0),
            vec!["Xeno", "{", "Value: 12", "}"]
        );
    }
}
