use tracing::{debug, info, warn};

use super::engine::Engine;
use super::nodes::world_object_nodes;
use super::store::LocalPlayer;
use super::{
    Layer, NetworkChannel, Node, NodeKey, ObjectCategory, Radar, RenderBackend, TerrainSampler,
    WorldObjectState,
};

impl<R, N, M, T> Engine<R, N, M, T>
where
    R: RenderBackend,
    N: NetworkChannel,
    M: Radar,
    T: TerrainSampler,
{
    /// Replaces one world-object collection with the latest server push.
    ///
    /// Every node pair of the previous push is removed before any node of the
    /// new push is installed, so a key that appears in both pushes is never
    /// doubled. A name repeated within one push keeps only its last entry.
    /// Radar dots are skipped when the local player has not joined.
    pub fn replace_collection(&mut self, category: ObjectCategory, objects: Vec<WorldObjectState>) {
        let objects = keep_last_per_name(category, objects);
        let previous = std::mem::replace(self.store.collection_mut(category), objects);
        for object in &previous {
            self.renderer
                .remove_node(&NodeKey::world_object(category, &object.name));
            self.renderer.remove_node(&NodeKey::name_tag(&object.name));
        }

        let offset = self.store.camera.offset;
        let viewport = self.config.viewport;
        for object in self.store.collection(category) {
            let height = self.terrain.sample(object.x_position, offset);
            let (sprite, label) = world_object_nodes(category, object, height, viewport);
            self.renderer.add_node(Layer::Resources, Node::Sprite(sprite));
            self.renderer.add_node(Layer::NameTags, Node::Label(label));
        }

        let current = self.store.collection(category);
        match category {
            ObjectCategory::Stations => self.radar.set_recharge_stations(current),
            ObjectCategory::Ships | ObjectCategory::Wrecks => self.radar.set_ships(current),
        }

        match self.store.local_player() {
            LocalPlayer::Present(player) => {
                for object in current {
                    self.radar.add_dot(object.x_position, player.position.x);
                }
            }
            LocalPlayer::Absent => {
                debug!(
                    category = category.node_prefix(),
                    "radar_dots_skipped_without_local_player"
                );
            }
        }

        info!(
            category = category.node_prefix(),
            previous_count = previous.len(),
            count = current.len(),
            "collection_replaced"
        );
    }
}

fn keep_last_per_name(
    category: ObjectCategory,
    objects: Vec<WorldObjectState>,
) -> Vec<WorldObjectState> {
    let mut kept: Vec<WorldObjectState> = Vec::with_capacity(objects.len());
    for object in objects {
        if let Some(index) = kept.iter().position(|existing| existing.name == object.name) {
            warn!(
                category = category.node_prefix(),
                name = object.name.as_str(),
                "collection_duplicate_name"
            );
            kept.remove(index);
        }
        kept.push(object);
    }
    kept
}
