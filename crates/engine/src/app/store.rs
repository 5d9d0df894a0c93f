use std::collections::HashMap;

use super::{
    CurrentResource, NodeKey, ObjectCategory, PlayerEntity, PlayerId, PlayerState, TerrainBand,
    WorldObjectState,
};

pub type PlayerMap = HashMap<PlayerId, PlayerEntity>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraState {
    pub offset: f32,
    /// `None` until the first anchored frame records an offset.
    pub previous_offset: Option<f32>,
    pub anchored: bool,
    pub anchor: Option<NodeKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainSegment {
    pub band: TerrainBand,
    pub needs_update: bool,
}

impl TerrainSegment {
    fn new(band: TerrainBand) -> Self {
        Self {
            band,
            needs_update: true,
        }
    }
}

/// The locally-controlled player, which may not have joined yet.
#[derive(Debug, Clone, Copy)]
pub enum LocalPlayer<'a> {
    Present(&'a PlayerEntity),
    Absent,
}

/// Local mirror of every server-authoritative collection plus camera and
/// terrain state. Holds no validation; the invariants are maintained by the
/// engine operations that write here.
#[derive(Debug, Clone)]
pub struct WorldStore {
    pub(crate) local_player_id: PlayerId,
    pub(crate) players: PlayerMap,
    pub(crate) radar_players: Vec<PlayerState>,
    pub(crate) stations: Vec<WorldObjectState>,
    pub(crate) ships: Vec<WorldObjectState>,
    pub(crate) wrecks: Vec<WorldObjectState>,
    pub(crate) terrain: [TerrainSegment; 2],
    pub(crate) camera: CameraState,
    pub(crate) current_resource: Option<CurrentResource>,
}

impl WorldStore {
    pub fn new(local_player_id: PlayerId) -> Self {
        Self {
            local_player_id,
            players: PlayerMap::new(),
            radar_players: Vec::new(),
            stations: Vec::new(),
            ships: Vec::new(),
            wrecks: Vec::new(),
            terrain: TerrainBand::ALL.map(TerrainSegment::new),
            camera: CameraState::default(),
            current_resource: None,
        }
    }

    pub fn local_player_id(&self) -> &PlayerId {
        &self.local_player_id
    }

    pub fn players(&self) -> &PlayerMap {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&PlayerEntity> {
        self.players.get(id)
    }

    pub fn local_player(&self) -> LocalPlayer<'_> {
        match self.players.get(&self.local_player_id) {
            Some(player) => LocalPlayer::Present(player),
            None => LocalPlayer::Absent,
        }
    }

    pub fn radar_players(&self) -> &[PlayerState] {
        &self.radar_players
    }

    pub fn collection(&self, category: ObjectCategory) -> &[WorldObjectState] {
        match category {
            ObjectCategory::Stations => &self.stations,
            ObjectCategory::Ships => &self.ships,
            ObjectCategory::Wrecks => &self.wrecks,
        }
    }

    pub(crate) fn collection_mut(
        &mut self,
        category: ObjectCategory,
    ) -> &mut Vec<WorldObjectState> {
        match category {
            ObjectCategory::Stations => &mut self.stations,
            ObjectCategory::Ships => &mut self.ships,
            ObjectCategory::Wrecks => &mut self.wrecks,
        }
    }

    pub fn terrain(&self) -> &[TerrainSegment] {
        &self.terrain
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn current_resource(&self) -> Option<&CurrentResource> {
        self.current_resource.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_starts_empty_with_dirty_terrain() {
        let store = WorldStore::new(PlayerId::from("me"));

        assert!(store.players().is_empty());
        assert!(matches!(store.local_player(), LocalPlayer::Absent));
        for category in ObjectCategory::ALL {
            assert!(store.collection(category).is_empty());
        }
        assert_eq!(store.terrain().len(), 2);
        assert!(store.terrain().iter().all(|segment| segment.needs_update));
        assert!(!store.camera().anchored);
        assert_eq!(store.camera().previous_offset, None);
    }
}
