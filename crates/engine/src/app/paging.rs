use tracing::trace;

use super::engine::Engine;
use super::store::{CameraState, LocalPlayer, TerrainSegment};
use super::{NetworkChannel, Radar, RenderBackend, TerrainSampler};

/// Follows the local player's x with the camera and marks every terrain
/// segment dirty when, and only when, the offset changes. Returns whether
/// terrain was marked dirty.
pub fn advance_camera(
    camera: &mut CameraState,
    terrain: &mut [TerrainSegment],
    local_player_x: Option<f32>,
) -> bool {
    if !camera.anchored {
        return false;
    }
    let Some(x) = local_player_x else {
        return false;
    };

    camera.offset = x;
    if camera.previous_offset == Some(x) {
        return false;
    }

    for segment in terrain.iter_mut() {
        segment.needs_update = true;
    }
    camera.previous_offset = Some(x);
    true
}

impl<R, N, M, T> Engine<R, N, M, T>
where
    R: RenderBackend,
    N: NetworkChannel,
    M: Radar,
    T: TerrainSampler,
{
    pub(crate) fn page_camera(&mut self) -> bool {
        let local_player_x = match self.store.local_player() {
            LocalPlayer::Present(player) => Some(player.position.x),
            LocalPlayer::Absent => None,
        };
        let marked = advance_camera(
            &mut self.store.camera,
            &mut self.store.terrain,
            local_player_x,
        );
        if marked {
            trace!(offset = self.store.camera.offset, "terrain_marked_dirty");
        }
        marked
    }
}
