use std::time::{Duration, Instant};

use tracing::trace;

use super::collaborators::{PlayerHooks, ResourceHooks};
use super::engine::Engine;
use super::metrics::FrameMetricsSnapshot;
use super::{NetworkChannel, Radar, RenderBackend, RenderPass, TerrainSampler};

/// Monotonic frame clock. Elapsed time is saturating, so a host that hands
/// in an earlier instant gets a zero delta instead of a negative one.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self { last: now }
    }

    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);
        if now > self.last {
            self.last = now;
        }
        elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// What one frame-loop invocation did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub dt_seconds: f32,
    pub offset: f32,
    pub terrain_redraws: u32,
    /// Set once per metrics interval.
    pub metrics: Option<FrameMetricsSnapshot>,
}

impl<R, N, M, T> Engine<R, N, M, T>
where
    R: RenderBackend,
    N: NetworkChannel,
    M: Radar,
    T: TerrainSampler,
{
    /// Runs one frame. Called by the host once per displayed frame; the
    /// engine does no scheduling of its own.
    pub fn update(&mut self) -> FrameReport {
        self.update_at(Instant::now())
    }

    pub fn update_at(&mut self, now: Instant) -> FrameReport {
        let frame_dt = self.clock.tick_at(now);
        let dt_seconds = frame_dt.as_secs_f32();
        self.last_dt_seconds = dt_seconds;

        self.page_camera();

        let offset = self.store.camera.offset;
        let mut terrain_redraws = 0;
        for segment in self.store.terrain.iter_mut() {
            if !segment.needs_update {
                continue;
            }
            self.renderer.draw_terrain(segment.band, offset);
            segment.needs_update = false;
            terrain_redraws += 1;
        }

        let mut players = PlayerHooks {
            players: &self.store.players,
            local_player_id: &self.store.local_player_id,
            network: &mut self.network,
        };
        let mut resources = ResourceHooks {
            current_resource: &mut self.store.current_resource,
            radar: &mut self.radar,
        };
        self.renderer.render(
            RenderPass { offset, dt_seconds },
            &mut players,
            &mut resources,
        );

        self.metrics.record_frame(frame_dt, terrain_redraws);
        let metrics = self.metrics.maybe_snapshot(now);
        if let Some(snapshot) = metrics {
            self.metrics_handle.publish(snapshot);
        }

        trace!(dt_seconds, offset, terrain_redraws, "frame_rendered");
        FrameReport {
            dt_seconds,
            offset,
            terrain_redraws,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::app::test_support::{local_player, remote_player, test_engine, world_object};
    use crate::app::{
        CurrentResource, NetworkEvent, ObjectCategory, PlayerId, ResourceBundle, TerrainBand,
    };

    #[test]
    fn clock_never_goes_backwards() {
        let base = Instant::now();
        let mut clock = FrameClock::starting_at(base);

        assert_eq!(
            clock.tick_at(base + Duration::from_millis(16)),
            Duration::from_millis(16)
        );
        assert_eq!(clock.tick_at(base), Duration::ZERO);
        assert_eq!(
            clock.tick_at(base + Duration::from_millis(20)),
            Duration::from_millis(4)
        );
    }

    #[test]
    fn update_records_elapsed_seconds() {
        let mut engine = test_engine();
        let base = Instant::now();
        engine.update_at(base);

        let report = engine.update_at(base + Duration::from_millis(250));

        assert!((report.dt_seconds - 0.25).abs() < 1e-6);
        assert_eq!(engine.last_dt_seconds(), report.dt_seconds);
    }

    #[test]
    fn earlier_instant_yields_zero_delta() {
        let mut engine = test_engine();
        let base = Instant::now();
        engine.update_at(base + Duration::from_secs(1));

        let report = engine.update_at(base);

        assert_eq!(report.dt_seconds, 0.0);
    }

    #[test]
    fn terrain_draws_once_while_player_is_still() {
        let mut engine = test_engine();
        engine.apply_roster(vec![local_player(40.0)]).expect("roster");
        let base = Instant::now();

        let redraws: u32 = (0..10)
            .map(|frame| {
                engine
                    .update_at(base + Duration::from_millis(16 * frame))
                    .terrain_redraws
            })
            .sum();

        assert_eq!(redraws, 2);
        assert_eq!(
            engine.renderer().terrain_draws,
            vec![(TerrainBand::Near, 40.0), (TerrainBand::Far, 40.0)]
        );
        assert!(engine.store().terrain().iter().all(|s| !s.needs_update));
    }

    #[test]
    fn movement_redraws_terrain_at_new_offset() {
        let mut engine = test_engine();
        engine.apply_roster(vec![local_player(0.0)]).expect("roster");
        let base = Instant::now();
        engine.update_at(base);

        engine.apply_delta(local_player(64.0));
        let report = engine.update_at(base + Duration::from_millis(16));

        assert_eq!(report.offset, 64.0);
        assert_eq!(report.terrain_redraws, 2);
        assert_eq!(
            engine.renderer().terrain_draws.last(),
            Some(&(TerrainBand::Far, 64.0))
        );
    }

    #[test]
    fn initial_dirty_terrain_draws_before_anyone_joins() {
        let mut engine = test_engine();

        let first = engine.update();
        let second = engine.update();

        assert_eq!(first.terrain_redraws, 2);
        assert_eq!(first.offset, 0.0);
        assert_eq!(second.terrain_redraws, 0);
    }

    #[test]
    fn every_frame_requests_one_render_pass_at_offset() {
        let mut engine = test_engine();
        engine.apply_roster(vec![local_player(12.0)]).expect("roster");

        engine.update();
        engine.update();

        let passes = &engine.renderer().render_passes;
        assert_eq!(passes.len(), 2);
        assert!(passes.iter().all(|pass| pass.offset == 12.0));
    }

    #[test]
    fn render_capabilities_observe_live_state() {
        let mut engine = test_engine();
        engine
            .apply_roster(vec![local_player(0.0), remote_player("x", 5.0)])
            .expect("roster");
        engine.replace_collection(ObjectCategory::Stations, vec![world_object("A", 0.0)]);
        let docked = CurrentResource {
            category: ObjectCategory::Stations,
            id: "A-id".to_string(),
            name: "A".to_string(),
            resources: ResourceBundle::default(),
        };
        engine.renderer_mut().damage_on_render = Some((PlayerId::from("x"), 7));
        engine.renderer_mut().dock_on_render = Some(docked.clone());
        engine.renderer_mut().radar_text_on_render = Some("Docked at A".to_string());

        engine.update();

        assert_eq!(engine.renderer().players_seen, vec![2]);
        assert_eq!(
            engine.network().sent,
            vec![NetworkEvent::PlayerHasDamaged {
                id: PlayerId::from("x"),
                val: 7
            }]
        );
        assert_eq!(engine.current_resource(), Some(&docked));
        assert_eq!(engine.radar_text(), "Docked at A");
    }

    #[test]
    fn metrics_publish_after_interval() {
        let mut engine = test_engine();
        let handle = engine.metrics_handle();
        let far_future = Instant::now() + Duration::from_secs(5);

        let report = engine.update_at(far_future);

        let snapshot = report.metrics.expect("snapshot after interval");
        assert_eq!(snapshot.terrain_redraws, 2);
        assert_eq!(handle.snapshot(), snapshot);
    }
}
