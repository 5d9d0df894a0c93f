use tracing::{debug, info};

use super::engine::Engine;
use super::store::LocalPlayer;
use super::{Layer, NetworkChannel, NetworkEvent, Radar, RenderBackend, TerrainSampler};

/// Damage reported for the local player on self-destruct. Exceeds any
/// health value the server hands out.
pub const SELF_DESTRUCT_DAMAGE: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlVerb {
    ToggleTags,
    Fire,
    SelfDestruct,
}

static VERB_TABLE: [(&str, ControlVerb, &str); 3] = [
    (
        "TOGGLE-TAGS",
        ControlVerb::ToggleTags,
        "Show or hide every name tag",
    ),
    ("FIRE", ControlVerb::Fire, "Fire the local player's weapon"),
    (
        "SELF-DESTRUCT",
        ControlVerb::SelfDestruct,
        "Report lethal damage for the local player",
    ),
];

impl ControlVerb {
    pub const ALL: [ControlVerb; 3] = [
        ControlVerb::ToggleTags,
        ControlVerb::Fire,
        ControlVerb::SelfDestruct,
    ];

    /// Exact, case-sensitive lookup of a verb string.
    pub fn parse(raw: &str) -> Option<Self> {
        VERB_TABLE
            .iter()
            .find(|(name, _, _)| *name == raw)
            .map(|(_, verb, _)| *verb)
    }

    pub fn as_str(self) -> &'static str {
        self.entry().0
    }

    pub fn help(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (&'static str, ControlVerb, &'static str) {
        match self {
            ControlVerb::ToggleTags => &VERB_TABLE[0],
            ControlVerb::Fire => &VERB_TABLE[1],
            ControlVerb::SelfDestruct => &VERB_TABLE[2],
        }
    }
}

impl<R, N, M, T> Engine<R, N, M, T>
where
    R: RenderBackend,
    N: NetworkChannel,
    M: Radar,
    T: TerrainSampler,
{
    /// Runs a verb from input or UI. Returns `Some(true)` for a recognised
    /// verb and `None` for anything else.
    pub fn control(&mut self, verb: &str) -> Option<bool> {
        let Some(parsed) = ControlVerb::parse(verb) else {
            debug!(verb, "control_verb_ignored");
            return None;
        };
        Some(self.dispatch(parsed))
    }

    pub fn dispatch(&mut self, verb: ControlVerb) -> bool {
        match verb {
            ControlVerb::ToggleTags => {
                if self.renderer.layer_hidden(Layer::NameTags) {
                    self.renderer.show_layer(Layer::NameTags);
                } else {
                    self.renderer.hide_layer(Layer::NameTags);
                }
                info!(
                    hidden = self.renderer.layer_hidden(Layer::NameTags),
                    "name_tags_toggled"
                );
            }
            ControlVerb::Fire => {
                if let LocalPlayer::Present(player) = self.store.local_player() {
                    self.renderer.play_fire(&player.node);
                }
                self.network.emit(NetworkEvent::PlayerHasShot);
            }
            ControlVerb::SelfDestruct => {
                let id = self.store.local_player_id.clone();
                info!(player_id = %id, "self_destruct_requested");
                self.report_damage(&id, SELF_DESTRUCT_DAMAGE);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{local_player, test_engine};
    use crate::app::{NodeKey, PlayerId};

    #[test]
    fn parse_accepts_exact_verbs_only() {
        for verb in ControlVerb::ALL {
            assert_eq!(ControlVerb::parse(verb.as_str()), Some(verb));
            assert!(!verb.help().is_empty());
        }
        for raw in ["", "fire", "Fire ", "TOGGLE_TAGS", "EJECT"] {
            assert_eq!(ControlVerb::parse(raw), None, "raw={raw}");
        }
    }

    #[test]
    fn unknown_verb_returns_none_without_effects() {
        let mut engine = test_engine();
        engine.renderer_mut().ops.clear();

        assert_eq!(engine.control("WARP"), None);
        assert!(engine.renderer().ops.is_empty());
        assert!(engine.network().sent.is_empty());
    }

    #[test]
    fn toggle_tags_flips_layer_visibility() {
        let mut engine = test_engine();

        assert_eq!(engine.control("TOGGLE-TAGS"), Some(true));
        assert!(engine.renderer().layer_hidden(Layer::NameTags));
        assert_eq!(engine.control("TOGGLE-TAGS"), Some(true));
        assert!(!engine.renderer().layer_hidden(Layer::NameTags));
        assert!(engine.network().sent.is_empty());
    }

    #[test]
    fn fire_without_local_player_still_emits_intent() {
        let mut engine = test_engine();

        assert_eq!(engine.control("FIRE"), Some(true));
        assert_eq!(engine.network().sent, vec![NetworkEvent::PlayerHasShot]);
        assert_eq!(engine.renderer().total_fires(), 0);
    }

    #[test]
    fn fire_with_local_player_plays_once_and_emits() {
        let mut engine = test_engine();
        engine.apply_roster(vec![local_player(0.0)]).expect("roster");

        assert_eq!(engine.control("FIRE"), Some(true));
        assert_eq!(
            engine
                .renderer()
                .fire_count(&NodeKey::player(&PlayerId::from("me"))),
            1
        );
        assert_eq!(engine.network().sent, vec![NetworkEvent::PlayerHasShot]);
    }

    #[test]
    fn self_destruct_reports_lethal_damage_for_local_player() {
        let mut engine = test_engine();

        assert_eq!(engine.control("SELF-DESTRUCT"), Some(true));
        match engine.network().sent.as_slice() {
            [NetworkEvent::PlayerHasDamaged { id, val }] => {
                assert_eq!(id, &PlayerId::from("me"));
                assert!(*val >= SELF_DESTRUCT_DAMAGE);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}
