//! Property-based tests for player state and transport
//!
//! Uses proptest to verify invariants across many random inputs.

use groove_core::{MemoryPreferences, Track};
use groove_playback::{MediaElement, PlayerConfig, PlayerState, SimulatedElement, TransportEngine};
use proptest::prelude::*;

// ===== Helpers =====

fn create_track(id: i64) -> Track {
    Track::new(id, format!("Track {id}"), "Artist").with_audio_url(format!("https://cdn/{id}.mp3"))
}

/// Queues of distinct track ids
fn arbitrary_queue() -> impl Strategy<Value = Vec<Track>> {
    prop::collection::btree_set(0i64..500, 1..30)
        .prop_map(|ids| ids.into_iter().map(create_track).collect())
        .prop_shuffle()
}

fn queue_ids(tracks: &[Track]) -> Vec<i64> {
    tracks.iter().map(|t| t.id.get()).collect()
}

#[derive(Debug, Clone, Copy)]
enum Nav {
    Next,
    Prev,
}

fn arbitrary_nav() -> impl Strategy<Value = Vec<Nav>> {
    prop::collection::vec(prop_oneof![Just(Nav::Next), Just(Nav::Prev)], 0..60)
}

// ===== Property Tests =====

proptest! {
    /// Property: a context containing the track is adopted unchanged
    #[test]
    fn play_now_member_keeps_context(
        queue in arbitrary_queue(),
        pick in any::<prop::sample::Index>(),
    ) {
        let track = queue[pick.index(queue.len())].clone();
        let mut state = PlayerState::new();

        state.play_now(track.clone(), Some(queue.clone()));

        prop_assert_eq!(state.current_track(), Some(&track));
        prop_assert_eq!(queue_ids(state.queue()), queue_ids(&queue));
    }

    /// Property: a context without the track gets it prepended
    #[test]
    fn play_now_outsider_is_prepended(queue in arbitrary_queue()) {
        let outsider = create_track(10_000);
        let mut state = PlayerState::new();

        state.play_now(outsider.clone(), Some(queue.clone()));

        let mut expected = vec![10_000];
        expected.extend(queue_ids(&queue));
        prop_assert_eq!(queue_ids(state.queue()), expected);
        prop_assert_eq!(state.current_track(), Some(&outsider));
    }

    /// Property: playing without a context never rewrites a non-empty queue
    #[test]
    fn play_now_without_context_keeps_queue(
        queue in arbitrary_queue(),
        id in 0i64..1000,
    ) {
        let mut state = PlayerState::new();
        state.play_now(queue[0].clone(), Some(queue.clone()));

        state.play_now(create_track(id), None);

        prop_assert_eq!(queue_ids(state.queue()), queue_ids(&queue));
        prop_assert_eq!(state.current_track().map(|t| t.id.get()), Some(id));
    }

    /// Property: navigation stays inside the queue and moves one step at a time
    #[test]
    fn navigation_stays_in_bounds(
        queue in arbitrary_queue(),
        moves in arbitrary_nav(),
    ) {
        let mut state = PlayerState::new();
        state.play_now(queue[0].clone(), Some(queue.clone()));

        for nav in moves {
            let before = state.index_of_current().unwrap();
            let moved = match nav {
                Nav::Next => state.play_next(),
                Nav::Prev => state.play_prev(),
            };
            let after = state.index_of_current().unwrap();

            match (nav, moved) {
                (Nav::Next, true) => prop_assert_eq!(after, before + 1),
                (Nav::Prev, true) => prop_assert_eq!(after + 1, before),
                (Nav::Next, false) => prop_assert_eq!(before, queue.len() - 1),
                (Nav::Prev, false) => prop_assert_eq!(before, 0),
            }
            prop_assert_eq!(state.queue().len(), queue.len());
        }
    }

    /// Property: status stays sane under arbitrary seek and volume input
    #[test]
    fn transport_inputs_keep_status_sane(
        seeks in prop::collection::vec(prop_oneof![
            any::<f64>(),
            Just(f64::NAN),
            Just(f64::INFINITY),
            -1000.0f64..1000.0,
        ], 0..20),
        volumes in prop::collection::vec(prop_oneof![
            any::<f64>(),
            Just(f64::NAN),
            -50.0f64..150.0,
        ], 0..20),
    ) {
        let mut state = PlayerState::new();
        let mut engine = TransportEngine::new(
            SimulatedElement::new(),
            MemoryPreferences::new(),
            &mut state,
            &PlayerConfig::default(),
        )
        .unwrap();
        state.play_now(create_track(1), None);
        engine.pump(&mut state);

        for secs in seeks {
            let before = engine.status().current_time;
            engine.seek(secs);
            if secs.is_finite() {
                prop_assert_eq!(engine.status().current_time, secs.max(0.0));
            } else {
                prop_assert_eq!(engine.status().current_time, before);
            }
            prop_assert!(engine.status().current_time >= 0.0);
        }

        for value in volumes {
            let before = engine.status().volume;
            engine.set_volume(value);
            let volume = engine.status().volume;
            prop_assert!(volume <= 100);
            if !value.is_finite() {
                prop_assert_eq!(volume, before);
            }
            prop_assert!((0.0..=1.0).contains(&engine.element().volume()));
        }
    }

    /// Property: mute then unmute returns to the level it started from
    #[test]
    fn mute_round_trip(level in 1u8..=100) {
        let mut state = PlayerState::new();
        let mut engine = TransportEngine::new(
            SimulatedElement::new(),
            MemoryPreferences::new(),
            &mut state,
            &PlayerConfig::default(),
        )
        .unwrap();

        engine.set_volume(f64::from(level));
        engine.toggle_mute();
        prop_assert_eq!(engine.status().volume, 0);
        engine.toggle_mute();
        prop_assert_eq!(engine.status().volume, level);
    }
}
