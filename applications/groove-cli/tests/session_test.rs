//! Session runner integration tests
//!
//! Uses tokio's paused clock so interval ticks complete instantly.

use groove_cli::{load_catalog, run, CliError, PlayOptions};
use groove_core::{
    CatalogFilter, CatalogQuery, JsonFilePreferences, PreferenceStore, Track, TrackId,
    SETTING_VOLUME,
};
use groove_playback::PlayerConfig;

// ===== Test Helpers =====

fn create_track(id: i64, title: &str, artist: &str, secs: f64) -> Track {
    Track::new(id, title, artist)
        .with_audio_url(format!("https://cdn/{id}.mp3"))
        .with_duration_sec(secs)
}

fn catalog() -> Vec<Track> {
    vec![
        create_track(1, "Alpha", "Ada", 2.0),
        create_track(2, "Bravo", "Ada", 1.0),
        create_track(3, "Charlie", "Bo", 3.0),
    ]
}

fn fast_config() -> PlayerConfig {
    PlayerConfig {
        tick_ms: 100,
        playback_rate: 5.0,
        ..Default::default()
    }
}

fn ids(played: &[TrackId]) -> Vec<i64> {
    played.iter().map(|id| id.get()).collect()
}

// ===== Sessions =====

#[tokio::test(start_paused = true)]
async fn test_plays_whole_view_in_order() {
    let report = run(&catalog(), PlayOptions::default(), &fast_config())
        .await
        .unwrap();

    assert_eq!(ids(&report.played), vec![1, 2, 3]);
    assert!(!report.final_status.is_playing);
    assert_eq!(report.final_status.duration_label, "0:03");
}

#[tokio::test(start_paused = true)]
async fn test_start_mid_view_plays_to_end() {
    let options = PlayOptions {
        start: Some(2),
        ..Default::default()
    };

    let report = run(&catalog(), options, &fast_config()).await.unwrap();
    assert_eq!(ids(&report.played), vec![2, 3]);
}

#[tokio::test(start_paused = true)]
async fn test_filtered_view_is_the_queue() {
    let options = PlayOptions {
        query: CatalogQuery {
            filter: Some(CatalogFilter::Artist("Ada".to_string())),
            ..Default::default()
        },
        ..Default::default()
    };

    let report = run(&catalog(), options, &fast_config()).await.unwrap();
    assert_eq!(ids(&report.played), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_repeat_one_stops_at_tick_limit() {
    let options = PlayOptions {
        repeat_one: true,
        max_ticks: Some(25),
        ..Default::default()
    };

    let report = run(&catalog(), options, &fast_config()).await.unwrap();
    assert_eq!(ids(&report.played), vec![1]);
    assert_eq!(report.ticks, 25);
    assert!(report.final_status.is_playing);
    assert!(report.final_status.repeat_one);
}

#[tokio::test(start_paused = true)]
async fn test_unplayable_track_ends_session() {
    let mut tracks = catalog();
    tracks[1].audio_url = String::new();

    let report = run(&tracks, PlayOptions::default(), &fast_config())
        .await
        .unwrap();

    assert_eq!(ids(&report.played), vec![1, 2]);
    assert!(!report.final_status.visible);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_start_track() {
    let options = PlayOptions {
        start: Some(99),
        ..Default::default()
    };

    let err = run(&catalog(), options, &fast_config()).await.unwrap_err();
    assert!(matches!(err, CliError::UnknownTrack(99)));
}

#[tokio::test(start_paused = true)]
async fn test_empty_view_is_an_error() {
    let options = PlayOptions {
        query: CatalogQuery {
            search: "nothing matches this".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = run(&catalog(), options, &fast_config()).await.unwrap_err();
    assert!(matches!(err, CliError::EmptyContext));
}

// ===== Files =====

#[tokio::test(start_paused = true)]
async fn test_volume_persisted_to_preferences_file() {
    let dir = tempfile::tempdir().unwrap();
    let prefs_path = dir.path().join("prefs.json");
    let config = PlayerConfig {
        preferences_path: Some(prefs_path.clone()),
        ..fast_config()
    };
    let options = PlayOptions {
        volume: Some(42.0),
        max_ticks: Some(1),
        ..Default::default()
    };

    let report = run(&catalog(), options, &config).await.unwrap();
    assert_eq!(report.final_status.volume, 42);

    let prefs = JsonFilePreferences::open(&prefs_path).unwrap();
    assert_eq!(prefs.get(SETTING_VOLUME).unwrap().as_deref(), Some("42"));

    // Next session starts from the stored volume
    let report = run(
        &catalog(),
        PlayOptions {
            max_ticks: Some(1),
            ..Default::default()
        },
        &config,
    )
    .await
    .unwrap();
    assert_eq!(report.final_status.volume, 42);
}

#[test]
fn test_load_catalog_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("songs.json");
    std::fs::write(&path, serde_json::to_string(&catalog()).unwrap()).unwrap();

    let tracks = load_catalog(&path).unwrap();
    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[2].duration_sec, Some(3.0));
}
