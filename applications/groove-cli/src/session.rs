/// Headless playback sessions over a simulated element
use crate::error::{CliError, Result};
use groove_core::{
    CatalogProvider, CatalogQuery, JsonCatalog, JsonFilePreferences, MemoryPreferences,
    PreferenceStore, Track, TrackId,
};
use groove_playback::{
    format_time, PlayerConfig, PlayerEvent, PlayerState, SimulatedElement, TransportEngine,
    TransportSnapshot,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What to play and how
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// Builds the play context from the catalog
    pub query: CatalogQuery,
    /// Track to start with (default: first in the context)
    pub start: Option<i64>,
    /// Loop the starting track
    pub repeat_one: bool,
    /// Volume to apply before starting (0-100)
    pub volume: Option<f64>,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
}

/// Outcome of a finished session
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Tracks that became current, in order
    pub played: Vec<TrackId>,
    /// Clock ticks simulated
    pub ticks: u64,
    /// Transport state when the session ended
    pub final_status: TransportSnapshot,
}

/// Read every track from a JSON catalog file
pub fn load_catalog(path: &Path) -> Result<Vec<Track>> {
    let tracks = JsonCatalog::new(path).tracks()?;
    info!(path = %path.display(), tracks = tracks.len(), "Loaded catalog");
    Ok(tracks)
}

/// Preference store for the session
///
/// File-backed when `preferences_path` is configured, volatile otherwise.
pub fn open_preferences(config: &PlayerConfig) -> Result<Box<dyn PreferenceStore>> {
    match &config.preferences_path {
        Some(path) => Ok(Box::new(JsonFilePreferences::open(path)?)),
        None => Ok(Box::new(MemoryPreferences::new())),
    }
}

/// Simulated element that knows the length of every track in the context
pub fn simulated_element(context: &[Track]) -> SimulatedElement {
    context.iter().fold(SimulatedElement::new(), |element, track| {
        match (track.playable_source(), track.duration()) {
            (Some(src), Some(length)) => element.with_duration(src, length.as_secs_f64()),
            _ => element,
        }
    })
}

/// Play the query's context until the queue finishes or `max_ticks` is hit
pub async fn run(
    tracks: &[Track],
    options: PlayOptions,
    config: &PlayerConfig,
) -> Result<SessionReport> {
    let context = options.query.apply(tracks);
    if context.is_empty() {
        return Err(CliError::EmptyContext);
    }

    let start = match options.start {
        Some(id) => context
            .iter()
            .find(|t| t.id == TrackId::new(id))
            .cloned()
            .ok_or(CliError::UnknownTrack(id))?,
        None => context[0].clone(),
    };

    let mut state = PlayerState::new();
    let changes = state.subscribe();
    let mut engine = TransportEngine::new(
        simulated_element(&context),
        open_preferences(config)?,
        &mut state,
        config,
    )?;

    if let Some(volume) = options.volume {
        engine.set_volume(volume);
    }
    if options.repeat_one {
        engine.toggle_repeat_one();
    }

    info!(
        tracks = context.len(),
        volume = engine.status().volume,
        repeat_one = engine.status().repeat_one,
        "Starting session"
    );
    state.play_now(start, Some(context));
    engine.pump(&mut state);

    let mut played = Vec::new();
    let mut ticks = 0;
    let step = config.tick_seconds();
    let mut interval = tokio::time::interval(Duration::from_millis(config.tick_ms));

    loop {
        for event in changes.drain() {
            if let PlayerEvent::CurrentTrackChanged {
                track_id: Some(id), ..
            } = event
            {
                played.push(id);
                if let Some(track) = state.current_track() {
                    info!(
                        track_id = %id,
                        title = %track.title,
                        artist = %track.artist,
                        position = state.index_of_current().map_or(0, |i| i + 1),
                        queue_len = state.queue().len(),
                        "Now playing"
                    );
                }
            }
        }

        if !engine.status().is_playing {
            if !engine.is_visible() {
                warn!("Current track has no playable source, stopping");
            }
            break;
        }
        if options.max_ticks.is_some_and(|max| ticks >= max) {
            debug!(ticks, "Tick limit reached");
            break;
        }

        interval.tick().await;
        engine.element_mut().tick(step);
        engine.pump(&mut state);
        ticks += 1;

        let status = engine.status();
        debug!(
            position = %format_time(status.display_position()),
            duration = %format_time(status.safe_duration()),
            "Progress"
        );
    }

    let final_status = engine.snapshot();
    info!(
        played = played.len(),
        ticks,
        position = %final_status.position_label,
        "Session finished"
    );

    Ok(SessionReport {
        played,
        ticks,
        final_status,
    })
}
