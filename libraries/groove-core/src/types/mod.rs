mod ids;
mod playlist;
mod track;

pub use ids::TrackId;
pub use playlist::{playlist_queue, PlaylistEntry};
pub use track::Track;
