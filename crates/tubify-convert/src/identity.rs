use tubify_core::TrackIdentity;
use tubify_spotify::Track;
use tubify_youtube::Video;

/// Markers YouTube appends to auto-generated and label channels. They hurt
/// search matches on other services.
const NOISE: [&str; 2] = [" - Topic", "VEVO"];

/// Removes every occurrence of the channel noise markers. Repeats until the
/// name is stable so removals that splice a new marker together are caught
/// too.
pub fn clean_name(name: &str) -> String {
    let mut cleaned = name.to_string();
    loop {
        let next = NOISE
            .iter()
            .fold(cleaned.clone(), |acc, marker| acc.replace(marker, ""));
        if next == cleaned {
            return cleaned;
        }
        cleaned = next;
    }
}

pub fn track_identity(track: &Track) -> TrackIdentity {
    TrackIdentity::new(track.name.clone(), track.primary_artist().map(str::to_string))
}

pub fn video_identity(video: &Video) -> TrackIdentity {
    TrackIdentity::new(
        video.snippet.title.clone(),
        video.snippet.channel_title.clone(),
    )
}

/// Search key for an identity fetched from a provider.
pub fn search_key(identity: &TrackIdentity) -> String {
    clean_name(&identity.display_name())
}
