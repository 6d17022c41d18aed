//! Party playlist prompt definition.

use std::collections::HashMap;

use super::{PromptDefinition, argument, fill_default, title_case};
use rmcp::model::PromptArgument;

pub struct PartyPlaylistPrompt;

const TRACKS_PER_HOUR: f64 = 15.0;

/// Rough track count for a party of `hours`; unparseable input counts as 3 hours.
fn track_count(hours: &str) -> u32 {
    let hours = hours
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h > 0.0)
        .unwrap_or(3.0);
    ((hours * TRACKS_PER_HOUR).round() as u32).max(1)
}

impl PromptDefinition for PartyPlaylistPrompt {
    const NAME: &'static str = "party_playlist_generator";
    const DESCRIPTION: &'static str = "Generate a playlist sized for a party of a given type and length";
    const SUMMARY: &'static str = "Generate a {{party_type}} playlist";

    fn template() -> &'static str {
        r#"Build a playlist for a {{party_type}} lasting {{duration_hours}} hours.

That is roughly {{track_count}} tracks (about 15 per hour).

Workflow:
1. Use spotify_search to gather crowd-pleasing tracks that suit a {{party_type}}.
2. Order them as an energy arc: warm up, build to a peak, then ease off near the end.
3. Create the playlist with spotify_playlist_manage (action "create"), named "{{playlist_name}}".
4. Add the tracks with spotify_playlist_items (action "add"); large lists are sent in batches automatically.
5. Optionally start it with spotify_playback.

Goal: keep the room going for the full {{duration_hours}} hours without repeats."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument("party_type", "Kind of party (e.g., dance_party, house_party, dinner)", true),
            argument("duration_hours", "Length of the party in hours (default: 3)", false),
        ]
    }

    fn prepare(arguments: &mut HashMap<String, String>) {
        let hours = fill_default(arguments, "duration_hours", "3");
        arguments.insert("track_count".to_string(), track_count(&hours).to_string());
        if let Some(party_type) = arguments.get("party_type").cloned() {
            arguments.insert("playlist_name".to_string(), format!("{} Mix", title_case(&party_type)));
        }
    }
}
