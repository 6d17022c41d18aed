//! Music discovery prompt definition.

use std::collections::HashMap;

use super::{PromptDefinition, argument, fill_default};
use rmcp::model::PromptArgument;

pub struct DiscoverSimilarMusicPrompt;

fn discovery_guidance(level: &str) -> &'static str {
    match level {
        "deep_cuts" => "Favour lesser-known tracks: album cuts, B-sides and artists with small followings.",
        "popular" => "Favour well-known hits and the most played tracks of related artists.",
        _ => "Balance familiar favourites with a few lesser-known tracks.",
    }
}

impl PromptDefinition for DiscoverSimilarMusicPrompt {
    const NAME: &'static str = "discover_similar_music";
    const DESCRIPTION: &'static str =
        "Discover music similar to a reference artist, album or track";
    const SUMMARY: &'static str = "Discover music similar to {{reference}}";

    fn template() -> &'static str {
        r#"Help me discover music similar to {{reference}}.

Discovery level: {{discovery_level}}. {{guidance}}

Workflow:
1. Use spotify_search to find {{reference}} and note its id.
2. Use spotify_get_info on it; for an artist, look at top tracks and albums to learn the sound.
3. Search for related artists and tracks with spotify_search, using genre and year filters that match.
4. Collect 15-20 tracks and explain briefly why each one fits.
5. Offer to save them with spotify_playlist_manage (action "create") and spotify_playlist_items (action "add").

Goal: expand my listening beyond {{reference}} while keeping what I like about it."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument("reference", "Artist, album or track to start from", true),
            argument(
                "discovery_level",
                "How adventurous to be: popular, balanced or deep_cuts (default: balanced)",
                false,
            ),
        ]
    }

    fn prepare(arguments: &mut HashMap<String, String>) {
        let level = fill_default(arguments, "discovery_level", "balanced");
        arguments.insert("guidance".to_string(), discovery_guidance(&level).to_string());
    }
}
