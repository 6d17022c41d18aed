//! Focus music prompt definition.

use std::collections::HashMap;

use super::{PromptDefinition, argument, fill_default, title_case};
use rmcp::model::PromptArgument;

pub struct FocusMusicCuratorPrompt;

fn noise_guidance(noise_level: &str) -> &'static str {
    match noise_level {
        "minimal" => "Keep it strictly instrumental: ambient, drone and soft piano with no sudden changes.",
        "moderate" => "Mostly instrumental; sparse vocals are fine if they stay in the background.",
        _ => "Prefer instrumental tracks with steady rhythm such as lo-fi, post-rock or electronica.",
    }
}

impl PromptDefinition for FocusMusicCuratorPrompt {
    const NAME: &'static str = "focus_music_curator";
    const DESCRIPTION: &'static str = "Curate background music for concentration";
    const SUMMARY: &'static str = "Curate focus music for {{focus_type}}";

    fn template() -> &'static str {
        r#"Curate focus music for {{focus_type}}.

Noise level: {{noise_level}}. {{guidance}}

Workflow:
1. Use spotify_search for instrumental, ambient and study tracks that suit {{focus_type}}.
2. Avoid abrupt tempo or volume changes; aim for 2-3 hours of continuous listening.
3. Create the playlist with spotify_playlist_manage (action "create"), named "{{playlist_name}}".
4. Add the tracks with spotify_playlist_items (action "add") and start playback with spotify_playback.

Goal: music that fades into the background and helps sustain attention."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument("focus_type", "What you are focusing on (e.g., coding, studying, writing)", true),
            argument("noise_level", "minimal, low or moderate (default: low)", false),
        ]
    }

    fn prepare(arguments: &mut HashMap<String, String>) {
        let noise_level = fill_default(arguments, "noise_level", "low");
        arguments.insert("guidance".to_string(), noise_guidance(&noise_level).to_string());
        if let Some(focus_type) = arguments.get("focus_type").cloned() {
            arguments.insert(
                "playlist_name".to_string(),
                format!("Deep Focus - {}", title_case(&focus_type)),
            );
        }
    }
}
