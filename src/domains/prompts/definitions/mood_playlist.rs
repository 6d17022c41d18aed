//! Mood playlist prompt definition.

use std::collections::HashMap;

use super::{PromptDefinition, argument, fill_default, title_case};
use rmcp::model::PromptArgument;

/// Builds a playlist around a mood, optionally narrowed by genre and decade.
pub struct MoodPlaylistPrompt;

impl PromptDefinition for MoodPlaylistPrompt {
    const NAME: &'static str = "create_mood_playlist";
    const DESCRIPTION: &'static str =
        "Create a Spotify playlist that matches a mood, with optional genre and decade";
    const SUMMARY: &'static str = "Create a {{mood}} mood playlist";

    fn template() -> &'static str {
        r#"Create a Spotify playlist for a {{mood}} mood{{#if genre}} with {{genre}} music{{/if}}{{#if decade}} from the {{decade}}{{/if}}.

Workflow:
1. Use spotify_search to find tracks that fit a {{mood}} mood{{#if genre}} (try the genre filter "{{genre}}"){{/if}}{{#if decade}} (try the year filter for the {{decade}}){{/if}}.
2. Create the playlist with spotify_playlist_manage (action "create"), named "{{playlist_name}}".
3. Add the chosen tracks with spotify_playlist_items (action "add").
4. Check the result with spotify_playlist_tracks.

Consider:
- Energy level and tempo that suit a {{mood}} mood
- {{#if genre}}Focus on {{genre}}{{else}}Genre variety{{/if}}
- {{#if decade}}Songs from the {{decade}}{{else}}A mix of eras{{/if}}
- 15-20 tracks with a good flow from one to the next

Goal: a playlist whose overall experience feels {{mood}} from start to finish."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument("mood", "The mood to match (e.g., chill, energetic, melancholic)", true),
            argument("genre", "Preferred genre", false),
            argument("decade", "Preferred decade (e.g., 1980s, 2000s)", false),
        ]
    }

    fn prepare(arguments: &mut HashMap<String, String>) {
        let mood = fill_default(arguments, "mood", "happy");
        arguments.insert("playlist_name".to_string(), format!("{} Vibes", title_case(&mood)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_playlist_metadata() {
        assert_eq!(MoodPlaylistPrompt::NAME, "create_mood_playlist");
        let args = MoodPlaylistPrompt::arguments();
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].required, Some(false));
        assert_eq!(args[2].required, Some(false));
    }

    #[test]
    fn test_prepare_names_playlist() {
        let mut args = HashMap::new();
        args.insert("mood".to_string(), "chill".to_string());
        MoodPlaylistPrompt::prepare(&mut args);
        assert_eq!(args["playlist_name"], "Chill Vibes");
    }

    #[test]
    fn test_prepare_defaults_mood() {
        let mut args = HashMap::new();
        MoodPlaylistPrompt::prepare(&mut args);
        assert_eq!(args["mood"], "happy");
        assert_eq!(args["playlist_name"], "Happy Vibes");
    }
}
