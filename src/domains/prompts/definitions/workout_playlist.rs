//! Workout playlist prompt definition.

use std::collections::HashMap;

use super::{PromptDefinition, argument, fill_default, title_case};
use rmcp::model::PromptArgument;

pub struct WorkoutPlaylistPrompt;

/// Target tempo range in BPM for a workout type.
fn bpm_range(workout_type: &str) -> &'static str {
    match workout_type {
        "cardio" => "120-140",
        "running" => "150-180",
        "hiit" => "140-180",
        "strength" | "weightlifting" => "100-130",
        "cycling" => "130-160",
        "yoga" | "stretching" => "60-90",
        _ => "110-140",
    }
}

impl PromptDefinition for WorkoutPlaylistPrompt {
    const NAME: &'static str = "workout_playlist_builder";
    const DESCRIPTION: &'static str =
        "Build a workout playlist with tempo guidance for the type of exercise";
    const SUMMARY: &'static str = "Build a {{workout_type}} workout playlist";

    fn template() -> &'static str {
        r#"Build a {{workout_type}} workout playlist at {{intensity}} intensity.

Target tempo: {{bpm}} BPM.

Workflow:
1. Use spotify_search to find energetic tracks that sit around {{bpm}} BPM.
2. Start slightly below the target for a warm-up, hold the target through the main set, and finish with a cool-down.
3. Create the playlist with spotify_playlist_manage (action "create"), named "{{playlist_name}}".
4. Add the tracks with spotify_playlist_items (action "add").

Goal: music that keeps pace with a {{intensity}} intensity {{workout_type}} session."#
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument(
                "workout_type",
                "Kind of workout (e.g., cardio, running, hiit, strength, yoga)",
                true,
            ),
            argument("intensity", "low, medium or high (default: medium)", false),
        ]
    }

    fn prepare(arguments: &mut HashMap<String, String>) {
        let intensity = fill_default(arguments, "intensity", "medium");
        if let Some(workout_type) = arguments.get("workout_type").cloned() {
            arguments.insert("bpm".to_string(), bpm_range(&workout_type.to_lowercase()).to_string());
            arguments.insert(
                "playlist_name".to_string(),
                format!("{} Power - {}", title_case(&workout_type), title_case(&intensity)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bpm_range() {
        assert_eq!(bpm_range("cardio"), "120-140");
        assert_eq!(bpm_range("yoga"), "60-90");
        assert_eq!(bpm_range("dancing"), "110-140");
    }

    #[test]
    fn test_prepare() {
        let mut args = HashMap::new();
        args.insert("workout_type".to_string(), "Cardio".to_string());
        args.insert("intensity".to_string(), "high".to_string());
        WorkoutPlaylistPrompt::prepare(&mut args);
        assert_eq!(args["bpm"], "120-140");
        assert_eq!(args["playlist_name"], "Cardio Power - High");
    }
}
