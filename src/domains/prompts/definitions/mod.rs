//! Prompt definitions module.
//!
//! Each prompt is defined in its own file with:
//! - Metadata (name, description, arguments)
//! - Message template and per-call summary
//! - Defaults for omitted arguments
//!
//! ## Adding a New Prompt
//!
//! 1. Create a new file (e.g., `my_prompt.rs`)
//! 2. Implement the `PromptDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod discover_similar_music;
mod focus_music_curator;
mod mood_playlist;
mod party_playlist;
mod workout_playlist;

pub use discover_similar_music::DiscoverSimilarMusicPrompt;
pub use focus_music_curator::FocusMusicCuratorPrompt;
pub use mood_playlist::MoodPlaylistPrompt;
pub use party_playlist::PartyPlaylistPrompt;
pub use workout_playlist::WorkoutPlaylistPrompt;

use rmcp::model::PromptArgument;
use std::collections::HashMap;

/// Trait for prompt definitions.
///
/// Each prompt must implement this trait to provide its metadata and template.
pub trait PromptDefinition {
    /// The unique name of the prompt.
    const NAME: &'static str;

    /// A description of what the prompt does.
    const DESCRIPTION: &'static str;

    /// Description returned with a rendered prompt; same placeholder syntax.
    const SUMMARY: &'static str;

    /// The template string with {{variable}} placeholders.
    fn template() -> &'static str;

    /// The arguments this prompt accepts.
    fn arguments() -> Vec<PromptArgument>;

    /// Fill defaults and derived values before rendering.
    fn prepare(_arguments: &mut HashMap<String, String>) {}
}

pub(crate) fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}

/// Set `key` to `default` when it is absent or blank, returning the value.
pub(crate) fn fill_default(
    arguments: &mut HashMap<String, String>,
    key: &str,
    default: &str,
) -> String {
    let value = arguments
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string();
    arguments.insert(key.to_string(), value.clone());
    value
}

/// `dance_party` -> `Dance Party`.
pub(crate) fn title_case(value: &str) -> String {
    value
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("dance_party"), "Dance Party");
        assert_eq!(title_case("hiit"), "Hiit");
        assert_eq!(title_case("lo-fi  beats"), "Lo Fi Beats");
    }

    #[test]
    fn test_fill_default() {
        let mut args = HashMap::new();
        args.insert("mood".to_string(), "  ".to_string());
        assert_eq!(fill_default(&mut args, "mood", "happy"), "happy");
        assert_eq!(args["mood"], "happy");

        args.insert("genre".to_string(), "jazz".to_string());
        assert_eq!(fill_default(&mut args, "genre", "pop"), "jazz");
    }
}
