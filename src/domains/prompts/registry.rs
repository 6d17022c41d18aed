//! Prompt Registry - central registration of all prompts.
//!
//! When adding a new prompt:
//! 1. Create the prompt file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_prompts()`

use super::definitions::{
    DiscoverSimilarMusicPrompt, FocusMusicCuratorPrompt, MoodPlaylistPrompt, PartyPlaylistPrompt,
    PromptDefinition, WorkoutPlaylistPrompt,
};
use super::templates::PromptTemplate;

/// Build a PromptTemplate from a PromptDefinition.
fn build_template<P: PromptDefinition>() -> PromptTemplate {
    PromptTemplate::new(
        P::NAME,
        Some(P::DESCRIPTION.to_string()),
        P::arguments(),
        P::template(),
    )
    .with_summary(P::SUMMARY)
    .with_prepare(P::prepare)
}

/// Get all registered prompts as PromptTemplates.
pub fn get_all_prompts() -> Vec<PromptTemplate> {
    vec![
        build_template::<MoodPlaylistPrompt>(),
        build_template::<DiscoverSimilarMusicPrompt>(),
        build_template::<PartyPlaylistPrompt>(),
        build_template::<WorkoutPlaylistPrompt>(),
        build_template::<FocusMusicCuratorPrompt>(),
    ]
}

/// Get the list of all prompt names.
pub fn prompt_names() -> Vec<&'static str> {
    vec![
        MoodPlaylistPrompt::NAME,
        DiscoverSimilarMusicPrompt::NAME,
        PartyPlaylistPrompt::NAME,
        WorkoutPlaylistPrompt::NAME,
        FocusMusicCuratorPrompt::NAME,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_prompts() {
        let prompts = get_all_prompts();
        assert_eq!(prompts.len(), 5);

        let names: Vec<_> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"create_mood_playlist"));
        assert!(names.contains(&"discover_similar_music"));
        assert!(names.contains(&"party_playlist_generator"));
        assert!(names.contains(&"workout_playlist_builder"));
        assert!(names.contains(&"focus_music_curator"));
        assert!(prompts.iter().all(|p| p.description.is_some() && !p.arguments.is_empty()));
    }

    #[test]
    fn test_prompt_names_match_prompts() {
        let names = prompt_names();
        let prompts = get_all_prompts();
        assert_eq!(names.len(), prompts.len());
        for prompt in &prompts {
            assert!(names.contains(&prompt.name.as_str()));
        }
    }
}
