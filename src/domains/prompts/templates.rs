//! Prompt templates module.
//!
//! This module contains the PromptTemplate struct and the small rendering
//! engine the playlist prompts are written in.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

/// Hook run over the caller's arguments before rendering.
pub type PrepareFn = fn(&mut HashMap<String, String>);

fn no_prepare(_arguments: &mut HashMap<String, String>) {}

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    /// The message template.
    /// Uses a simple {{variable}} syntax for substitution.
    pub template: String,

    /// Template for the per-call description returned with the message.
    pub summary: String,

    /// Fills defaults and derived values into the arguments.
    pub prepare: PrepareFn,
}

impl PromptTemplate {
    /// Create a new prompt template with no summary and no prepare hook.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arguments: Vec<PromptArgument>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            arguments,
            template: template.into(),
            summary: String::new(),
            prepare: no_prepare,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_prepare(mut self, prepare: PrepareFn) -> Self {
        self.prepare = prepare;
        self
    }

    /// Render the message template with the given arguments.
    ///
    /// This method performs simple variable substitution:
    /// - `{{variable}}` is replaced with the value of `variable`
    /// - `{{#if variable}}content{{/if}}` includes content only if variable is set
    /// - `{{#if variable}}content{{else}}alternative{{/if}}` with else support
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        render_text(&self.template, arguments)
    }

    /// Render the per-call description, falling back to the static one.
    pub fn render_summary(
        &self,
        arguments: &HashMap<String, String>,
    ) -> Result<Option<String>, PromptError> {
        if self.summary.is_empty() {
            return Ok(self.description.clone());
        }
        render_text(&self.summary, arguments).map(Some)
    }
}

fn render_text(template: &str, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
    let mut result = process_conditionals(template, arguments)?;

    for (key, value) in arguments {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    Ok(clean_unmatched_placeholders(&result))
}

/// Resolve `{{#if}}` blocks. Blocks do not nest.
fn process_conditionals(
    template: &str,
    arguments: &HashMap<String, String>,
) -> Result<String, PromptError> {
    const IF_TAG: &str = "{{#if ";
    const ELSE_TAG: &str = "{{else}}";
    const ENDIF_TAG: &str = "{{/if}}";

    let mut result = template.to_string();

    while let Some(if_start) = result.find(IF_TAG) {
        let var_end = result[if_start..]
            .find("}}")
            .map(|pos| if_start + pos)
            .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
        let var_name = result[if_start + IF_TAG.len()..var_end].trim();

        let endif_pos = result[var_end..]
            .find(ENDIF_TAG)
            .map(|pos| var_end + pos)
            .ok_or_else(|| PromptError::template(format!("Missing {{{{/if}}}} for '{}'", var_name)))?;

        let block = &result[var_end + 2..endif_pos];
        let (when_set, when_unset) = match block.find(ELSE_TAG) {
            Some(else_pos) => (&block[..else_pos], &block[else_pos + ELSE_TAG.len()..]),
            None => (block, ""),
        };

        let is_set = arguments.get(var_name).is_some_and(|v| !v.is_empty());
        let replacement = if is_set { when_set } else { when_unset };

        result = format!(
            "{}{}{}",
            &result[..if_start],
            replacement,
            &result[endif_pos + ENDIF_TAG.len()..]
        );
    }

    Ok(result)
}

/// Remove placeholders no argument filled.
fn clean_unmatched_placeholders(template: &str) -> String {
    let mut result = template.to_string();
    let mut start = 0;

    while let Some(pos) = result[start..].find("{{") {
        let abs_pos = start + pos;
        if let Some(end_pos) = result[abs_pos..].find("}}") {
            let end_abs = abs_pos + end_pos + 2;
            let placeholder = &result[abs_pos..end_abs];

            if !placeholder.contains('#') && !placeholder.contains('/') {
                result.replace_range(abs_pos..end_abs, "");
                continue;
            }
        }
        start = abs_pos + 2;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_simple_substitution() {
        let template = PromptTemplate::new("test", None, vec![], "Play {{mood}} music");
        let result = template.render(&args(&[("mood", "chill")])).unwrap();
        assert_eq!(result, "Play chill music");
    }

    #[test]
    fn test_conditional_with_and_without_value() {
        let template =
            PromptTemplate::new("test", None, vec![], "Mix{{#if genre}} of {{genre}}{{/if}}.");
        assert_eq!(template.render(&args(&[("genre", "jazz")])).unwrap(), "Mix of jazz.");
        assert_eq!(template.render(&HashMap::new()).unwrap(), "Mix.");
    }

    #[test]
    fn test_conditional_with_else() {
        let template = PromptTemplate::new(
            "test",
            None,
            vec![],
            "Era: {{#if decade}}{{decade}}{{else}}any{{/if}}; genre: {{#if genre}}{{genre}}{{else}}any{{/if}}",
        );
        let result = template.render(&args(&[("decade", "1980s"), ("genre", "")])).unwrap();
        assert_eq!(result, "Era: 1980s; genre: any");
    }

    #[test]
    fn test_unclosed_conditional_is_an_error() {
        let template = PromptTemplate::new("test", None, vec![], "{{#if mood}}oops");
        assert!(matches!(
            template.render(&HashMap::new()),
            Err(PromptError::TemplateError(_))
        ));
    }

    #[test]
    fn test_unmatched_placeholders_removed() {
        let template = PromptTemplate::new("test", None, vec![], "a{{missing}}b");
        assert_eq!(template.render(&HashMap::new()).unwrap(), "ab");
    }

    #[test]
    fn test_summary_falls_back_to_description() {
        let template = PromptTemplate::new("test", Some("static".into()), vec![], "");
        assert_eq!(
            template.render_summary(&HashMap::new()).unwrap().as_deref(),
            Some("static")
        );

        let template = template.with_summary("For {{mood}}");
        assert_eq!(
            template.render_summary(&args(&[("mood", "rain")])).unwrap().as_deref(),
            Some("For rain")
        );
    }
}
