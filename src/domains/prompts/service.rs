//! Prompt service implementation.
//!
//! The PromptService keeps the registered templates and renders them with
//! caller arguments. Prompts are defined in `definitions/` and registered via
//! `registry.rs`; adding one does not touch this file.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;

/// Service for managing and instantiating prompts.
pub struct PromptService {
    /// Registry of available prompts.
    /// Key: prompt name, Value: prompt template
    prompts: HashMap<String, PromptTemplate>,

    /// Registration order, used for listing.
    order: Vec<String>,
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptService {
    pub fn new() -> Self {
        let mut service = Self {
            prompts: HashMap::new(),
            order: Vec::new(),
        };
        for template in get_all_prompts() {
            service.register_prompt(template);
        }
        info!("Initialized PromptService with {} prompt(s)", service.order.len());
        service
    }

    /// Register a prompt template, replacing one with the same name.
    pub fn register_prompt(&mut self, template: PromptTemplate) {
        debug!("Registering prompt: {}", template.name);
        if !self.prompts.contains_key(&template.name) {
            self.order.push(template.name.clone());
        }
        self.prompts.insert(template.name.clone(), template);
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.order
            .iter()
            .filter_map(|name| self.prompts.get(name))
            .map(|template| Prompt {
                name: template.name.clone(),
                title: None,
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Render a prompt.
    ///
    /// Defaults are applied first, so a required argument that has a default
    /// may be omitted. Blank values count as missing.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .get(name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let mut arguments = arguments.unwrap_or_default();
        (template.prepare)(&mut arguments);

        for arg in &template.arguments {
            let present = arguments
                .get(&arg.name)
                .is_some_and(|v| !v.trim().is_empty());
            if arg.required.unwrap_or(false) && !present {
                return Err(PromptError::missing_argument(&arg.name));
            }
        }

        let content = template.render(&arguments)?;
        let description = template.render_summary(&arguments)?;

        Ok(GetPromptResult {
            description,
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}
