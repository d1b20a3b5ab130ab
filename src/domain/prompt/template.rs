//! Prompt template parsing and rendering
//!
//! Supports variable syntax: `${var:variable-name:default-value}`
//! - `${var:name}` - Required variable, error if not provided
//! - `${var:name:default}` - Optional variable with default value

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Regex to match variable patterns: ${var:name} or ${var:name:default}
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9]*)(?::([^}]*))?\}")
        .expect("variable pattern is a valid regex")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed variable from a template
#[derive(Debug, Clone, PartialEq, Eq)]
struct PromptVariable {
    name: String,
    default: Option<String>,
}

impl PromptVariable {
    fn placeholder(&self) -> String {
        match &self.default {
            Some(default) => format!("${{var:{}:{}}}", self.name, default),
            None => format!("${{var:{}}}", self.name),
        }
    }
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    /// Parse a template string and extract its variables
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut variables: Vec<PromptVariable> = Vec::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let Some(name) = cap.get(1).map(|m| m.as_str()) else {
                continue;
            };

            if variables.iter().any(|v| v.name == name) {
                continue;
            }

            variables.push(PromptVariable {
                name: name.to_string(),
                default: cap.get(2).map(|m| m.as_str().to_string()),
            });
        }

        Self { content, variables }
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v.name == name)
    }

    /// Render the template with provided values, falling back to defaults
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut result = self.content.clone();

        for var in &self.variables {
            let value = values
                .get(&var.name)
                .or(var.default.as_ref())
                .ok_or_else(|| TemplateError::MissingVariable {
                    name: var.name.clone(),
                })?;

            result = result.replace(&var.placeholder(), value);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_variables() {
        let template = PromptTemplate::parse("Hello, world!");
        assert!(template.variables.is_empty());
        assert!(!template.has_variable("message"));
    }

    #[test]
    fn test_parse_required_variable() {
        let template = PromptTemplate::parse("User: ${var:message}\nAI:");
        assert_eq!(template.variables.len(), 1);

        let var = &template.variables[0];
        assert_eq!(var.name, "message");
        assert!(var.default.is_none());
        assert!(template.has_variable("message"));
    }

    #[test]
    fn test_parse_duplicate_variables() {
        let template = PromptTemplate::parse("${var:message} and ${var:message} again");
        assert_eq!(template.variables.len(), 1);
    }

    #[test]
    fn test_render_conversation_template() {
        let template = PromptTemplate::parse("User: ${var:message}\nAI:");

        let mut values = HashMap::new();
        values.insert("message".to_string(), "hello".to_string());

        assert_eq!(template.render(&values).unwrap(), "User: hello\nAI:");
    }

    #[test]
    fn test_render_missing_required_variable() {
        let template = PromptTemplate::parse("Hello, ${var:name}!");

        match template.render(&HashMap::new()) {
            Err(TemplateError::MissingVariable { name }) => assert_eq!(name, "name"),
            other => panic!("Expected MissingVariable error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_with_default() {
        let template = PromptTemplate::parse("${var:persona:You are concise.} ${var:message}");

        let mut values = HashMap::new();
        values.insert("message".to_string(), "Hi".to_string());

        assert_eq!(template.render(&values).unwrap(), "You are concise. Hi");
    }

    #[test]
    fn test_render_repeated_variable() {
        let template = PromptTemplate::parse("${var:message} / ${var:message}");

        let mut values = HashMap::new();
        values.insert("message".to_string(), "echo".to_string());

        assert_eq!(template.render(&values).unwrap(), "echo / echo");
    }
}
