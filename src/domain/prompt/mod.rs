//! Prompt templates applied to the forwarded message

mod template;

pub use template::{PromptTemplate, TemplateError};
