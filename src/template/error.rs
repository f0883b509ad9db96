use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("No value bound for placeholder ${0}$")]
    UnknownPlaceholder(String),

    #[error("Malformed template argument '{0}' (expected key=value)")]
    MalformedBinding(String),

    #[error("Malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },
}
