use super::{parse_bindings, TemplateError, TemplateRegistry};
use crate::PoisonError;
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, warn};

/// Where the injected payload comes from, as selected on invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Payload text used verbatim, never run through substitution
    Literal(String),
    /// A registered template and its `key=value` arguments
    Template { name: String, args: Vec<String> },
    /// The registry's default template
    Default,
}

impl PayloadSource {
    /// Build the source from raw invocation options.
    ///
    /// A literal payload and a template name are mutually exclusive, and
    /// template arguments require a template.
    pub fn from_options(
        payload: Option<String>,
        template: Option<String>,
        template_args: Vec<String>,
    ) -> Result<Self, PoisonError> {
        match (payload, template) {
            (Some(_), Some(_)) => Err(PoisonError::Usage(
                "Cannot specify both payload and template".to_string(),
            )),
            (Some(_), None) | (None, None) if !template_args.is_empty() => Err(
                PoisonError::Usage("Template arguments require --template".to_string()),
            ),
            (Some(text), None) => Ok(Self::Literal(text)),
            (None, Some(name)) => Ok(Self::Template {
                name,
                args: template_args,
            }),
            (None, None) => Ok(Self::Default),
        }
    }
}

impl fmt::Display for PayloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => write!(f, "literal"),
            Self::Template { name, .. } => write!(f, "template:{}", name),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The single payload body injected into every class of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPayload {
    body: String,
    origin: String,
}

impl ResolvedPayload {
    /// Resolve a payload source against a registry
    pub fn resolve(
        registry: &TemplateRegistry,
        source: &PayloadSource,
    ) -> Result<Self, TemplateError> {
        let body = match source {
            PayloadSource::Literal(text) => text.clone(),
            PayloadSource::Template { name, args } => {
                let template = registry.select(name)?;
                let bindings = parse_bindings(args)?;
                let placeholders = template.template().placeholders();
                for key in bindings.keys() {
                    if !placeholders.contains(&key.as_str()) {
                        warn!(template = %name, key = %key, "Template argument matches no placeholder");
                    }
                }
                template.template().resolve(&bindings)?
            }
            PayloadSource::Default => {
                let template = registry.default_template()?;
                template.template().resolve(&Default::default())?
            }
        };

        debug!(origin = %source, bytes = body.len(), "Resolved payload");

        Ok(Self {
            body,
            origin: source.to_string(),
        })
    }

    /// Payload text used verbatim
    pub fn literal(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            origin: "literal".to_string(),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Short description of where the payload came from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Hex SHA-256 of the payload body
    pub fn sha256(&self) -> String {
        hex::encode(Sha256::digest(self.body.as_bytes()))
    }
}
