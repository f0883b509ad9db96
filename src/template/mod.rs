//! Payload templates.
//!
//! Bodies are written with `$name$` placeholders. At registration they are
//! brace-escaped, marked into `{name}` form and parsed into literal and
//! placeholder tokens; resolving substitutes caller-supplied bindings.

mod error;
mod parser;
mod payload;
mod registry;

#[cfg(test)]
mod tests;

pub use error::TemplateError;
pub use parser::{
    escape_literals, mark_placeholders, parse, parse_binding, parse_bindings, Template, Token,
    SENTINEL,
};
pub use payload::{PayloadSource, ResolvedPayload};
pub use registry::{PayloadTemplate, TemplateRegistry, DEFAULT_TEMPLATE};
