mod error;
mod resolver;

pub use error::{ResolveError, TemplateError};
pub use resolver::{DEFAULT_URL_TEMPLATE, NAME_PLACEHOLDER, Resolver, TemplateResolver, UrlTemplate};
