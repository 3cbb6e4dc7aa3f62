use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{ResolveError, TemplateError};

/// Placeholder substituted with the peer name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Address template used when none is configured.
pub const DEFAULT_URL_TEMPLATE: &str = "http://{name}:5000/test";

/// Name used to check that a template renders to a valid URL.
const PROBE_NAME: &str = "peer";

/// A peer address template such as `http://{name}:5000/test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
  template: String,
}

impl UrlTemplate {
  /// Parse and check a template.
  ///
  /// The template must contain [`NAME_PLACEHOLDER`] and render to an
  /// absolute `http` or `https` URL.
  pub fn parse(template: impl Into<String>) -> Result<Self, TemplateError> {
    let template = template.into();

    if !template.contains(NAME_PLACEHOLDER) {
      return Err(TemplateError::MissingPlaceholder { template });
    }

    let probe = template.replace(NAME_PLACEHOLDER, PROBE_NAME);
    let url = match Url::parse(&probe) {
      Ok(url) => url,
      Err(source) => return Err(TemplateError::InvalidUrl { template, source }),
    };

    match url.scheme() {
      "http" | "https" => Ok(Self { template }),
      scheme => Err(TemplateError::UnsupportedScheme {
        scheme: scheme.to_string(),
        template,
      }),
    }
  }

  /// Substitute the peer name into the template.
  ///
  /// A missing name substitutes the empty string.
  pub fn render(&self, name: Option<&str>) -> String {
    self.template.replace(NAME_PLACEHOLDER, name.unwrap_or(""))
  }
}

impl Default for UrlTemplate {
  fn default() -> Self {
    Self {
      template: DEFAULT_URL_TEMPLATE.to_string(),
    }
  }
}

impl FromStr for UrlTemplate {
  type Err = TemplateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for UrlTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.template)
  }
}

/// Turns a peer name into the URL its `/test` endpoint is reached at.
pub trait Resolver: Send + Sync {
  /// Resolve a peer name to a target URL.
  fn resolve(&self, name: Option<&str>) -> Result<Url, ResolveError>;
}

/// Resolver that substitutes the peer name into a [`UrlTemplate`].
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
  template: UrlTemplate,
}

impl TemplateResolver {
  pub fn new(template: UrlTemplate) -> Self {
    Self { template }
  }
}

impl Resolver for TemplateResolver {
  fn resolve(&self, name: Option<&str>) -> Result<Url, ResolveError> {
    let address = self.template.render(name);
    Url::parse(&address).map_err(|source| ResolveError { address, source })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_template() {
    let resolver = TemplateResolver::default();
    let url = resolver.resolve(Some("cart")).unwrap();

    assert_eq!(url.as_str(), "http://cart:5000/test");
  }

  #[test]
  fn test_custom_template() {
    let template = UrlTemplate::parse("https://{name}.svc.cluster.local:8443/test").unwrap();
    let url = TemplateResolver::new(template).resolve(Some("payments")).unwrap();

    assert_eq!(url.host_str(), Some("payments.svc.cluster.local"));
    assert_eq!(url.port(), Some(8443));
    assert_eq!(url.path(), "/test");
  }

  #[test]
  fn test_placeholder_in_path() {
    let template = UrlTemplate::parse("http://127.0.0.1:8080/test?peer={name}").unwrap();
    let url = TemplateResolver::new(template).resolve(Some("b")).unwrap();

    assert_eq!(url.as_str(), "http://127.0.0.1:8080/test?peer=b");
  }

  #[test]
  fn test_missing_placeholder() {
    let err = UrlTemplate::parse("http://localhost:5000/test").unwrap_err();
    assert!(matches!(err, TemplateError::MissingPlaceholder { .. }));
  }

  #[test]
  fn test_invalid_template() {
    let err = UrlTemplate::parse("not a url {name}").unwrap_err();
    assert!(matches!(err, TemplateError::InvalidUrl { .. }));
  }

  #[test]
  fn test_unsupported_scheme() {
    let err: TemplateError = "ftp://{name}/test".parse::<UrlTemplate>().unwrap_err();
    assert!(matches!(err, TemplateError::UnsupportedScheme { ref scheme, .. } if scheme == "ftp"));
  }

  #[test]
  fn test_missing_name_reports_rendered_address() {
    let err = TemplateResolver::default().resolve(None).unwrap_err();
    assert_eq!(err.address, "http://:5000/test");
  }

  #[test]
  fn test_render_is_pure_substitution() {
    let template = UrlTemplate::default();
    assert_eq!(template.render(Some("a")), "http://a:5000/test");
    assert_eq!(template.render(Some("a")), template.render(Some("a")));
  }
}
