use thiserror::Error;

/// Invalid peer address template, reported at start-up.
#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("url template '{template}' does not contain the {{name}} placeholder")]
  MissingPlaceholder { template: String },

  #[error("url template '{template}' does not produce a valid url: {source}")]
  InvalidUrl {
    template: String,
    #[source]
    source: url::ParseError,
  },

  #[error("url template '{template}' uses unsupported scheme '{scheme}'")]
  UnsupportedScheme { template: String, scheme: String },
}

/// A peer name that could not be turned into a target URL.
#[derive(Debug, Error)]
#[error("peer address '{address}' is not a valid url: {source}")]
pub struct ResolveError {
  /// The address as rendered from the template, reported in place of a URL.
  pub address: String,
  #[source]
  pub source: url::ParseError,
}
