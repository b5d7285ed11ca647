//! Errors returned by the binding generator driver.

use std::path::PathBuf;

use scriptbind_core::InputError;
use scriptbind_model::ModelError;
use thiserror::Error;

/// Fatal errors; when one is returned nothing has been generated.
#[derive(Debug, Error)]
pub enum BindError {
    /// The analyzer document is malformed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The naming conventions do not form valid matching rules.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_keep_their_message() {
        let err = BindError::from(InputError::MissingSection("TranslationUnit"));
        assert_eq!(
            err.to_string(),
            "invalid input document: missing <TranslationUnit> section"
        );
    }

    #[test]
    fn io_error_names_the_path() {
        let err = BindError::Io {
            path: PathBuf::from("bindings.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot read bindings.toml: not found");
    }
}
