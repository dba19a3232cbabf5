//! `${VAR}` expansion for string configuration values.

use crate::ConfigError;

/// Expand environment variables in a configuration string.
///
/// `field` names the config field for error messages.
pub(crate) fn env_str(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: err.to_string(),
        })
}
