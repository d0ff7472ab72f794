//! Environment credential source.
//!
//! Reads API keys from process environment variables, after loading a `.env`
//! file from the working directory (or its parents) if one exists.

use std::path::PathBuf;

use secrecy::SecretString;

/// Load `.env` into the process environment.
///
/// Returns the path that was loaded, or `None` when no file was found.
/// Variables already set in the environment are not overridden.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(err) if err.not_found() => None,
        Err(err) => {
            tracing::warn!("Failed to load .env: {err}");
            None
        }
    }
}

/// Read-only credential source backed by one environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredentialSource {
    var: String,
}

impl EnvCredentialSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    /// The credential, if the variable is set to a non-blank Unicode value.
    pub fn get(&self) -> Option<SecretString> {
        match std::env::var(&self.var) {
            Ok(val) if !val.trim().is_empty() => Some(SecretString::from(val.trim().to_owned())),
            Ok(_) => None,
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!(var = %self.var, "credential variable is not valid Unicode; ignoring");
                None
            }
        }
    }

    /// This source's credential, or `fallback`'s when this one is unset.
    pub fn get_or(&self, fallback: &EnvCredentialSource) -> Option<SecretString> {
        self.get().or_else(|| fallback.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_reads_and_trims_variable() {
        unsafe { std::env::set_var("PITCHBOT_TEST_CREDENTIAL_1", "  abc-123  ") };
        let source = EnvCredentialSource::new("PITCHBOT_TEST_CREDENTIAL_1");
        assert_eq!(source.get().unwrap().expose_secret(), "abc-123");
        unsafe { std::env::remove_var("PITCHBOT_TEST_CREDENTIAL_1") };
    }

    #[test]
    fn test_missing_or_blank_is_none() {
        assert!(EnvCredentialSource::new("PITCHBOT_TEST_DOES_NOT_EXIST").get().is_none());
        unsafe { std::env::set_var("PITCHBOT_TEST_CREDENTIAL_2", "   ") };
        assert!(EnvCredentialSource::new("PITCHBOT_TEST_CREDENTIAL_2").get().is_none());
        unsafe { std::env::remove_var("PITCHBOT_TEST_CREDENTIAL_2") };
    }

    #[test]
    fn test_fallback_source() {
        unsafe { std::env::set_var("PITCHBOT_TEST_CREDENTIAL_3", "llm-key") };
        let speech = EnvCredentialSource::new("PITCHBOT_TEST_SPEECH_UNSET");
        let llm = EnvCredentialSource::new("PITCHBOT_TEST_CREDENTIAL_3");
        assert_eq!(speech.get_or(&llm).unwrap().expose_secret(), "llm-key");
        unsafe { std::env::remove_var("PITCHBOT_TEST_CREDENTIAL_3") };
    }
}
