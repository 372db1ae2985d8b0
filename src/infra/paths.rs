// src/infra/paths.rs - Config and credential locations
//
// All paths respect the DOCTOR_GROQ_HOME environment variable for isolation.
// When unset, everything lives under ~/.doctor-groq/.

use std::path::PathBuf;

/// Returns the DOCTOR_GROQ_HOME override, if set.
fn doctor_groq_home() -> Option<PathBuf> {
    std::env::var_os("DOCTOR_GROQ_HOME").map(PathBuf::from)
}

/// Configuration directory: $DOCTOR_GROQ_HOME/ or ~/.doctor-groq/
pub fn config_dir() -> PathBuf {
    if let Some(home) = doctor_groq_home() {
        return home;
    }
    dirs_home().join(".doctor-groq")
}

/// Home directory. Falls back to the working directory on systems without one.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Credentials directory
pub fn credentials_dir() -> PathBuf {
    config_dir().join("credentials")
}

/// Saved API key for a provider: credentials/{provider}.key
pub fn key_file(provider: &str) -> PathBuf {
    credentials_dir().join(format!("{provider}.key"))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_file_layout() {
        let path = key_file("groq");
        assert!(path.ends_with("credentials/groq.key"));
    }

    #[test]
    fn test_config_file_inside_config_dir() {
        assert_eq!(config_file_path().parent(), Some(config_dir().as_path()));
    }
}
