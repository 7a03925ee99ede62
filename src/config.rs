use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Beagle";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the extraction service API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Read the extraction service API key from the environment.
/// An empty or whitespace-only value counts as unset.
pub fn api_key() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Beagle/ on all platforms (user-visible by design)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Directory rendered reports are written under, one subfolder per run.
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports")
}

/// Path of the run history database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("property_reports.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Beagle"));
    }

    #[test]
    fn reports_dir_under_app_data() {
        let reports = reports_dir();
        let app = app_data_dir();
        assert!(reports.starts_with(app));
        assert!(reports.ends_with("reports"));
    }

    #[test]
    fn database_under_app_data() {
        assert!(database_path().starts_with(app_data_dir()));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn default_filter_scopes_to_crate() {
        assert_eq!(default_log_filter(), "beagle=info");
    }
}
