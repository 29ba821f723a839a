use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bridge_logging::{bridge_info, bridge_warn};

/// Loads the extension's local preferences, a RON map of string keys to
/// string values. The bridge only ever reads from it.
pub(crate) fn load_preferences(path: &Path) -> HashMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return HashMap::new();
        }
        Err(err) => {
            bridge_warn!("Failed to read preferences from {:?}: {}", path, err);
            return HashMap::new();
        }
    };

    match ron::from_str::<HashMap<String, String>>(&content) {
        Ok(preferences) => {
            bridge_info!("Loaded {} preferences from {:?}", preferences.len(), path);
            preferences
        }
        Err(err) => {
            bridge_warn!("Failed to parse preferences from {:?}: {}", path, err);
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bridge_engine::PreferenceStore;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn reads_default_model_preference() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "resumeai-default-model": "claude-3-5-sonnet" }}"#).unwrap();

        let preferences = load_preferences(file.path());

        assert_eq!(
            PreferenceStore::get(&preferences, "resumeai-default-model").as_deref(),
            Some("claude-3-5-sonnet")
        );
    }

    #[test]
    fn unreadable_preferences_are_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not ron at all {{").unwrap();

        assert!(load_preferences(file.path()).is_empty());
        assert!(load_preferences(Path::new("/definitely/not/here.ron")).is_empty());
    }
}
