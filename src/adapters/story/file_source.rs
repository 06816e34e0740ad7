//! File-backed story source.

use std::fs;
use std::path::Path;

use crate::domain::foundation::ConfigurationError;
use crate::domain::story::TickConfiguration;

/// Reads authored story configurations from disk.
///
/// The format follows the extension: `.json`, `.yaml` or `.yml`. What
/// comes back is the raw authored configuration; it still has to pass
/// [`LoadedStory::load`] before serving traffic.
///
/// [`LoadedStory::load`]: crate::domain::story::LoadedStory::load
pub struct FileStorySource;

impl FileStorySource {
    pub fn read(path: impl AsRef<Path>) -> Result<TickConfiguration, ConfigurationError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            ConfigurationError::unreadable_story(path.display().to_string(), err.to_string())
        })?;

        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => serde_json::from_str(&raw).map_err(|err| {
                ConfigurationError::unreadable_story(path.display().to_string(), err.to_string())
            }),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw).map_err(|err| {
                ConfigurationError::unreadable_story(path.display().to_string(), err.to_string())
            }),
            _ => Err(ConfigurationError::unreadable_story(
                path.display().to_string(),
                "unsupported extension, expected .json, .yaml or .yml",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY_JSON: &str = r##"{
        "storyId": "transfer_limit",
        "stateMachine": {
            "id": "transfer_limit",
            "initial": "intro",
            "states": {
                "intro": { "id": "intro", "on": { "check_transfer": "#goodbye" } },
                "goodbye": { "id": "goodbye", "terminal": true }
            }
        },
        "actions": [
            { "name": "intro" },
            { "name": "goodbye", "answerId": "goodbye_message" }
        ]
    }"##;

    const STORY_YAML: &str = r##"
storyId: transfer_limit
stateMachine:
  id: transfer_limit
  initial: intro
  states:
    intro:
      id: intro
      "on":
        check_transfer: "#goodbye"
    goodbye:
      id: goodbye
      terminal: true
actions:
  - name: intro
  - name: goodbye
    answerId: goodbye_message
"##;

    #[test]
    fn reads_a_json_story() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transfer_limit.json");
        fs::write(&path, STORY_JSON).unwrap();

        let config = FileStorySource::read(&path).unwrap();
        assert_eq!(config.story_id, "transfer_limit");
        assert_eq!(config.state_machine.initial.as_deref(), Some("intro"));
        assert_eq!(config.actions.len(), 2);
    }

    #[test]
    fn reads_a_yaml_story() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transfer_limit.yaml");
        fs::write(&path, STORY_YAML).unwrap();

        let config = FileStorySource::read(&path).unwrap();
        assert_eq!(config.story_id, "transfer_limit");
        assert_eq!(
            config.actions[1].answer_id.as_deref(),
            Some("goodbye_message")
        );
    }

    #[test]
    fn json_and_yaml_renditions_agree() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("story.json");
        let yaml_path = dir.path().join("story.yml");
        fs::write(&json_path, STORY_JSON).unwrap();
        fs::write(&yaml_path, STORY_YAML).unwrap();

        assert_eq!(
            FileStorySource::read(&json_path).unwrap(),
            FileStorySource::read(&yaml_path).unwrap()
        );
    }

    #[test]
    fn a_missing_file_is_an_unreadable_story() {
        let err = FileStorySource::read("/no/such/story.json").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnreadableStory { .. }));
    }

    #[test]
    fn malformed_content_is_an_unreadable_story() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileStorySource::read(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnreadableStory { .. }));
    }

    #[test]
    fn an_unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.toml");
        fs::write(&path, "storyId = 'x'").unwrap();

        let err = FileStorySource::read(&path).unwrap_err();
        match err {
            ConfigurationError::UnreadableStory { reason, .. } => {
                assert!(reason.contains("unsupported extension"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
