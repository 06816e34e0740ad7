//! Story-level engine knobs.

use serde::{Deserialize, Serialize};

/// How many consecutive unresolved turns a story tolerates before it
/// forces the exit action of the pending question.
pub const DEFAULT_REPETITION_LIMIT: u32 = 2;

/// Tunable settings of a story, with sensible authored-content defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickStorySettings {
    /// Unknown-intent retry tolerance. The fallback answer is repeated up
    /// to this many times; the next unresolved turn escalates.
    #[serde(default = "default_repetition_limit")]
    pub repetition_limit: u32,
}

fn default_repetition_limit() -> u32 {
    DEFAULT_REPETITION_LIMIT
}

impl Default for TickStorySettings {
    fn default() -> Self {
        Self {
            repetition_limit: DEFAULT_REPETITION_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_repetition_limit_is_two() {
        assert_eq!(TickStorySettings::default().repetition_limit, 2);
    }

    #[test]
    fn missing_field_falls_back_to_default() {
        let settings: TickStorySettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, TickStorySettings::default());
    }

    #[test]
    fn explicit_value_overrides_default() {
        let settings: TickStorySettings =
            serde_json::from_str(r#"{"repetitionLimit":5}"#).unwrap();
        assert_eq!(settings.repetition_limit, 5);
    }
}
