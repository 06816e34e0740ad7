//! Load-time validation of authored stories.

mod story_validation;

pub use story_validation::StoryValidation;
