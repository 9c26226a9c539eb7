use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an ID from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from an empty string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID from any string-like value.
            ///
            /// Seed data and persisted records go through here unchecked; use
            /// `str::parse` for user input.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Lesson
    LessonId
);
string_id!(
    /// Identifier of a quiz question, unique within its lesson
    QuestionId
);
string_id!(
    /// Identifier of a quiz option, unique within its question
    OptionId
);
string_id!(
    /// Unique identifier for a Project
    ProjectId
);
string_id!(
    /// Unique identifier for a Resource
    ResourceId
);
string_id!(
    /// Unique identifier for a User
    UserId
);

impl UserId {
    /// Generates an identifier for a user registered on this device.
    #[must_use]
    pub fn generate_local() -> Self {
        Self(format!("local-{}", uuid::Uuid::new_v4().simple()))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display() {
        let id = LessonId::new("lesson-waste-1");
        assert_eq!(id.to_string(), "lesson-waste-1");
    }

    #[test]
    fn project_id_from_str_trims() {
        let id: ProjectId = "  project-compost ".parse().unwrap();
        assert_eq!(id, ProjectId::new("project-compost"));
    }

    #[test]
    fn id_from_str_rejects_blank() {
        assert!("   ".parse::<ResourceId>().is_err());
        assert!("".parse::<LessonId>().is_err());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&LessonId::new("l-1")).unwrap();
        assert_eq!(json, "\"l-1\"");
    }

    #[test]
    fn generated_user_ids_are_local_and_distinct() {
        let a = UserId::generate_local();
        let b = UserId::generate_local();
        assert!(a.as_str().starts_with("local-"));
        assert_ne!(a, b);
    }
}
