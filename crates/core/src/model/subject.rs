use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Label of the wildcard topic entry.
pub const ALL_TOPICS_LABEL: &str = "All Topics";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("unknown subject: {0}")]
    Unknown(String),
}

/// Top level of the two-level question categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Subject {
    #[default]
    Biology,
    Physics,
    Chemistry,
}

/// One entry of the topic selector. The wildcard has an empty `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicOption {
    pub label: &'static str,
    pub value: &'static str,
}

impl TopicOption {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.value.is_empty()
    }
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Biology, Subject::Physics, Subject::Chemistry];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Biology => "Biology",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
        }
    }

    /// Static topic table for the subject, in display order.
    #[must_use]
    pub fn topics(self) -> &'static [&'static str] {
        match self {
            Subject::Biology => &[
                "Cell Biology",
                "Organisation",
                "Infection & Response",
                "Bioenergetics",
            ],
            Subject::Physics => &["Forces", "Energy", "Waves", "Electricity"],
            Subject::Chemistry => &[
                "Atomic Structure",
                "Bonding",
                "Quantitative Chemistry",
                "Chemical Changes",
            ],
        }
    }

    /// Options for the topic selector: the wildcard first, then the topic table.
    #[must_use]
    pub fn topic_options(self) -> Vec<TopicOption> {
        std::iter::once(TopicOption {
            label: ALL_TOPICS_LABEL,
            value: "",
        })
        .chain(self.topics().iter().map(|topic| TopicOption {
            label: topic,
            value: topic,
        }))
        .collect()
    }

    /// Whether `topic` belongs to this subject's table.
    #[must_use]
    pub fn has_topic(self, topic: &str) -> bool {
        self.topics().contains(&topic)
    }
}

impl FromStr for Subject {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SubjectError::Unknown(s.to_owned()))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
