use thiserror::Error;

/// Ordered list of article-index groups, one group per story.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterAssignment {
    groups: Vec<Vec<usize>>,
}

impl ClusterAssignment {
    /// Every article in its own group, in original order.
    pub fn singletons(article_count: usize) -> Self {
        ClusterAssignment {
            groups: (0..article_count).map(|index| vec![index]).collect(),
        }
    }

    pub(crate) fn from_groups(groups: Vec<Vec<usize>>) -> Self {
        ClusterAssignment { groups }
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn is_singletons(&self) -> bool {
        self.groups
            .iter()
            .enumerate()
            .all(|(position, group)| group.len() == 1 && group[0] == position)
    }
}

/// Why a model-produced grouping was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidGrouping {
    #[error("model produced no response")]
    ModelUnavailable,
    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("response has no `groups` field")]
    MissingGroups,
    #[error("`groups` is not an array")]
    GroupsNotArray,
    #[error("group {group} is not an array")]
    GroupNotArray { group: usize },
    #[error("group {group} is empty")]
    EmptyGroup { group: usize },
    #[error("group {group} contains a non-integer index")]
    NonIntegerIndex { group: usize },
    #[error("group {group} contains out-of-range index {index}")]
    IndexOutOfRange { group: usize, index: u64 },
    #[error("index {index} appears in more than one group")]
    DuplicateIndex { index: usize },
    #[error("`groups` is empty")]
    NoGroups,
}

/// Tagged result of checking a model response against the grouping schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupingOutcome {
    Valid(ClusterAssignment),
    Invalid(InvalidGrouping),
}
