use serde_json::Value;
use std::collections::BTreeSet;

use super::types::{ClusterAssignment, GroupingOutcome, InvalidGrouping};

/// Checks a raw model response against the `{"groups": [[i, ...], ...]}` schema.
///
/// Any structural problem rejects the whole response. A well-formed grouping
/// is kept as returned, including articles the model left in no group.
pub fn validate_groups(raw: &str, article_count: usize) -> GroupingOutcome {
    match parse_groups(raw, article_count) {
        Ok(groups) => GroupingOutcome::Valid(ClusterAssignment::from_groups(groups)),
        Err(reason) => GroupingOutcome::Invalid(reason),
    }
}

fn parse_groups(raw: &str, article_count: usize) -> Result<Vec<Vec<usize>>, InvalidGrouping> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| InvalidGrouping::MalformedJson(e.to_string()))?;

    let object = value.as_object().ok_or(InvalidGrouping::NotAnObject)?;
    let candidates = object
        .get("groups")
        .ok_or(InvalidGrouping::MissingGroups)?
        .as_array()
        .ok_or(InvalidGrouping::GroupsNotArray)?;

    let mut seen = BTreeSet::new();
    let mut groups = Vec::with_capacity(candidates.len());

    for (group_idx, candidate) in candidates.iter().enumerate() {
        let members = candidate
            .as_array()
            .ok_or(InvalidGrouping::GroupNotArray { group: group_idx })?;
        if members.is_empty() {
            return Err(InvalidGrouping::EmptyGroup { group: group_idx });
        }

        let mut group = Vec::with_capacity(members.len());
        for member in members {
            let index = member
                .as_u64()
                .ok_or(InvalidGrouping::NonIntegerIndex { group: group_idx })?;
            if index >= article_count as u64 {
                return Err(InvalidGrouping::IndexOutOfRange {
                    group: group_idx,
                    index,
                });
            }
            let index = index as usize;
            if !seen.insert(index) {
                return Err(InvalidGrouping::DuplicateIndex { index });
            }
            group.push(index);
        }
        groups.push(group);
    }

    if groups.is_empty() {
        return Err(InvalidGrouping::NoGroups);
    }

    Ok(groups)
}
