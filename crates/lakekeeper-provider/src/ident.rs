//! Composite identifier codec.
//!
//! Entities whose natural key is compound are persisted in engine state
//! under a single string joined with `/`. Splits occur on the first `/`
//! (two-part) or the first two `/` (three-part); segments themselves may
//! not contain `/`.

use crate::engine::Diagnostics;

/// A two- or three-part composite identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeId {
    parts: Vec<String>,
}

impl CompositeId {
    #[must_use]
    pub fn new2(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parts: vec![parent.into(), child.into()],
        }
    }

    #[must_use]
    pub fn new3(
        parent: impl Into<String>,
        child: impl Into<String>,
        grandchild: impl Into<String>,
    ) -> Self {
        Self {
            parts: vec![parent.into(), child.into(), grandchild.into()],
        }
    }
}

impl std::fmt::Display for CompositeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parts.join("/"))
    }
}

fn import_format_error(id: &str, expected: &str) -> Diagnostics {
    Diagnostics::error(
        "Unexpected import identifier format",
        format!("Expected `{expected}`, got `{id}`."),
    )
}

/// Split `parent/child` on the first `/`.
pub fn split_composite(id: &str, expected: &str) -> Result<(String, String), Diagnostics> {
    match id.split_once('/') {
        Some((parent, child)) if !parent.is_empty() && !child.is_empty() => {
            Ok((parent.to_string(), child.to_string()))
        }
        _ => Err(import_format_error(id, expected)),
    }
}

/// Split `parent/child/grandchild` on the first two `/`. The last
/// segment may not contain further `/`.
pub fn split_composite3(
    id: &str,
    expected: &str,
) -> Result<(String, String, String), Diagnostics> {
    let (parent, rest) = id
        .split_once('/')
        .ok_or_else(|| import_format_error(id, expected))?;
    let (child, grandchild) = rest
        .split_once('/')
        .ok_or_else(|| import_format_error(id, expected))?;
    if parent.is_empty() || child.is_empty() || grandchild.is_empty() || grandchild.contains('/') {
        return Err(import_format_error(id, expected));
    }
    Ok((
        parent.to_string(),
        child.to_string(),
        grandchild.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn two_part_round_trip() {
        let id = CompositeId::new2("project-a", "11111111-2222-3333-4444-555555555555");
        let (parent, child) = split_composite(&id.to_string(), "{project_id}/{role_id}").unwrap();
        assert_eq!(parent, "project-a");
        assert_eq!(child, "11111111-2222-3333-4444-555555555555");
    }

    #[test]
    fn three_part_round_trip() {
        let id = CompositeId::new3("p", "wh", "ns");
        let (a, b, c) =
            split_composite3(&id.to_string(), "{project_id}/{warehouse_name}/{namespace}")
                .unwrap();
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("p", "wh", "ns"));
    }

    #[test]
    fn missing_separator_is_an_import_error() {
        assert!(split_composite("no-separator", "{a}/{b}").is_err());
        assert!(split_composite3("only/one", "{a}/{b}/{c}").is_err());
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!(split_composite("/child", "{a}/{b}").is_err());
        assert!(split_composite("parent/", "{a}/{b}").is_err());
        assert!(split_composite3("a//c", "{a}/{b}/{c}").is_err());
    }

    #[test]
    fn extra_separator_in_last_segment_is_rejected() {
        assert!(split_composite3("a/b/c/d", "{a}/{b}/{c}").is_err());
    }
}
