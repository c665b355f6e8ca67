//! Path segment parsing.

use serde::Serialize;

/// Type of a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "name", rename_all = "camelCase")]
pub enum SegmentKind {
    /// Static path segment (e.g., "users", "api")
    Static,
    /// Named capture (e.g., "{id}", "{userId}")
    Param(String),
    /// Greedy capture matching the rest of the path (e.g., "{proxy+}")
    Greedy(String),
}

impl SegmentKind {
    /// Classifies a single, already trimmed segment.
    #[must_use]
    pub fn of(segment: &str) -> Self {
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(inner) => match inner.strip_suffix('+') {
                Some(name) => Self::Greedy(name.to_string()),
                None => Self::Param(inner.to_string()),
            },
            None => Self::Static,
        }
    }

    /// Returns the capture name, if this is a capture segment.
    #[must_use]
    pub fn capture_name(&self) -> Option<&str> {
        match self {
            Self::Static => None,
            Self::Param(name) | Self::Greedy(name) => Some(name),
        }
    }

    /// Returns `true` for `{name}` and `{name+}` segments.
    #[must_use]
    pub fn is_capture(&self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// Splits a path into trimmed, non-empty segments.
///
/// `/a//b/` and `a/b` yield the same segments; an empty path yields none.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a path into segments with their kinds.
#[must_use]
pub fn parse_path(path: &str) -> Vec<(String, SegmentKind)> {
    split_path(path)
        .map(|s| (s.to_string(), SegmentKind::of(s)))
        .collect()
}

/// Returns the names of all captures in a path, in order.
#[must_use]
pub fn path_params(path: &str) -> Vec<String> {
    split_path(path)
        .filter_map(|s| SegmentKind::of(s).capture_name().map(str::to_string))
        .collect()
}
