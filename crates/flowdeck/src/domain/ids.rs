//! Typed identifiers for every entity kind.
//!
//! Each entity carries a UUID v4 wrapped in its own newtype so a `CycleId`
//! can never be passed where an `IssueId` is expected.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shortest id prefix accepted by [`resolve_prefix`].
pub const MIN_ID_PREFIX_LEN: usize = 4;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidId(s.to_string()))
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Project`](super::Project).
    ProjectId
);
entity_id!(
    /// Identifier of an [`IssueLabel`](super::IssueLabel).
    LabelId
);
entity_id!(
    /// Identifier of an [`Issue`](super::Issue).
    IssueId
);
entity_id!(
    /// Identifier of a [`Comment`](super::Comment).
    CommentId
);
entity_id!(
    /// Identifier of a [`Cycle`](super::Cycle).
    CycleId
);
entity_id!(
    /// Identifier of an [`AiTrackingEvent`](super::AiTrackingEvent).
    EventId
);
entity_id!(
    /// Identifier of a [`ContextSnapshot`](super::ContextSnapshot).
    SnapshotId
);

/// The kinds of entity held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A project
    Project,
    /// An issue label
    Label,
    /// An issue
    Issue,
    /// A comment on an issue
    Comment,
    /// A development cycle
    Cycle,
    /// An AI tracking event
    AiEvent,
    /// A context snapshot
    ContextSnapshot,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Project => "Project",
            Self::Label => "Label",
            Self::Issue => "Issue",
            Self::Comment => "Comment",
            Self::Cycle => "Cycle",
            Self::AiEvent => "AI event",
            Self::ContextSnapshot => "Context snapshot",
        };
        f.write_str(name)
    }
}

/// Resolve a full UUID or a unique hex prefix against a set of known ids.
///
/// Returns `Ok(None)` when nothing matches so the caller can report
/// `NotFound` with its own entity kind.
///
/// # Errors
///
/// - [`ValidationError::IdPrefixTooShort`] for prefixes under
///   [`MIN_ID_PREFIX_LEN`] characters
/// - [`ValidationError::AmbiguousId`] when more than one id matches
pub fn resolve_prefix<I, T>(
    kind: EntityKind,
    input: &str,
    ids: I,
) -> Result<Option<T>, ValidationError>
where
    I: IntoIterator<Item = T>,
    T: fmt::Display + Copy,
{
    let needle = input.trim().to_ascii_lowercase();
    if needle.len() < MIN_ID_PREFIX_LEN {
        return Err(ValidationError::IdPrefixTooShort(input.to_string()));
    }

    let mut matches = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle));
    let Some(first) = matches.next() else {
        return Ok(None);
    };
    let extra = matches.count();
    if extra > 0 {
        return Err(ValidationError::AmbiguousId {
            kind,
            prefix: input.to_string(),
            count: extra + 1,
        });
    }
    Ok(Some(first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> IssueId {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display_roundtrip_lowercase() {
        let text = "8f14e45f-ceea-4e7a-9b1c-2f8d3c5a6b7e";
        assert_eq!(id(text).to_string(), text);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<IssueId>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidId(_)));
    }

    #[test]
    fn resolve_unique_prefix() {
        let a = id("aaaa1111-0000-4000-8000-000000000000");
        let b = id("bbbb2222-0000-4000-8000-000000000000");

        let found = resolve_prefix(EntityKind::Issue, "AAAA1", [a, b]).unwrap();
        assert_eq!(found, Some(a));
    }

    #[test]
    fn resolve_ambiguous_prefix() {
        let a = id("abcd1111-0000-4000-8000-000000000000");
        let b = id("abcd2222-0000-4000-8000-000000000000");

        let err = resolve_prefix(EntityKind::Issue, "abcd", [a, b]).unwrap_err();
        assert!(matches!(err, ValidationError::AmbiguousId { count: 2, .. }));
    }

    #[test]
    fn resolve_short_prefix_rejected() {
        let err = resolve_prefix::<_, IssueId>(EntityKind::Issue, "ab", []).unwrap_err();
        assert!(matches!(err, ValidationError::IdPrefixTooShort(_)));
    }

    #[test]
    fn resolve_no_match() {
        let a = id("abcd1111-0000-4000-8000-000000000000");
        assert_eq!(resolve_prefix(EntityKind::Issue, "ffff", [a]).unwrap(), None);
    }
}
