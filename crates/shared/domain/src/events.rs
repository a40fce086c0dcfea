use crate::constants::{CREATED, DELETED, UPDATED, WILDCARD};
use bitflags::bitflags;

bitflags! {
    /// Standard event types an entity emits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct EventTypeSet: u8 {
        const CREATED = 1 << 0;
        const UPDATED = 1 << 1;
        const DELETED = 1 << 2;

        const ALL = Self::CREATED.bits() | Self::UPDATED.bits() | Self::DELETED.bits();
    }
}

const NAMED: [(EventTypeSet, &str); 3] = [
    (EventTypeSet::CREATED, CREATED),
    (EventTypeSet::UPDATED, UPDATED),
    (EventTypeSet::DELETED, DELETED),
];

impl EventTypeSet {
    /// Canonical segment names of the contained types, in created/updated/deleted order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        NAMED.into_iter().filter(move |(flag, _)| self.contains(*flag)).map(|(_, name)| name)
    }
}

impl From<&str> for EventTypeSet {
    fn from(segment: &str) -> Self {
        match segment {
            CREATED => Self::CREATED,
            UPDATED => Self::UPDATED,
            DELETED => Self::DELETED,
            WILDCARD => Self::ALL,
            _ => Self::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_expands_in_canonical_order() {
        let names: Vec<_> = EventTypeSet::from("*").names().collect();
        assert_eq!(names, ["created", "updated", "deleted"]);
    }

    #[test]
    fn unknown_segment_is_empty() {
        assert!(EventTypeSet::from("archived").is_empty());
        assert_eq!(EventTypeSet::from("updated").names().collect::<Vec<_>>(), ["updated"]);
    }
}
