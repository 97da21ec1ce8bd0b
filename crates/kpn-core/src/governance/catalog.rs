//! In-memory view of the seeded jurisdiction tree and seat catalog
//!
//! Both are loaded once at startup and never change afterwards, so every
//! lookup here is a plain map access.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::entities::{Jurisdiction, Member, Seat};
use crate::error::DomainError;
use crate::value_objects::{Level, Rung, Snowflake, Tier};

use super::resolver::Position;

// ============================================================================
// Jurisdiction Tree
// ============================================================================

/// State ⊃ Zone ⊃ LGA ⊃ Ward
#[derive(Debug, Clone)]
pub struct JurisdictionTree {
    nodes: HashMap<Snowflake, Jurisdiction>,
    children: HashMap<Snowflake, Vec<Snowflake>>,
    root: Snowflake,
}

impl JurisdictionTree {
    /// Build the tree, checking that every node hangs from a node exactly
    /// one level above it and that there is a single STATE root
    pub fn build(nodes: Vec<Jurisdiction>) -> Result<Self, DomainError> {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            if let Some(dup) = by_id.insert(node.id, node) {
                return Err(DomainError::InvalidHierarchy(format!(
                    "duplicate jurisdiction id {}",
                    dup.id
                )));
            }
        }

        let mut root = None;
        let mut children: HashMap<Snowflake, Vec<Snowflake>> = HashMap::new();
        for node in by_id.values() {
            match (node.parent_id, node.level.parent()) {
                (None, None) => {
                    if root.replace(node.id).is_some() {
                        return Err(DomainError::InvalidHierarchy(
                            "more than one STATE root".into(),
                        ));
                    }
                }
                (Some(parent_id), Some(expected)) => {
                    let parent = by_id.get(&parent_id).ok_or_else(|| {
                        DomainError::InvalidHierarchy(format!(
                            "{} {} points at missing parent {parent_id}",
                            node.level, node.id
                        ))
                    })?;
                    if parent.level != expected {
                        return Err(DomainError::InvalidHierarchy(format!(
                            "{} {} must hang from a {expected}, found {}",
                            node.level, node.id, parent.level
                        )));
                    }
                    children.entry(parent_id).or_default().push(node.id);
                }
                (None, Some(_)) => {
                    return Err(DomainError::InvalidHierarchy(format!(
                        "{} {} has no parent",
                        node.level, node.id
                    )))
                }
                (Some(_), None) => {
                    return Err(DomainError::InvalidHierarchy(format!(
                        "STATE {} cannot have a parent",
                        node.id
                    )))
                }
            }
        }

        let root = root.ok_or_else(|| DomainError::InvalidHierarchy("no STATE root".into()))?;
        for list in children.values_mut() {
            list.sort();
        }

        Ok(Self {
            nodes: by_id,
            children,
            root,
        })
    }

    pub fn get(&self, id: Snowflake) -> Result<&Jurisdiction, DomainError> {
        self.nodes
            .get(&id)
            .ok_or(DomainError::JurisdictionNotFound(id))
    }

    #[inline]
    pub fn contains(&self, id: Snowflake) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn root(&self) -> &Jurisdiction {
        &self.nodes[&self.root]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: Snowflake) -> Result<Vec<&Jurisdiction>, DomainError> {
        self.get(id)?;
        Ok(self
            .children
            .get(&id)
            .map(|ids| ids.iter().map(|child| &self.nodes[child]).collect())
            .unwrap_or_default())
    }

    /// Ancestors of `id`, root first, excluding the node itself
    pub fn ancestors(&self, id: Snowflake) -> Result<Vec<&Jurisdiction>, DomainError> {
        let mut chain = Vec::new();
        let mut cursor = self.get(id)?.parent_id;
        while let Some(parent_id) = cursor {
            let parent = self.get(parent_id)?;
            chain.push(parent);
            cursor = parent.parent_id;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Every node below `id`, breadth first
    pub fn descendants(&self, id: Snowflake) -> Result<Vec<&Jurisdiction>, DomainError> {
        self.get(id)?;
        let mut found = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for child in self.children.get(&current).into_iter().flatten() {
                found.push(&self.nodes[child]);
                queue.push_back(*child);
            }
        }
        Ok(found)
    }

    /// `a` is `b` or one of its ancestors
    pub fn same_or_ancestor(&self, a: Snowflake, b: Snowflake) -> Result<bool, DomainError> {
        self.get(a)?;
        let mut cursor = Some(b);
        while let Some(id) = cursor {
            if id == a {
                return Ok(true);
            }
            cursor = self.get(id)?.parent_id;
        }
        Ok(false)
    }

    /// The node at `level` on the path from `id` to the root, `id` included
    pub fn ancestor_at(&self, id: Snowflake, level: Level) -> Result<Option<&Jurisdiction>, DomainError> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get(current)?;
            if node.level == level {
                return Ok(Some(node));
            }
            cursor = node.parent_id;
        }
        Ok(None)
    }

    pub fn at_level(&self, level: Level) -> Vec<&Jurisdiction> {
        let mut nodes: Vec<_> = self.nodes.values().filter(|n| n.level == level).collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }
}

// ============================================================================
// Seat Catalog
// ============================================================================

#[derive(Debug, Clone)]
pub struct SeatCatalog {
    seats: HashMap<Snowflake, Seat>,
    top: Snowflake,
    publisher: Option<Snowflake>,
}

impl SeatCatalog {
    pub fn build(seats: Vec<Seat>) -> Result<Self, DomainError> {
        let mut titles = HashSet::new();
        let mut top = None;
        let mut publisher = None;
        let mut by_id = HashMap::with_capacity(seats.len());

        for seat in seats {
            if !titles.insert((seat.tier, seat.title.clone())) {
                return Err(DomainError::InvalidHierarchy(format!(
                    "duplicate {} seat title {:?}",
                    seat.tier, seat.title
                )));
            }
            if seat.tier == Tier::General {
                return Err(DomainError::InvalidHierarchy(format!(
                    "seat {:?} cannot belong to the GENERAL tier",
                    seat.title
                )));
            }
            if seat.is_top() && top.replace(seat.id).is_some() {
                return Err(DomainError::InvalidHierarchy("more than one top seat".into()));
            }
            if seat.is_publisher() && publisher.replace(seat.id).is_some() {
                return Err(DomainError::InvalidHierarchy(
                    "more than one publisher seat".into(),
                ));
            }
            if by_id.insert(seat.id, seat).is_some() {
                return Err(DomainError::InvalidHierarchy("duplicate seat id".into()));
            }
        }

        let top = top.ok_or_else(|| DomainError::InvalidHierarchy("no top seat".into()))?;
        if by_id[&top].tier != Tier::State {
            return Err(DomainError::InvalidHierarchy(
                "the top seat must be a STATE seat".into(),
            ));
        }

        Ok(Self {
            seats: by_id,
            top,
            publisher,
        })
    }

    pub fn seat(&self, id: Snowflake) -> Result<&Seat, DomainError> {
        self.seats.get(&id).ok_or(DomainError::SeatNotFound(id))
    }

    pub fn top_seat(&self) -> &Seat {
        &self.seats[&self.top]
    }

    pub fn publisher_seat(&self) -> Option<&Seat> {
        self.publisher.map(|id| &self.seats[&id])
    }

    /// Seat that receives reports addressed to `level`
    pub fn coordinator_seat(&self, level: Level) -> Option<&Seat> {
        let tier = level.seat_tier();
        self.seats
            .values()
            .filter(|s| s.tier == tier && s.is_coordinator())
            .min_by_key(|s| s.seat_number)
    }

    pub fn seats_at(&self, tier: Tier) -> Vec<&Seat> {
        let mut seats: Vec<_> = self.seats.values().filter(|s| s.tier == tier).collect();
        seats.sort_by_key(|s| s.seat_number);
        seats
    }

    pub fn all(&self) -> Vec<&Seat> {
        let mut seats: Vec<_> = self.seats.values().collect();
        seats.sort_by_key(|s| (s.tier, s.seat_number));
        seats
    }

    #[inline]
    pub fn is_top(&self, seat_id: Snowflake) -> bool {
        seat_id == self.top
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Tree plus seats, with the binding rules that need both
#[derive(Debug, Clone)]
pub struct Catalog {
    pub tree: JurisdictionTree,
    pub seats: SeatCatalog,
}

impl Catalog {
    pub fn build(jurisdictions: Vec<Jurisdiction>, seats: Vec<Seat>) -> Result<Self, DomainError> {
        Ok(Self {
            tree: JurisdictionTree::build(jurisdictions)?,
            seats: SeatCatalog::build(seats)?,
        })
    }

    /// Check that `seat_id` may be held at `jurisdiction_id` by a member of
    /// tier `requested`
    ///
    /// ZONAL, LGA and WARD seats need a node at their own level. STATE seats
    /// are state-wide when no jurisdiction is given and may otherwise be
    /// scoped to any existing node.
    pub fn validate_binding(
        &self,
        requested: Tier,
        seat_id: Snowflake,
        jurisdiction_id: Option<Snowflake>,
    ) -> Result<&Seat, DomainError> {
        let seat = self.seats.seat(seat_id)?;
        if seat.tier != requested {
            return Err(DomainError::TierMismatch {
                seat_tier: seat.tier,
                requested,
            });
        }

        match (seat.tier.seat_level(), jurisdiction_id) {
            (Some(level), Some(id)) => {
                let node = self.tree.get(id)?;
                if node.level != level {
                    return Err(DomainError::JurisdictionRequired {
                        tier: seat.tier,
                        level,
                    });
                }
            }
            (Some(level), None) => {
                return Err(DomainError::JurisdictionRequired {
                    tier: seat.tier,
                    level,
                })
            }
            (None, Some(id)) => {
                self.tree.get(id)?;
            }
            (None, None) => {}
        }
        Ok(seat)
    }

    /// Authority a member currently carries
    ///
    /// Only APPROVED members rank above GENERAL; the top seat outranks every
    /// STATE executive.
    pub fn position_of(&self, member: &Member) -> Position {
        let holds_top = member.seat_id.is_some_and(|id| self.seats.is_top(id));
        let rung = if member.is_approved() {
            Rung::from_tier(member.role_tier, holds_top)
        } else {
            Rung::General
        };
        Position {
            member_id: member.id,
            rung,
            jurisdiction_id: member.jurisdiction_id,
            protected: self.is_protected(member),
        }
    }

    /// Member sits in a protected seat
    pub fn is_protected(&self, member: &Member) -> bool {
        member
            .seat_id
            .and_then(|id| self.seats.seat(id).ok())
            .is_some_and(Seat::is_protected)
    }

    #[inline]
    pub fn holds_top_seat(&self, member: &Member) -> bool {
        member.is_approved() && member.seat_id.is_some_and(|id| self.seats.is_top(id))
    }

    /// Approved holder of the publisher seat or of the top seat
    pub fn can_publish(&self, member: &Member) -> bool {
        if !member.is_approved() {
            return false;
        }
        member.seat_id.is_some_and(|id| {
            self.seats.is_top(id) || self.seats.publisher_seat().is_some_and(|p| p.id == id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;
    use crate::value_objects::{ApprovalStatus, SeatFlags};

    fn j(id: i64, level: Level, parent: Option<i64>) -> Jurisdiction {
        Jurisdiction::new(Snowflake::new(id), level, format!("{level}-{id}"), parent.map(Snowflake::new))
    }

    /// 1 ⊃ {10 ⊃ {100 ⊃ {1000, 1001}}, 11 ⊃ {110 ⊃ {1100}}}
    fn small_tree() -> JurisdictionTree {
        JurisdictionTree::build(vec![
            j(1, Level::State, None),
            j(10, Level::Zone, Some(1)),
            j(11, Level::Zone, Some(1)),
            j(100, Level::Lga, Some(10)),
            j(110, Level::Lga, Some(11)),
            j(1000, Level::Ward, Some(100)),
            j(1001, Level::Ward, Some(100)),
            j(1100, Level::Ward, Some(110)),
        ])
        .unwrap()
    }

    #[test]
    fn test_ancestors_are_root_first() {
        let tree = small_tree();
        let ids: Vec<i64> = tree
            .ancestors(Snowflake::new(1000))
            .unwrap()
            .iter()
            .map(|n| n.id.into_inner())
            .collect();
        assert_eq!(ids, vec![1, 10, 100]);
        assert!(tree.ancestors(Snowflake::new(1)).unwrap().is_empty());
    }

    #[test]
    fn test_descendants_and_children() {
        let tree = small_tree();
        assert_eq!(tree.descendants(Snowflake::new(10)).unwrap().len(), 3);
        assert_eq!(tree.descendants(Snowflake::new(1)).unwrap().len(), 7);
        assert!(tree.descendants(Snowflake::new(1000)).unwrap().is_empty());
        assert_eq!(tree.children(Snowflake::new(1)).unwrap().len(), 2);
    }

    #[test]
    fn test_same_or_ancestor() {
        let tree = small_tree();
        let id = Snowflake::new;
        assert!(tree.same_or_ancestor(id(100), id(1001)).unwrap());
        assert!(tree.same_or_ancestor(id(1000), id(1000)).unwrap());
        assert!(tree.same_or_ancestor(id(1), id(1100)).unwrap());
        assert!(!tree.same_or_ancestor(id(10), id(1100)).unwrap());
        assert!(!tree.same_or_ancestor(id(1000), id(100)).unwrap());
    }

    #[test]
    fn test_ancestor_at() {
        let tree = small_tree();
        let zone = tree.ancestor_at(Snowflake::new(1001), Level::Zone).unwrap();
        assert_eq!(zone.map(|n| n.id), Some(Snowflake::new(10)));
        let itself = tree.ancestor_at(Snowflake::new(100), Level::Lga).unwrap();
        assert_eq!(itself.map(|n| n.id), Some(Snowflake::new(100)));
        assert!(tree.ancestor_at(Snowflake::new(10), Level::Ward).unwrap().is_none());
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let tree = small_tree();
        let missing = Snowflake::new(9);
        assert!(matches!(tree.get(missing), Err(DomainError::JurisdictionNotFound(_))));
        assert!(tree.ancestors(missing).is_err());
        assert!(tree.descendants(missing).is_err());
        assert!(tree.same_or_ancestor(missing, Snowflake::new(1)).is_err());
    }

    #[test]
    fn test_build_rejects_wrong_parent_level() {
        let result = JurisdictionTree::build(vec![
            j(1, Level::State, None),
            j(10, Level::Zone, Some(1)),
            j(1000, Level::Ward, Some(10)),
        ]);
        assert!(matches!(result, Err(DomainError::InvalidHierarchy(_))));

        let result = JurisdictionTree::build(vec![j(1, Level::State, None), j(2, Level::State, None)]);
        assert!(result.is_err());
    }

    fn seeded() -> Catalog {
        let seed = SeedData::kebbi();
        Catalog::build(seed.jurisdictions, seed.seats).unwrap()
    }

    #[test]
    fn test_seed_builds() {
        let catalog = seeded();
        assert_eq!(catalog.tree.root().name, "Kebbi State");
        assert!(catalog.seats.top_seat().is_protected());
        assert_eq!(
            catalog.seats.coordinator_seat(Level::Lga).map(|s| s.title.as_str()),
            Some("LGA Coordinator")
        );
        assert_eq!(
            catalog.seats.coordinator_seat(Level::State).map(|s| s.title.as_str()),
            Some("President")
        );
        assert!(catalog.seats.publisher_seat().is_some());
    }

    #[test]
    fn test_validate_binding() {
        let catalog = seeded();
        let ward_seat = catalog.seats.seats_at(Tier::Ward)[0].id;
        let ward = catalog.tree.at_level(Level::Ward)[0].id;
        let lga = catalog.tree.at_level(Level::Lga)[0].id;

        assert!(catalog.validate_binding(Tier::Ward, ward_seat, Some(ward)).is_ok());
        assert!(matches!(
            catalog.validate_binding(Tier::Lga, ward_seat, Some(ward)),
            Err(DomainError::TierMismatch { .. })
        ));
        assert!(matches!(
            catalog.validate_binding(Tier::Ward, ward_seat, Some(lga)),
            Err(DomainError::JurisdictionRequired { .. })
        ));
        assert!(matches!(
            catalog.validate_binding(Tier::Ward, ward_seat, None),
            Err(DomainError::JurisdictionRequired { .. })
        ));

        let state_seat = catalog.seats.seats_at(Tier::State)[1].id;
        assert!(catalog.validate_binding(Tier::State, state_seat, None).is_ok());
        assert!(catalog.validate_binding(Tier::State, state_seat, Some(lga)).is_ok());
    }

    #[test]
    fn test_position_of_requires_approval() {
        let catalog = seeded();
        let top = catalog.seats.top_seat().id;
        let mut president = Member::new(Snowflake::new(1), "P", Tier::State, None).with_seat(top);
        assert_eq!(catalog.position_of(&president).rung, Rung::General);

        president.set_status(ApprovalStatus::Approved);
        let position = catalog.position_of(&president);
        assert_eq!(position.rung, Rung::Top);
        assert!(position.protected);
    }

    #[test]
    fn test_catalog_rejects_two_top_seats() {
        let seats = vec![
            Seat::new(Snowflake::new(1), Tier::State, 1, "A").with_flags(SeatFlags::TOP),
            Seat::new(Snowflake::new(2), Tier::State, 2, "B").with_flags(SeatFlags::TOP),
        ];
        assert!(SeatCatalog::build(seats).is_err());
    }
}
