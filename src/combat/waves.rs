//! Wave membership registry.

use bevy::prelude::*;
use smallvec::SmallVec;

/// A wave of enemies. Members register at spawn and deregister on death;
/// once the member set empties the wave counts as cleared and the scenario
/// progression moves on.
#[derive(Component, Debug, Clone)]
pub struct Wave {
    /// 1-based spawn order of this wave within the scenario
    pub index: u32,
    /// Difficulty copied into each member at spawn
    pub difficulty: i32,
    members: SmallVec<[Entity; 8]>,
}

impl Wave {
    pub fn new(index: u32, difficulty: i32) -> Self {
        Self {
            index,
            difficulty,
            members: SmallVec::new(),
        }
    }

    /// Adds an entity to the member set. Registering a current member again
    /// is a no-op.
    pub fn register(&mut self, entity: Entity) {
        if !self.contains(entity) {
            self.members.push(entity);
        }
    }

    /// Removes an entity from the member set. Returns false when the entity
    /// was not a member; callers surface that as a lifecycle violation.
    pub fn deregister(&mut self, entity: Entity) -> bool {
        match self.members.iter().position(|&member| member == entity) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.members.iter().any(|&member| member == entity)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// True once every member has deregistered.
    pub fn is_cleared(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_register_and_deregister() {
        let mut wave = Wave::new(1, 3);
        wave.register(entity(10));
        wave.register(entity(11));
        assert_eq!(wave.member_count(), 2);
        assert!(wave.contains(entity(10)));

        assert!(wave.deregister(entity(10)));
        assert_eq!(wave.member_count(), 1);
        assert!(!wave.contains(entity(10)));
    }

    #[test]
    fn test_register_twice_keeps_single_entry() {
        let mut wave = Wave::new(1, 0);
        wave.register(entity(5));
        wave.register(entity(5));
        assert_eq!(wave.member_count(), 1);
    }

    #[test]
    fn test_deregister_non_member_returns_false() {
        let mut wave = Wave::new(2, 1);
        wave.register(entity(7));
        assert!(!wave.deregister(entity(8)), "unknown entity must be reported");
        assert_eq!(wave.member_count(), 1, "member set must be untouched");
    }

    #[test]
    fn test_cleared_when_last_member_leaves() {
        let mut wave = Wave::new(1, 2);
        assert!(wave.is_cleared(), "a wave with no members counts as cleared");
        wave.register(entity(1));
        assert!(!wave.is_cleared());
        wave.deregister(entity(1));
        assert!(wave.is_cleared());
    }
}
