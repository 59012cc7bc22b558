//! The fixed-capacity slot pool.

use crate::{GameSlot, RegistryError, SlotId};

/// Reference deployment capacity: ten concurrent sessions.
pub const DEFAULT_CAPACITY: usize = 10;

/// The ordered collection of all game slots.
///
/// Built once at startup; slots are recycled, never added or removed.
/// Assignment is first-available by ascending slot id.
#[derive(Debug)]
pub struct Registry<P> {
    slots: Vec<GameSlot<P>>,
}

impl<P> Registry<P> {
    /// Creates a pool with `capacity` idle slots, ids `1..=capacity`.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity >= 1 && capacity <= usize::from(u8::MAX),
            "capacity must fit the 1-byte wire slot id",
        );
        let slots = (1..=capacity)
            .map(|id| {
                let id = SlotId::new(id as u8).expect("nonzero id");
                GameSlot::new(id)
            })
            .collect();
        Self { slots }
    }

    /// The fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if at least one slot is idle.
    pub fn has_free_slot(&self) -> bool {
        self.slots.iter().any(GameSlot::is_idle)
    }

    /// Attaches `peer` to the first idle slot, by ascending id.
    pub fn assign(&mut self, peer: P) -> Result<SlotId, RegistryError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_idle())
            .ok_or(RegistryError::Full { capacity })?;
        slot.attach(peer);
        tracing::info!(slot = %slot.id(), "peer assigned");
        Ok(slot.id())
    }

    /// The slot named by `id`.
    pub fn get(&self, id: SlotId) -> Result<&GameSlot<P>, RegistryError> {
        self.slots
            .get(id.index())
            .ok_or(RegistryError::UnknownSlot(id))
    }

    /// Mutable access to the slot named by `id`.
    pub fn get_mut(
        &mut self,
        id: SlotId,
    ) -> Result<&mut GameSlot<P>, RegistryError> {
        self.slots
            .get_mut(id.index())
            .ok_or(RegistryError::UnknownSlot(id))
    }

    /// Recycles a slot, dropping its peer handle (which closes a live
    /// connection). No-op detach if the slot was already idle.
    pub fn reset(&mut self, id: SlotId) -> Result<(), RegistryError> {
        let slot = self.get_mut(id)?;
        if slot.reset().is_some() {
            tracing::info!(slot = %id, "slot reset for a new peer");
        }
        Ok(())
    }

    /// Iterates the occupied slots in ascending id order.
    ///
    /// This is the set the event loop waits on; the ascending order is
    /// also the within-iteration service order across sessions.
    pub fn occupied(&self) -> impl Iterator<Item = (SlotId, &P)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.peer().map(|peer| (slot.id(), peer)))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Phase;
    use trigrid_game::{Cell, Mark};

    #[test]
    fn test_assignment_is_first_free_ascending() {
        let mut registry: Registry<&str> = Registry::new(3);
        assert_eq!(registry.assign("a").unwrap().as_u8(), 1);
        assert_eq!(registry.assign("b").unwrap().as_u8(), 2);
        assert_eq!(registry.assign("c").unwrap().as_u8(), 3);
    }

    #[test]
    fn test_full_pool_rejects_assignment() {
        let mut registry: Registry<u32> = Registry::new(2);
        registry.assign(1).unwrap();
        registry.assign(2).unwrap();
        assert_eq!(
            registry.assign(3),
            Err(RegistryError::Full { capacity: 2 }),
        );
        // The pool itself is unchanged.
        assert_eq!(registry.occupied().count(), 2);
    }

    #[test]
    fn test_reset_recycles_lowest_slot_first() {
        let mut registry: Registry<u32> = Registry::new(3);
        let first = registry.assign(10).unwrap();
        registry.assign(20).unwrap();
        registry.assign(30).unwrap();

        registry.reset(first).unwrap();
        // The next assignment reuses slot 1, not a new identity.
        assert_eq!(registry.assign(40).unwrap(), first);
    }

    #[test]
    fn test_reset_clears_game_and_phase() {
        let mut registry: Registry<u32> = Registry::new(1);
        let id = registry.assign(7).unwrap();

        let slot = registry.get_mut(id).unwrap();
        slot.phase = Phase::InProgress;
        slot.game.apply(Cell::new(5).unwrap(), Mark::X);

        registry.reset(id).unwrap();
        let slot = registry.get(id).unwrap();
        assert!(slot.is_idle());
        assert_eq!(slot.phase, Phase::Idle);
        assert!(slot.game.board().is_empty(Cell::new(5).unwrap()));
    }

    #[test]
    fn test_occupied_iterates_ascending() {
        let mut registry: Registry<&str> = Registry::new(4);
        let a = registry.assign("a").unwrap();
        let b = registry.assign("b").unwrap();
        let c = registry.assign("c").unwrap();
        registry.reset(b).unwrap();

        let ids: Vec<SlotId> =
            registry.occupied().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_unknown_slot_is_an_error() {
        let registry: Registry<u32> = Registry::new(2);
        let bogus = SlotId::new(9).unwrap();
        assert_eq!(
            registry.get(bogus).err(),
            Some(RegistryError::UnknownSlot(bogus)),
        );
    }
}
