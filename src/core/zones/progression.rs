//=========================================================================
// Zone Progression
//=========================================================================
//
// Session-wide unlock state for every zone. The single source of truth
// for barriers and gating UI; owned by `GlobalContext` and passed by
// reference rather than reached through a global.
//
// Each zone's flag is a one-way latch. Ordering between zones is not
// enforced here: the briefing decides which zone unlocks next.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::events::ZoneUnlocked;
use super::ZoneId;
use crate::core::message_bus::MessageBus;

//=== ZoneProgression =====================================================

/// Result of an unlock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    AlreadyUnlocked,
    /// Zone id outside `1..=zone_count`.
    UnknownZone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneProgression {
    unlocked: Vec<bool>,
}

impl ZoneProgression {
    /// All zones locked except `initially_unlocked`.
    ///
    /// The initial unlock is not published on the bus; the session
    /// announces it when it starts.
    pub fn new(zone_count: u8, initially_unlocked: Option<ZoneId>) -> Self {
        let mut unlocked = vec![false; usize::from(zone_count)];
        if let Some(slot) = initially_unlocked
            .and_then(ZoneId::index)
            .and_then(|index| unlocked.get_mut(index))
        {
            *slot = true;
        }
        Self { unlocked }
    }

    /// Unlocks `zone`. Publishes [`ZoneUnlocked`] only on the first call
    /// for that zone.
    pub fn unlock_zone(&mut self, zone: ZoneId, bus: &mut MessageBus) -> UnlockOutcome {
        let Some(slot) = zone.index().and_then(|index| self.unlocked.get_mut(index)) else {
            warn!("Unlock requested for unknown {}", zone);
            return UnlockOutcome::UnknownZone;
        };
        if *slot {
            debug!("{} already unlocked", zone);
            return UnlockOutcome::AlreadyUnlocked;
        }

        *slot = true;
        info!("{} unlocked", zone);
        bus.push(ZoneUnlocked { zone });
        UnlockOutcome::Unlocked
    }

    /// Pure query; false for unknown zones.
    pub fn is_unlocked(&self, zone: ZoneId) -> bool {
        zone.index()
            .and_then(|index| self.unlocked.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn unlocked_zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.unlocked
            .iter()
            .enumerate()
            .filter(|(_, unlocked)| **unlocked)
            .filter_map(|(index, _)| u8::try_from(index + 1).ok().map(ZoneId))
    }

    pub fn zone_count(&self) -> usize {
        self.unlocked.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_zone_starts_unlocked() {
        let progression = ZoneProgression::new(2, Some(ZoneId(1)));
        assert!(progression.is_unlocked(ZoneId(1)));
        assert!(!progression.is_unlocked(ZoneId(2)));
    }

    #[test]
    fn unlock_is_permanent_and_idempotent() {
        let mut progression = ZoneProgression::new(2, Some(ZoneId(1)));
        let mut bus = MessageBus::new();

        assert!(!progression.is_unlocked(ZoneId(2)));
        assert_eq!(progression.unlock_zone(ZoneId(2), &mut bus), UnlockOutcome::Unlocked);
        for _ in 0..3 {
            assert_eq!(
                progression.unlock_zone(ZoneId(2), &mut bus),
                UnlockOutcome::AlreadyUnlocked
            );
            assert!(progression.is_unlocked(ZoneId(2)));
        }
        assert_eq!(bus.read::<ZoneUnlocked>(), &[ZoneUnlocked { zone: ZoneId(2) }]);
    }

    #[test]
    fn initial_zone_is_not_republished() {
        let mut progression = ZoneProgression::new(3, Some(ZoneId(1)));
        let mut bus = MessageBus::new();
        assert_eq!(
            progression.unlock_zone(ZoneId(1), &mut bus),
            UnlockOutcome::AlreadyUnlocked
        );
        assert!(!bus.has_messages::<ZoneUnlocked>());
    }

    #[test]
    fn ordering_is_not_enforced() {
        let mut progression = ZoneProgression::new(5, Some(ZoneId(1)));
        let mut bus = MessageBus::new();
        assert_eq!(progression.unlock_zone(ZoneId(5), &mut bus), UnlockOutcome::Unlocked);
        assert!(!progression.is_unlocked(ZoneId(2)));
        let unlocked: Vec<_> = progression.unlocked_zones().collect();
        assert_eq!(unlocked, vec![ZoneId(1), ZoneId(5)]);
    }

    #[test]
    fn out_of_range_zones_are_rejected() {
        let mut progression = ZoneProgression::new(2, None);
        let mut bus = MessageBus::new();
        assert_eq!(progression.unlock_zone(ZoneId(0), &mut bus), UnlockOutcome::UnknownZone);
        assert_eq!(progression.unlock_zone(ZoneId(3), &mut bus), UnlockOutcome::UnknownZone);
        assert!(!progression.is_unlocked(ZoneId(0)));
        assert!(!progression.is_unlocked(ZoneId(3)));
        assert_eq!(bus.total(), 0);
    }
}
