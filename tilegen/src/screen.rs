use anyhow::{ensure, Context, Result};
use hashbrown::HashMap;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use tilegen_game::{util::sorted_hashmap_iter, ScreenIdx, MAX_ACTIVE_SCREENS, SCREEN_COUNT};

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum ScreenStatus {
    #[default]
    Unallocated = 0x00,
    Allocated = 0x01,
    /// Mirrors another screen's memory; holds no memory of its own.
    Linked = 0xFB,
    Blocked = 0xFE,
    Disabled = 0xFF,
}

impl ScreenStatus {
    pub fn is_disabled(self) -> bool {
        matches!(self, ScreenStatus::Blocked | ScreenStatus::Disabled)
    }
}

/// Screen allocation state and the screen-link alias table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenMemory {
    status: [ScreenStatus; SCREEN_COUNT],
    links: HashMap<ScreenIdx, ScreenIdx>, // link screen -> screen it mirrors
}

impl Default for ScreenMemory {
    fn default() -> Self {
        ScreenMemory {
            status: [ScreenStatus::Unallocated; SCREEN_COUNT],
            links: HashMap::new(),
        }
    }
}

impl ScreenMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        ensure!(
            raw.len() == SCREEN_COUNT,
            "expected {SCREEN_COUNT} screen entries, got {}",
            raw.len()
        );
        let mut screens = ScreenMemory::new();
        for (i, &value) in raw.iter().enumerate() {
            screens.status[i] = ScreenStatus::try_from(value)
                .with_context(|| format!("screen {i:#04x}: invalid status {value:#04x}"))?;
        }
        Ok(screens)
    }

    pub fn raw_status(&self) -> [u8; SCREEN_COUNT] {
        self.status.map(u8::from)
    }

    pub fn status(&self, screen: ScreenIdx) -> ScreenStatus {
        self.status[screen as usize % SCREEN_COUNT]
    }

    pub fn statuses(&self) -> &[ScreenStatus; SCREEN_COUNT] {
        &self.status
    }

    /// Mark a screen as holding tiles. Never downgrades a linked or disabled
    /// screen.
    pub fn allocate(&mut self, screen: ScreenIdx) {
        let entry = &mut self.status[screen as usize % SCREEN_COUNT];
        if *entry == ScreenStatus::Unallocated {
            *entry = ScreenStatus::Allocated;
        }
    }

    pub fn disable(&mut self, screen: ScreenIdx, status: ScreenStatus) {
        debug_assert!(status.is_disabled());
        self.status[screen as usize % SCREEN_COUNT] = status;
    }

    /// Make `link` mirror `current`. A later link from the same screen
    /// replaces the earlier one.
    pub fn link(&mut self, link: ScreenIdx, current: ScreenIdx) {
        let entry = &mut self.status[link as usize % SCREEN_COUNT];
        if !entry.is_disabled() {
            *entry = ScreenStatus::Linked;
        }
        self.links.insert(link, current);
    }

    pub fn link_target(&self, screen: ScreenIdx) -> Option<ScreenIdx> {
        self.links.get(&screen).copied()
    }

    /// Screen whose memory `screen` shows once chained links are followed.
    pub fn resolve(&self, screen: ScreenIdx) -> ScreenIdx {
        let mut target = screen;
        for _ in 0..SCREEN_COUNT {
            match self.link_target(target) {
                Some(next) => target = next,
                None => break,
            }
        }
        target
    }

    /// Whether linking `link` to `current` would leave some screen mirroring
    /// itself.
    pub fn forms_cycle(&self, link: ScreenIdx, current: ScreenIdx) -> bool {
        let mut screen = current;
        for _ in 0..SCREEN_COUNT {
            if screen == link {
                return true;
            }
            match self.link_target(screen) {
                Some(next) => screen = next,
                None => return false,
            }
        }
        true
    }

    pub fn links(&self) -> impl Iterator<Item = (ScreenIdx, ScreenIdx)> + '_ {
        sorted_hashmap_iter(&self.links).map(|(&link, &current)| (link, current))
    }

    /// Screens that consume screen memory.
    pub fn active_count(&self) -> usize {
        self.status
            .iter()
            .filter(|&&s| s == ScreenStatus::Allocated)
            .count()
    }

    pub fn exceeds_limit(&self) -> bool {
        self.active_count() > MAX_ACTIVE_SCREENS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_monotonic() {
        let mut screens = ScreenMemory::new();
        screens.allocate(0x21);
        assert_eq!(screens.status(0x21), ScreenStatus::Allocated);
        screens.allocate(0x21);
        assert_eq!(screens.status(0x21), ScreenStatus::Allocated);

        screens.disable(0x21, ScreenStatus::Blocked);
        screens.allocate(0x21);
        assert_eq!(screens.status(0x21), ScreenStatus::Blocked);
        assert_eq!(screens.active_count(), 0);
    }

    #[test]
    fn test_links_are_excluded_from_count() {
        let mut screens = ScreenMemory::new();
        screens.allocate(0x10);
        screens.allocate(0x35);
        screens.link(0x35, 0x10);
        screens.allocate(0x35);
        assert_eq!(screens.status(0x35), ScreenStatus::Linked);
        assert_eq!(screens.link_target(0x35), Some(0x10));
        assert_eq!(screens.active_count(), 1);
        assert_eq!(screens.links().collect::<Vec<_>>(), vec![(0x35, 0x10)]);
    }

    #[test]
    fn test_chained_links_resolve_to_the_end() {
        let mut screens = ScreenMemory::new();
        screens.link(0x35, 0x20);
        screens.link(0x10, 0x35);
        assert_eq!(screens.link_target(0x10), Some(0x35));
        assert_eq!(screens.resolve(0x10), 0x20);
        assert_eq!(screens.resolve(0x35), 0x20);
        assert_eq!(screens.resolve(0x20), 0x20);

        assert!(screens.forms_cycle(0x20, 0x10));
        assert!(screens.forms_cycle(0x35, 0x35));
        assert!(!screens.forms_cycle(0x40, 0x10));
        // Relinking an existing link screen elsewhere is fine.
        assert!(!screens.forms_cycle(0x35, 0x21));
    }

    #[test]
    fn test_limit() {
        let mut screens = ScreenMemory::new();
        for s in 0..MAX_ACTIVE_SCREENS as u8 {
            screens.allocate(s);
        }
        assert!(!screens.exceeds_limit());
        screens.allocate(0x7F);
        assert!(screens.exceeds_limit());
    }

    #[test]
    fn test_raw_round_trip() {
        let mut screens = ScreenMemory::new();
        screens.allocate(1);
        screens.link(2, 1);
        screens.disable(3, ScreenStatus::Disabled);
        let raw = screens.raw_status();
        assert_eq!(&raw[..4], &[0x00, 0x01, 0xFB, 0xFF]);
        let restored = ScreenMemory::from_raw(&raw).unwrap();
        assert_eq!(restored.statuses(), screens.statuses());

        let mut bad = raw;
        bad[5] = 0x42;
        assert!(ScreenMemory::from_raw(&bad).is_err());
    }
}
