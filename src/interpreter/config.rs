use std::time::Duration;

/// Which key transition resolves an `Fx0A` wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyWaitEdge {
    /// Key goes from down to up.
    #[default]
    Release,
    /// Key goes from up to down.
    Press,
}

impl KeyWaitEdge {
    pub(crate) fn fires(self, before: bool, now: bool) -> bool {
        match self {
            KeyWaitEdge::Release => before && !now,
            KeyWaitEdge::Press => !before && now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickMode {
    #[default]
    Normal,
    /// Log every decoded instruction and the register bank.
    Traced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Cycles per second. Timers decay once per cycle.
    pub clock_freq: u32,
    pub key_wait_edge: KeyWaitEdge,
    pub tick_mode: TickMode,
    /// Fixed seed for the `Cxkk` generator, entropy when `None`.
    pub seed: Option<u64>,
}

impl Config {
    pub fn clock_speed(&self) -> Duration {
        Duration::from_secs_f64(1_f64 / self.clock_freq.max(1) as f64)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clock_freq: 60,
            key_wait_edge: KeyWaitEdge::default(),
            tick_mode: TickMode::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_edge_fires_on_key_up() {
        assert!(KeyWaitEdge::Release.fires(true, false));
        assert!(!KeyWaitEdge::Release.fires(false, true));
        assert!(!KeyWaitEdge::Release.fires(true, true));
    }

    #[test]
    fn press_edge_fires_on_key_down() {
        assert!(KeyWaitEdge::Press.fires(false, true));
        assert!(!KeyWaitEdge::Press.fires(true, false));
        assert!(!KeyWaitEdge::Press.fires(false, false));
    }

    #[test]
    fn clock_speed_is_period() {
        let config = Config {
            clock_freq: 4,
            ..Config::default()
        };
        assert_eq!(config.clock_speed(), Duration::from_millis(250));
    }
}
