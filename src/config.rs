/// When the delay and sound timers count down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    /// Both timers drop by one at the end of every executed cycle.
    #[default]
    PerCycle,
    /// Timers only move when the host calls `Emulator::tick_timers`, usually at 60Hz.
    External,
}

/// How 8XY7 computes VF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorrowFlag {
    /// VF = 1 whenever VY - VX is non-zero. Matches older interpreters built on this core.
    #[default]
    Legacy,
    /// VF = 1 when VY >= VX (no borrow).
    Canonical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub timer_mode: TimerMode,
    pub borrow_flag: BorrowFlag,
    // None seeds CXKK from OS entropy
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}
