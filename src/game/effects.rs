//! Timed power-up effects.
//!
//! Each effect is an [`EffectTimer`]: an active flag plus the ticks remaining.
//! Shield and magnet count down every tick and switch off when the count hits
//! zero; dash and slow only count down while active.

use super::state::PowerUpKind;

/// How a timer advances each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Decrement whenever time remains, regardless of the flag
    Always,
    /// Decrement only while the flag is set
    WhileActive,
}

impl Countdown {
    pub fn for_kind(kind: PowerUpKind) -> Self {
        match kind {
            PowerUpKind::Shield | PowerUpKind::Magnet => Countdown::Always,
            PowerUpKind::Dash | PowerUpKind::Slow => Countdown::WhileActive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectTimer {
    active: bool,
    remaining: u32,
}

impl EffectTimer {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Switch on for `duration` ticks. Re-activation restarts the full duration.
    pub fn activate(&mut self, duration: u32) {
        self.active = true;
        self.remaining = duration;
    }

    pub fn tick(&mut self, policy: Countdown) {
        match policy {
            Countdown::Always => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.active = false;
                }
            }
            Countdown::WhileActive => {
                if self.active {
                    self.remaining = self.remaining.saturating_sub(1);
                    if self.remaining == 0 {
                        self.active = false;
                    }
                }
            }
        }
    }
}

/// One timer per power-up kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    shield: EffectTimer,
    magnet: EffectTimer,
    dash: EffectTimer,
    slow: EffectTimer,
}

impl Effects {
    pub fn get(&self, kind: PowerUpKind) -> &EffectTimer {
        match kind {
            PowerUpKind::Shield => &self.shield,
            PowerUpKind::Magnet => &self.magnet,
            PowerUpKind::Dash => &self.dash,
            PowerUpKind::Slow => &self.slow,
        }
    }

    fn get_mut(&mut self, kind: PowerUpKind) -> &mut EffectTimer {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::Magnet => &mut self.magnet,
            PowerUpKind::Dash => &mut self.dash,
            PowerUpKind::Slow => &mut self.slow,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.get(kind).is_active()
    }

    pub fn activate(&mut self, kind: PowerUpKind) {
        self.get_mut(kind).activate(kind.duration());
    }

    /// Advance every timer by one tick under its own policy
    pub fn tick(&mut self) {
        for kind in PowerUpKind::ALL {
            self.get_mut(kind).tick(Countdown::for_kind(kind));
        }
    }

    /// Kinds currently switched on, in display order
    pub fn active_kinds(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        PowerUpKind::ALL.into_iter().filter(|kind| self.is_active(*kind))
    }
}
