//! Step scheduling, kept free of engine state so it can be checked in isolation.

/// Step delay after applying dash (halves) and slow (x1.5). Both compose.
pub fn effective_delay(base: u32, dash: bool, slow: bool) -> f64 {
    let mut delay = f64::from(base);
    if dash {
        delay /= 2.0;
    }
    if slow {
        delay *= 1.5;
    }
    delay
}

/// A step is due once strictly more than `delay` has passed since the last one.
///
/// Overshoot is not carried: the caller resets the last-move time to `now`, so a
/// long stall still yields a single step.
pub fn step_due(now: f64, last_move: f64, delay: f64) -> bool {
    now - last_move > delay
}
