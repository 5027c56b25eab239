//! Wall-clock implementation of the core `Clock` port.

use chrono::{DateTime, Utc};
use payline_core::Clock;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_matches_now() {
        let clock = SystemClock;
        let before = Utc::now().date_naive();
        let today = clock.today();
        let after = Utc::now().date_naive();

        assert!(today == before || today == after);
    }
}
