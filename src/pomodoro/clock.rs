use std::{fmt::Display, time::Duration};

/// Remaining time of a countdown, kept as separate hours, minutes and seconds.
///
/// Minutes and seconds are expected to be in `0..=59`. The clock does not check
/// this; whoever initializes it is responsible for the range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownClock {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

impl CountdownClock {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        let mut clock = Self::default();
        clock.initialize(hours, minutes, seconds);
        clock
    }

    pub fn initialize(&mut self, hours: u32, minutes: u32, seconds: u32) {
        self.hours = hours;
        self.minutes = minutes;
        self.seconds = seconds;
    }

    /// Takes one second off, borrowing from minutes and then hours.
    ///
    /// Returns `false` and leaves the clock untouched once it reads `00:00:00`.
    pub fn tick(&mut self) -> bool {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        } else {
            return false;
        }
        true
    }

    pub fn is_expired(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn remaining(&self) -> Duration {
        let minutes = u64::from(self.hours) * 60 + u64::from(self.minutes);
        Duration::from_secs(minutes * 60 + u64::from(self.seconds))
    }
}

impl From<Duration> for CountdownClock {
    fn from(duration: Duration) -> Self {
        let total = duration.as_secs();
        let hours = u32::try_from(total / 3600).unwrap_or(u32::MAX);
        let minutes = ((total / 60) % 60) as u32;
        let seconds = (total % 60) as u32;
        Self::new(hours, minutes, seconds)
    }
}

impl Display for CountdownClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
