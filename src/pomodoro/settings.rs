use std::time::Duration;

use clap::Parser;
use uuid::Uuid;

use super::clock::{CountdownClock, TICK_PERIOD};

#[derive(Debug, Clone, Parser)]
#[command(name = "pomodoro", about = "Countdown timer for pomodoro work intervals")]
pub struct Settings {
    /// Initial hours on the clock
    #[arg(long, default_value_t = 0)]
    pub hours: u32,

    /// Initial minutes on the clock
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(0..=59))]
    pub minutes: u32,

    /// Initial seconds on the clock
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=59))]
    pub seconds: u32,

    /// Name reported with every update
    #[arg(long, default_value = "Pomodoro")]
    pub name: String,

    /// Id the server assigned to this pomodoro
    #[arg(long)]
    pub id: Uuid,

    /// Base URL of the server receiving updates
    #[arg(long, default_value = "http://localhost:8080")]
    pub server: String,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long, requires = "user")]
    pub password: Option<String>,

    /// Timeout for each update request
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, default_value_t = TICK_PERIOD.as_millis() as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_millis: u64,
}

impl Settings {
    pub fn initial_clock(&self) -> CountdownClock {
        CountdownClock::new(self.hours, self.minutes, self.seconds)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn credentials(&self) -> Option<(String, Option<String>)> {
        self.user
            .clone()
            .map(|user| (user, self.password.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn defaults() {
        let settings = Settings::try_parse_from(["pomodoro", "--id", ID]).unwrap();
        assert_eq!(settings.initial_clock(), CountdownClock::new(0, 25, 0));
        assert_eq!(settings.name, "Pomodoro");
        assert_eq!(settings.id.to_string(), ID);
        assert_eq!(settings.server, "http://localhost:8080");
        assert_eq!(settings.credentials(), None);
        assert_eq!(settings.timeout(), Duration::from_secs(10));
        assert_eq!(settings.tick_period(), Duration::from_secs(1));
    }

    #[test]
    fn parses_flags() {
        let settings = Settings::try_parse_from([
            "pomodoro",
            "--hours",
            "1",
            "--minutes",
            "30",
            "--seconds",
            "15",
            "--id",
            ID,
            "--user",
            "bob",
            "--password",
            "123",
        ])
        .unwrap();

        assert_eq!(settings.initial_clock().to_string(), "01:30:15");
        assert_eq!(
            settings.credentials(),
            Some(("bob".to_owned(), Some("123".to_owned())))
        );
    }

    #[test]
    fn id_is_required() {
        assert!(Settings::try_parse_from(["pomodoro"]).is_err());
        assert!(Settings::try_parse_from(["pomodoro", "--id", "not-a-uuid"]).is_err());
    }

    #[test]
    fn rejects_minutes_past_59() {
        assert!(Settings::try_parse_from(["pomodoro", "--id", ID, "--minutes", "60"]).is_err());
        assert!(Settings::try_parse_from(["pomodoro", "--id", ID, "--seconds", "75"]).is_err());
    }

    #[test]
    fn password_needs_user() {
        assert!(Settings::try_parse_from(["pomodoro", "--id", ID, "--password", "123"]).is_err());
    }

    #[test]
    fn rejects_zero_tick_period() {
        assert!(Settings::try_parse_from(["pomodoro", "--id", ID, "--tick-millis", "0"]).is_err());
    }
}
