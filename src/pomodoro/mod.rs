use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{select, tick};
use log::info;
use uuid::Uuid;

use self::{
    clock::CountdownClock,
    control::Controls,
    display::ClockDisplay,
    update::{Notifier, PomodoroUpdate, UpdateQueue},
};

pub mod clock;
pub mod control;
pub mod display;
pub mod error;
pub mod settings;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pomodoro {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Expired,
    Stopped,
}

/// One run of the countdown, from start to expiry or stop.
pub struct Session<N> {
    pomodoro: Pomodoro,
    clock: CountdownClock,
    period: Duration,
    display: ClockDisplay,
    controls: Controls,
    notifier: N,
}

impl<N: Notifier + 'static> Session<N> {
    pub fn new(
        pomodoro: Pomodoro,
        clock: CountdownClock,
        period: Duration,
        display: ClockDisplay,
        controls: Controls,
        notifier: N,
    ) -> Self {
        Self {
            pomodoro,
            clock,
            period,
            display,
            controls,
            notifier,
        }
    }

    /// Counts down until the clock runs out or a stop arrives.
    ///
    /// Updates go through an [`UpdateQueue`] so a slow server never holds up a tick.
    /// Returns once both updates have been delivered or have failed.
    pub fn run(mut self) -> SessionOutcome {
        info!("Starting pomodoro {} with {}", self.pomodoro.id, self.clock);
        let updates = UpdateQueue::spawn(self.notifier);
        updates.push(PomodoroUpdate::started(&self.pomodoro, Utc::now()));

        let ticker = tick(self.period);
        let controls = self.controls.receiver().clone();
        let outcome = loop {
            select! {
                recv(ticker) -> _ => {
                    if self.clock.tick() {
                        self.display.show(&self.clock);
                    } else {
                        info!("Pomodoro {} ended", self.pomodoro.id);
                        self.display.expired();
                        break SessionOutcome::Expired;
                    }
                }
                recv(controls) -> control => {
                    self.controls.handle(control.ok());
                    if self.controls.has_stopped() {
                        info!("Pomodoro {} stopped at {}", self.pomodoro.id, self.clock);
                        break SessionOutcome::Stopped;
                    }
                }
            }
        };

        self.display.finished(outcome);
        updates.push(PomodoroUpdate::ended(&self.pomodoro, Utc::now()));
        updates.finish();
        outcome
    }
}
