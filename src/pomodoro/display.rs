use crossbeam_channel::Sender;
use log::debug;

use super::{clock::CountdownClock, SessionOutcome};

pub struct ClockDisplay {
    sender: Sender<DisplayInstruction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayInstruction {
    Show(CountdownClock),
    Expired,
    Finished(SessionOutcome),
}

impl ClockDisplay {
    pub fn new(sender: Sender<DisplayInstruction>) -> Self {
        Self { sender }
    }

    pub fn show(&self, clock: &CountdownClock) {
        self.send(DisplayInstruction::Show(*clock));
    }

    pub fn expired(&self) {
        self.send(DisplayInstruction::Expired);
    }

    pub fn finished(&self, outcome: SessionOutcome) {
        self.send(DisplayInstruction::Finished(outcome));
    }

    fn send(&self, instruction: DisplayInstruction) {
        // The window may already be closed.
        if self.sender.send(instruction).is_err() {
            debug!("Display gone, dropping {:?}", instruction);
        }
    }
}
