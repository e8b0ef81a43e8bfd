use crossbeam_channel::Receiver;

/// Requests sent from the window to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Stop,
}

pub struct Controls {
    receiver: Receiver<Control>,
    has_stopped: bool,
}

impl Controls {
    pub fn new(receiver: Receiver<Control>) -> Self {
        Self {
            receiver,
            has_stopped: false,
        }
    }

    pub fn receiver(&self) -> &Receiver<Control> {
        &self.receiver
    }

    /// `None` means the window dropped its sender, which counts as a stop.
    pub fn handle(&mut self, control: Option<Control>) {
        match control {
            Some(Control::Stop) | None => self.has_stopped = true,
        }
    }

    pub fn has_stopped(&self) -> bool {
        self.has_stopped
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    #[test]
    fn stop_is_recorded() {
        let (sender, receiver) = unbounded();
        let mut controls = Controls::new(receiver);
        assert!(!controls.has_stopped());

        sender.send(Control::Stop).unwrap();
        let control = controls.receiver().recv().ok();
        controls.handle(control);
        assert!(controls.has_stopped());
    }

    #[test]
    fn disconnect_counts_as_stop() {
        let (sender, receiver) = unbounded::<Control>();
        let mut controls = Controls::new(receiver);
        drop(sender);

        let control = controls.receiver().recv().ok();
        assert_eq!(control, None);
        controls.handle(control);
        assert!(controls.has_stopped());
    }
}
