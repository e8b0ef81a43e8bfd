use std::{
    io::Write,
    mem,
    thread::{self, JoinHandle},
    time::Duration,
};

use clap::Parser;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::{
    egui::{self, Align2, Button, RichText, TextEdit},
    epaint::Color32,
};
use log::{debug, error, warn};

use pomodoro_timer::pomodoro::{
    clock::CountdownClock,
    control::{Control, Controls},
    display::{ClockDisplay, DisplayInstruction},
    settings::Settings,
    update::{HttpNotifier, Notifier},
    Pomodoro, Session, SessionOutcome,
};

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<(), eframe::Error> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let settings = Settings::parse();
    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(360.0, 220.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Pomodoro",
        options,
        Box::new(|_cc| Box::new(PomodoroApp::new(settings))),
    )
}

struct RunningSession {
    controls: Sender<Control>,
    display_receiver: Receiver<DisplayInstruction>,
    handle: JoinHandle<SessionOutcome>,
}

impl RunningSession {
    fn stop(&self) {
        if self.controls.send(Control::Stop).is_err() {
            debug!("Session already finished");
        }
    }

    fn join(self) {
        match self.handle.join() {
            Ok(outcome) => debug!("Session thread done: {:?}", outcome),
            Err(_) => error!("Session thread panicked"),
        }
    }
}

enum Phase {
    Idle,
    Running(RunningSession),
    Finished(SessionOutcome),
}

struct PomodoroApp {
    settings: Settings,
    pomodoro: Pomodoro,
    face: CountdownClock,
    phase: Phase,
    finishing: Option<RunningSession>,
    alert: bool,
    error: Option<String>,
}

impl PomodoroApp {
    fn new(settings: Settings) -> Self {
        let pomodoro = Pomodoro {
            id: settings.id,
            name: settings.name.clone(),
        };
        let face = settings.initial_clock();
        Self {
            settings,
            pomodoro,
            face,
            phase: Phase::Idle,
            finishing: None,
            alert: false,
            error: None,
        }
    }

    fn start(&mut self) {
        let notifier = match HttpNotifier::new(
            &self.settings.server,
            self.settings.timeout(),
            self.settings.credentials(),
        ) {
            Ok(notifier) => notifier,
            Err(err) => {
                error!("Unable to create update client: {}", err);
                self.error = Some(err.to_string());
                return;
            }
        };

        debug!("Reporting updates to {}", notifier.url());

        self.face = self.settings.initial_clock();
        self.phase = Phase::Running(self.spawn_session(notifier));
    }

    fn spawn_session<N: Notifier + 'static>(&self, notifier: N) -> RunningSession {
        let (display_sender, display_receiver) = unbounded();
        let (control_sender, control_receiver) = unbounded();
        let session = Session::new(
            self.pomodoro.clone(),
            self.settings.initial_clock(),
            self.settings.tick_period(),
            ClockDisplay::new(display_sender),
            Controls::new(control_receiver),
            notifier,
        );
        let handle = thread::spawn(move || session.run());

        RunningSession {
            controls: control_sender,
            display_receiver,
            handle,
        }
    }

    fn stop(&mut self) {
        if let Phase::Running(session) = &self.phase {
            session.stop();
        }
    }

    fn process_display(&mut self) {
        let Phase::Running(session) = &self.phase else {
            return;
        };

        let mut finished = None;
        while let Ok(instruction) = session.display_receiver.try_recv() {
            match instruction {
                DisplayInstruction::Show(clock) => self.face = clock,
                DisplayInstruction::Expired => {
                    self.alert = true;
                    ring_bell();
                }
                DisplayInstruction::Finished(outcome) => finished = Some(outcome),
            }
        }

        // The session thread may still be delivering its last update.
        if let Some(outcome) = finished {
            if let Phase::Running(session) = mem::replace(&mut self.phase, Phase::Finished(outcome))
            {
                self.finishing = Some(session);
            }
        }
    }

    /// Stops a running session and waits for its updates to go out.
    fn shut_down(&mut self) {
        if let Phase::Running(session) = mem::replace(&mut self.phase, Phase::Idle) {
            warn!("Window closed while pomodoro {} was running", self.pomodoro.id);
            session.stop();
            session.join();
        }
        if let Some(session) = self.finishing.take() {
            session.join();
        }
    }
}

impl eframe::App for PomodoroApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.process_display();

        let idle = matches!(self.phase, Phase::Idle);
        let running = matches!(self.phase, Phase::Running(_));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.add_enabled(idle, TextEdit::singleline(&mut self.pomodoro.name));
            });
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(self.face.to_string()).monospace().size(56.0));
            });
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(idle, Button::new("Start")).clicked() {
                    self.start();
                }
                if ui.add_enabled(running, Button::new("Stop")).clicked() {
                    self.stop();
                }
                if let Phase::Finished(outcome) = self.phase {
                    ui.label(match outcome {
                        SessionOutcome::Expired => "Done",
                        SessionOutcome::Stopped => "Stopped",
                    });
                    if ui.button("Close").clicked() {
                        frame.close();
                    }
                }
            });
            if let Some(error) = &self.error {
                ui.colored_label(Color32::RED, error);
            }
        });

        if self.alert {
            egui::Window::new("Pomodoro ended")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label("Pomodoro ended");
                    if ui.button("OK").clicked() {
                        self.alert = false;
                    }
                });
        }

        if matches!(self.phase, Phase::Running(_)) {
            ctx.request_repaint_after(REPAINT_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shut_down();
    }
}

fn ring_bell() {
    let mut stdout = std::io::stdout();
    if let Err(err) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        debug!("Unable to ring bell: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Instant,
    };

    use pomodoro_timer::pomodoro::{error::NotifyError, update::PomodoroUpdate};

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        updates: Arc<Mutex<Vec<PomodoroUpdate>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, update: &PomodoroUpdate) -> Result<(), NotifyError> {
            self.updates.lock().unwrap().push(update.clone());
            Ok(())
        }
    }

    fn app() -> PomodoroApp {
        let settings = Settings::try_parse_from([
            "pomodoro",
            "--id",
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "--tick-millis",
            "3600000",
        ])
        .unwrap();
        PomodoroApp::new(settings)
    }

    #[test]
    fn exit_stops_running_session_and_reports_end() {
        let mut app = app();
        let notifier = RecordingNotifier::default();
        app.phase = Phase::Running(app.spawn_session(notifier.clone()));

        app.shut_down();

        assert!(matches!(app.phase, Phase::Idle));
        let updates = notifier.updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert!(updates[0].started.is_some());
        assert!(updates[1].ended.is_some());
    }

    #[test]
    fn finished_session_is_joined_on_exit() {
        let mut app = app();
        let notifier = RecordingNotifier::default();
        app.phase = Phase::Running(app.spawn_session(notifier.clone()));
        app.stop();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !matches!(app.phase, Phase::Finished(_)) {
            assert!(Instant::now() < deadline);
            app.process_display();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(app.finishing.is_some());

        app.shut_down();

        assert!(app.finishing.is_none());
        assert!(matches!(app.phase, Phase::Finished(SessionOutcome::Stopped)));
        assert_eq!(notifier.updates.lock().unwrap().len(), 2);
    }
}
