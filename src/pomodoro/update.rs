use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Sender};
use log::{debug, error, warn};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use uuid::Uuid;

use super::{error::NotifyError, Pomodoro};

/// Progress report for one pomodoro. Exactly one of `started` and `ended` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PomodoroUpdate {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended: Option<DateTime<Utc>>,
}

impl PomodoroUpdate {
    pub fn started(pomodoro: &Pomodoro, at: DateTime<Utc>) -> Self {
        Self {
            id: pomodoro.id,
            name: pomodoro.name.clone(),
            started: Some(at),
            ended: None,
        }
    }

    pub fn ended(pomodoro: &Pomodoro, at: DateTime<Utc>) -> Self {
        Self {
            id: pomodoro.id,
            name: pomodoro.name.clone(),
            started: None,
            ended: Some(at),
        }
    }
}

pub trait Notifier: Send {
    fn notify(&self, update: &PomodoroUpdate) -> Result<(), NotifyError>;
}

/// Delivers updates on a thread of its own, in the order they were queued.
pub struct UpdateQueue {
    sender: Sender<PomodoroUpdate>,
    handle: JoinHandle<()>,
}

impl UpdateQueue {
    pub fn spawn<N: Notifier + 'static>(notifier: N) -> Self {
        let (sender, receiver) = unbounded::<PomodoroUpdate>();
        let handle = thread::spawn(move || {
            for update in receiver {
                if let Err(err) = notifier.notify(&update) {
                    warn!("Failed to report pomodoro {}: {}", update.id, err);
                }
            }
        });
        Self { sender, handle }
    }

    pub fn push(&self, update: PomodoroUpdate) {
        if self.sender.send(update).is_err() {
            error!("Update thread is gone");
        }
    }

    /// Waits until every queued update has been delivered or has failed.
    pub fn finish(self) {
        drop(self.sender);
        if self.handle.join().is_err() {
            error!("Update thread panicked");
        }
    }
}

/// Posts updates as a form to `{server}/pomodoro/update`.
pub struct HttpNotifier {
    client: Client,
    url: String,
    credentials: Option<(String, Option<String>)>,
}

impl HttpNotifier {
    pub fn new(
        server: &str,
        timeout: Duration,
        credentials: Option<(String, Option<String>)>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        let url = format!("{}/pomodoro/update", server.trim_end_matches('/'));
        Ok(Self {
            client,
            url,
            credentials,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(&self, update: &PomodoroUpdate) -> RequestBuilder {
        let builder = self.client.post(&self.url).form(update);
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, password.as_ref()),
            None => builder,
        }
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, update: &PomodoroUpdate) -> Result<(), NotifyError> {
        debug!("Sending update {:?} to {}", update, self.url);
        let response = self.request(update).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                status,
                url: self.url.clone(),
            });
        }
        debug!("Update accepted with {}", status);
        Ok(())
    }
}
