//! Lifecycle events emitted while a project is being created
//!
//! Observers implement `EventSink`; the pipeline emits the same events whether or not
//! anything is listening.

use std::fmt;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// Named progress marker for each pipeline state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreationEvent {
    Creating,
    FetchRemotePreset,
    GitInit,
    PluginsInstall,
    InvokingGenerators,
    DepsInstall,
    CompletionHooks,
    Done,
}

impl CreationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationEvent::Creating => "creating",
            CreationEvent::FetchRemotePreset => "fetch-remote-preset",
            CreationEvent::GitInit => "git-init",
            CreationEvent::PluginsInstall => "plugins-install",
            CreationEvent::InvokingGenerators => "invoking-generators",
            CreationEvent::DepsInstall => "deps-install",
            CreationEvent::CompletionHooks => "completion-hooks",
            CreationEvent::Done => "done",
        }
    }
}

impl fmt::Display for CreationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receiver of lifecycle events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CreationEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: CreationEvent) {}
}

/// Forwards events into a channel; a closed receiver is ignored
impl EventSink for UnboundedSender<CreationEvent> {
    fn emit(&self, event: CreationEvent) {
        let _ = self.send(event);
    }
}

/// Keeps every event in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CreationEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CreationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: CreationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
