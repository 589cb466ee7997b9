//! In-memory engine for unit tests: serves a fixed snapshot, records commands
//! and fails on demand.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{AuthError, Engine, EngineError, Session, TransportError};
use crate::item::{EngineState, Item, ItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Pause(Vec<ItemId>),
    Resume(Vec<ItemId>),
}

#[derive(Debug, Default)]
pub(crate) struct Script {
    pub items: Vec<Item>,
    /// Popped by each `verify_web_ui`; empty means success.
    pub login_failures: VecDeque<AuthError>,
    pub list_failures: VecDeque<TransportError>,
    pub command_failures: VecDeque<EngineError>,
    /// Apply pause/resume to `items` so later ticks observe them.
    pub apply_commands: bool,
    pub logins: usize,
    pub calls: Vec<Call>,
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedEngine {
    script: Arc<Mutex<Script>>,
}

impl ScriptedEngine {
    pub fn with_items(items: Vec<Item>) -> Self {
        let engine = Self::default();
        engine.script().items = items;
        engine
    }

    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    fn command(&self, call: Call) -> Result<(), EngineError> {
        let mut s = self.script();
        if let Some(e) = s.command_failures.pop_front() {
            return Err(e);
        }
        if s.apply_commands {
            let (ids, state) = match &call {
                Call::Pause(ids) => (ids.clone(), EngineState::PausedDownloading),
                Call::Resume(ids) => (ids.clone(), EngineState::Other("queuedDL".to_string())),
            };
            for item in s.items.iter_mut().filter(|i| ids.contains(&i.id)) {
                item.state = state.clone();
            }
        }
        s.calls.push(call);
        Ok(())
    }
}

impl Engine for ScriptedEngine {
    fn host(&self) -> &str {
        "scripted:0"
    }

    fn verify_web_ui(&self) -> Result<(), AuthError> {
        match self.script().login_failures.pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn authenticate(&self) -> Result<Session, AuthError> {
        let mut s = self.script();
        s.logins += 1;
        Ok(Session::new(Some(format!("SID=sid-{}", s.logins))))
    }

    fn version(&self, _session: &Session) -> Result<String, TransportError> {
        Ok("v4.6.0".to_string())
    }

    fn list_items(&self, _session: &Session) -> Result<Vec<Item>, TransportError> {
        let mut s = self.script();
        if let Some(e) = s.list_failures.pop_front() {
            return Err(e);
        }
        Ok(s.items.clone())
    }

    fn pause(&self, _session: &Session, ids: &[ItemId]) -> Result<(), EngineError> {
        self.command(Call::Pause(ids.to_vec()))
    }

    fn resume(&self, _session: &Session, ids: &[ItemId]) -> Result<(), EngineError> {
        self.command(Call::Resume(ids.to_vec()))
    }
}

/// Test item with a recognizable hash.
pub(crate) fn item(hash: &str, progress: f64, added_at: i64, state: &str) -> Item {
    Item {
        id: ItemId::new(hash),
        added_at,
        progress,
        size_bytes: 1 << 20,
        state: EngineState::parse(state),
    }
}
