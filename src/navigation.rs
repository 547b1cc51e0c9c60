//! Navigation collaborator: the current path and the browser-style history.

use std::sync::Mutex;

/// Read the current location and push new history entries.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn push_state(&self, path: &str);
}

#[derive(Debug)]
struct HistoryEntries {
    entries: Vec<String>,
    index: usize,
}

/// In-memory history stack with back/forward support.
///
/// `push_state` drops any forward entries, like a browser does. `back` and
/// `forward` only move the cursor; the host is responsible for announcing the
/// move (the popstate event) to whoever observes navigation.
#[derive(Debug)]
pub struct MemoryHistory {
    state: Mutex<HistoryEntries>,
}

impl MemoryHistory {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(HistoryEntries {
                entries: vec![initial_path.into()],
                index: 0,
            }),
        }
    }

    /// Move one entry back. Returns the new current path, or `None` at the start.
    pub fn back(&self) -> Option<String> {
        let mut state = self.state.lock().expect("history mutex poisoned");
        if state.index == 0 {
            return None;
        }
        state.index -= 1;
        Some(state.entries[state.index].clone())
    }

    /// Move one entry forward. Returns the new current path, or `None` at the end.
    pub fn forward(&self) -> Option<String> {
        let mut state = self.state.lock().expect("history mutex poisoned");
        if state.index + 1 >= state.entries.len() {
            return None;
        }
        state.index += 1;
        Some(state.entries[state.index].clone())
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("history mutex poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Navigator for MemoryHistory {
    fn current_path(&self) -> String {
        let state = self.state.lock().expect("history mutex poisoned");
        state.entries[state.index].clone()
    }

    fn push_state(&self, path: &str) {
        let mut state = self.state.lock().expect("history mutex poisoned");
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(path.to_string());
        state.index = state.entries.len() - 1;
        tracing::debug!("history push {path} (depth {})", state.entries.len());
    }
}
