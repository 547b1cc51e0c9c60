//! A minimal page that counts button clicks.

use serde::Serialize;

use crate::accumulator::Accumulator;
use crate::bus::{Bus, EventStream};
use crate::pages::Render;

pub const PAGE_TITLE: &str = "Unistack";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClickState {
    pub clicks: u64,
}

pub fn apply_click(state: &ClickState, _click: ()) -> ClickState {
    ClickState {
        clicks: state.clicks + 1,
    }
}

pub struct CounterPage {
    clicked: Bus<()>,
}

impl Default for CounterPage {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterPage {
    pub fn new() -> Self {
        Self {
            clicked: Bus::new("button_clicked"),
        }
    }

    pub fn initial_state() -> ClickState {
        ClickState::default()
    }

    pub fn clicked(&self) -> &Bus<()> {
        &self.clicked
    }

    pub fn application_state(&self, initial: ClickState) -> EventStream<ClickState> {
        Accumulator::new()
            .on(self.clicked.stream(), apply_click)
            .fold(initial)
    }
}

pub struct CounterView;

impl Render<ClickState> for CounterView {
    type View = String;

    fn render(&self, state: &ClickState) -> String {
        format!("== {PAGE_TITLE} ==\nhello unistack!\n[click me]\nclicks: {}\n", state.clicks)
    }
}
