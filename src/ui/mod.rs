mod failure;
mod guide;
mod loading;
mod quiz;
mod result;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::session::Phase;

const TITLE: &str = "GRAMMAR TUTOR";

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.session().phase() {
        Phase::Loading => loading::render(frame, area, app),
        Phase::Error { message, detail } => failure::render(frame, area, message, detail),
        Phase::AwaitingSelection | Phase::Submitted => quiz::render(frame, area, app),
        Phase::Result => result::render(frame, area, app),
    }
}

/// Centers a box of `height` lines vertically.
fn centered(area: Rect, height: u16) -> Rect {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    chunks[1]
}
