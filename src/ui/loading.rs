use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

use super::{TITLE, centered};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn spinner_glyph(frame_index: usize) -> char {
    SPINNER[frame_index % SPINNER.len()]
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let filter = app.session().filter();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(TITLE, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  Generating Questions...", spinner_glyph(app.spinner_frame())),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from("AI 老师正在为你组题...".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  ·  {}", filter.difficulty_label(), filter.category_label()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from("f level  ·  t topic  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, centered(area, 11));
}
