use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::centered;

pub fn render(frame: &mut Frame, area: Rect, message: &str, detail: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "出错了 / Oops!",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled(
            "[R] Try Again / 重试",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("f level  ·  t topic  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, centered(area, 13));
}
