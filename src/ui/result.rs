use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::Question;

const SENTENCE_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.session().score();
    let grade_color = grade_color(score.accuracy);

    let chunks = Layout::vertical([
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PRACTICE DONE / 练习完成",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(score.encouragement.fg(Color::Gray)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Score / 得分  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} / {}", score.correct, score.total),
                Style::default().fg(grade_color).bold(),
            ),
            Span::styled("     Accuracy / 正确率  ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}%", score.accuracy),
                Style::default().fg(grade_color).bold(),
            ),
        ]),
        Line::from(""),
    ];

    let summary = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(summary, chunks[0]);

    render_breakdown(frame, chunks[1], app);
    render_controls(frame, chunks[2]);
}

fn grade_color(accuracy: u32) -> Color {
    match accuracy {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let lines: Vec<Line> = session
        .questions()
        .iter()
        .enumerate()
        .filter_map(|(index, question)| {
            let answer = session.answer_for(question)?;
            let (symbol, color) = if answer.is_correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let mut spans = vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(preview(question), Style::default().fg(Color::Gray)),
            ];
            if !answer.is_correct {
                spans.push(Span::styled(
                    format!("  {} → {}", answer.selected_option, question.correct_answer),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Some(Line::from(spans))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn preview(question: &Question) -> String {
    let sentence = question.rendered_sentence();
    if sentence.chars().count() > SENTENCE_PREVIEW_LENGTH {
        let truncated: String = sentence.chars().take(SENTENCE_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        sentence
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("enter Start New Batch / 开始下一组  ·  j/k scroll  ·  f level  ·  t topic  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
