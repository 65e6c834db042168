use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Difficulty, Question};
use crate::session::{BATCH_SIZE, Session};

use super::{TITLE, guide};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];
const EMPTY_BLANK: &str = "________";

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], session);

    let body = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
        .spacing(1)
        .split(chunks[1]);

    let wrong_answer = session.is_submitted() && !question.is_correct(session.selection().unwrap_or_default());
    let main = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Fill(1),
    ])
    .split(body[0]);

    render_tags(frame, main[0], question);
    render_sentence(frame, main[1], question, session);
    render_options(frame, main[2], question, session, app.cursor());
    if wrong_answer {
        guide::render_insight(frame, main[3], session.insight(), app.spinner_frame());
    }

    guide::render(frame, body[1], question, session.is_submitted());
    render_controls(frame, chunks[2], session.is_submitted());
}

fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(area);

    let filter = session.filter();
    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()),
        Span::styled("  AI Powered / 智能出题", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let filters = Line::from(vec![
        Span::styled("[f] ", Style::default().fg(Color::DarkGray)),
        Span::styled(filter.difficulty_label(), Style::default().fg(Color::Gray)),
        Span::styled("   [t] ", Style::default().fg(Color::DarkGray)),
        Span::styled(filter.category_label(), Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(filters), rows[1]);

    let position = session.current_index() % BATCH_SIZE + 1;
    let gauge = Gauge::default()
        .ratio(position as f64 / BATCH_SIZE as f64)
        .label(format!("{} / {}", position, BATCH_SIZE))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black));
    frame.render_widget(gauge, rows[2]);
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Beginner => Color::Green,
        Difficulty::Intermediate => Color::Yellow,
        Difficulty::Advanced => Color::Red,
    }
}

fn render_tags(frame: &mut Frame, area: Rect, question: &Question) {
    let tags = Line::from(vec![
        Span::styled(
            format!(" {} ", question.difficulty.zh_label()),
            Style::default()
                .fg(Color::Black)
                .bg(difficulty_color(question.difficulty))
                .bold(),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", question.category.zh_label()),
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(tags), area);
}

fn render_sentence(frame: &mut Frame, area: Rect, question: &Question, session: &Session) {
    let selection = session.selection();
    let blank_style = match (selection, session.is_submitted()) {
        (Some(choice), true) if question.is_correct(choice) => {
            Style::default().fg(Color::Green).bold().underlined()
        }
        (Some(_), true) => Style::default().fg(Color::Red).bold().underlined(),
        (Some(_), false) => Style::default().fg(Color::Cyan).bold().underlined(),
        (None, _) => Style::default().fg(Color::DarkGray),
    };

    let mut spans = Vec::with_capacity(5);
    if !question.sentence_before.is_empty() {
        spans.push(Span::raw(format!("{} ", question.sentence_before)));
    }
    spans.push(Span::styled(selection.unwrap_or(EMPTY_BLANK), blank_style));
    if !question.sentence_after.is_empty() {
        spans.push(Span::raw(format!(" {}", question.sentence_after)));
    }

    let widget = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, session: &Session, cursor: usize) {
    let selection = session.selection();
    let submitted = session.is_submitted();

    let lines: Vec<Line> = question
        .options
        .iter()
        .enumerate()
        .flat_map(|(index, option)| {
            let is_selected = selection == Some(option.as_str());
            let (marker, style) = if submitted {
                if question.is_correct(option) {
                    ("✓", Style::default().fg(Color::Green).bold())
                } else if is_selected {
                    ("✗", Style::default().fg(Color::Red).bold())
                } else {
                    (" ", Style::default().fg(Color::DarkGray))
                }
            } else if is_selected {
                (">", Style::default().fg(Color::Cyan).bold())
            } else if index == cursor {
                (">", Style::default().fg(Color::White))
            } else {
                (" ", Style::default().fg(Color::Gray))
            };

            [
                Line::from(vec![
                    Span::styled(format!(" {} ", marker), style),
                    Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
                    Span::styled(option.as_str(), style),
                ]),
                Line::from(""),
            ]
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options / 选项 ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, submitted: bool) {
    let hint = if submitted {
        "enter Next / 下一题  ·  f level  ·  t topic  ·  q quit"
    } else {
        "a-d pick  ·  j/k + space pick  ·  enter Submit / 提交  ·  f level  ·  t topic  ·  q quit"
    };
    let widget = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
