//! Teaching panels: the grammar guide beside the question and the model's
//! feedback under it.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::models::Question;
use crate::session::Insight;

use super::loading::spinner_glyph;

pub fn render(frame: &mut Frame, area: Rect, question: &Question, submitted: bool) {
    let heading = Style::default().fg(Color::DarkGray).bold();

    let lines: Vec<Line> = if submitted {
        let explanation = &question.explanation;
        let mut lines = vec![
            Line::from(Span::styled("CORE RULE / 核心规则", heading)),
            Line::from(explanation.rule.as_str()),
            Line::from(""),
            Line::from(Span::styled("EXAMPLES / 例句", heading)),
        ];
        lines.extend(explanation.examples.iter().map(|example| {
            Line::from(Span::styled(
                format!("\u{2022} \"{}\"", example),
                Style::default().fg(Color::LightBlue).italic(),
            ))
        }));
        if !explanation.common_errors.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("COMMON ERRORS / 常见错误", heading)));
            lines.push(Line::from(explanation.common_errors.as_str()));
        }
        lines
    } else {
        vec![
            Line::from(""),
            Line::from("提交答案后查看解析".fg(Color::DarkGray)),
            Line::from("Submit an answer to see the guide".fg(Color::DarkGray)),
        ]
    };

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Grammar Guide / 语法指南 ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

pub fn render_insight(frame: &mut Frame, area: Rect, insight: &Insight, spinner_frame: usize) {
    let body = match insight {
        Insight::Ready(text) => Text::styled(text.as_str(), Style::default().fg(Color::Yellow)),
        Insight::Pending | Insight::None => Text::styled(
            format!("{} Analyzing... / 正在分析...", spinner_glyph(spinner_frame)),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let widget = Paragraph::new(body).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" AI Tutor Insights / AI 点评 ")
            .title_style(Style::default().fg(Color::Yellow).bold())
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
