// Toast widget: the current notification in the top-right corner.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use handlecheck_core::notify::{Notification, NotificationCenter, NotificationKind, Phase};

use crate::layout::{toast_rect, TOAST_WIDTH};

pub fn kind_color(kind: NotificationKind) -> Color {
    let (r, g, b) = kind.rgb();
    Color::Rgb(r, g, b)
}

/// Cells the toast is pushed off to the right while sliding.
pub fn slide_offset(phase: Phase) -> u16 {
    match phase {
        Phase::Shown => 0,
        Phase::Entering | Phase::Leaving => TOAST_WIDTH / 2,
    }
}

pub fn render(frame: &mut Frame, area: Rect, center: &NotificationCenter) {
    let Some(notification) = center.current() else {
        return;
    };
    let rect = toast_rect(area, slide_offset(notification.phase));
    if rect.width < 4 || rect.height == 0 {
        return;
    }

    frame.render_widget(Clear, rect);
    frame.render_widget(toast(notification), rect);
}

fn toast(notification: &Notification) -> Paragraph<'static> {
    let color = kind_color(notification.kind);
    let mut text_style = Style::default().fg(Color::White);
    if notification.phase != Phase::Shown {
        text_style = text_style.add_modifier(Modifier::DIM);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title_bottom(Line::from(Span::styled(
            " d:dismiss ",
            Style::default().fg(Color::DarkGray),
        )).right_aligned());

    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", notification.kind.icon()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(notification.message.clone(), text_style),
    ]))
    .block(block)
    .style(Style::default().bg(Color::Black))
}
