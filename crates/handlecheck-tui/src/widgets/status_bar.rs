// Status bar widget: usage counter, last check time, last opened link.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use handlecheck_core::page::SlotId;

use crate::Screen;

pub fn render(frame: &mut Frame, area: Rect, screen: &Screen) {
    let paragraph = Paragraph::new(Line::from(status_spans(screen)))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Layout: [app name] [usage] [last check] [opened link]
pub fn status_spans(screen: &Screen) -> Vec<Span<'static>> {
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let mut spans = vec![Span::styled(
        " handlecheck ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    let usage = screen.page.surface.text(SlotId::UsageCount);
    if !usage.is_empty() {
        spans.push(separator());
        spans.push(Span::styled(
            format!("Checks {usage}"),
            Style::default().fg(Color::White),
        ));
    }

    if let Some(checked_at) = screen.page.checked_at {
        spans.push(separator());
        spans.push(Span::styled(
            format!("Last check {}", checked_at.format("%H:%M:%S")),
            Style::default().fg(Color::White),
        ));
    }

    if let Some(link) = &screen.opened_link {
        spans.push(separator());
        spans.push(Span::styled(
            format!("Opened {link}"),
            Style::default().fg(Color::LightBlue),
        ));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn joined(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn fresh_screen_shows_only_name() {
        let screen = Screen::default();
        assert_eq!(joined(&status_spans(&screen)), " handlecheck ");
    }

    #[test]
    fn usage_time_and_link() {
        let mut screen = Screen::default();
        screen.page.surface.set_text(SlotId::UsageCount, "2/3");
        screen.page.checked_at = Local.with_ymd_and_hms(2026, 3, 1, 14, 3, 22).single();
        screen.opened_link = Some("https://fragment.com/username/abcd".into());

        let text = joined(&status_spans(&screen));
        assert_eq!(
            text,
            " handlecheck  | Checks 2/3 | Last check 14:03:22 | Opened https://fragment.com/username/abcd"
        );
    }
}
