// Username form: the input box and the check button.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use handlecheck_core::validate::InputHint;

use crate::Screen;

const BUTTON_WIDTH: u16 = 16;

pub fn hint_color(hint: InputHint) -> Color {
    match hint {
        InputHint::Neutral => Color::Gray,
        InputHint::Warning => Color::Rgb(0xff, 0x98, 0x00),
        InputHint::Valid => Color::Rgb(0x4c, 0xaf, 0x50),
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &Screen) {
    let [input_area, button_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)]).areas(area);

    let input = &screen.page.input;
    let mut border = Style::default().fg(hint_color(input.hint));
    if screen.input_focused {
        border = border.add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![Span::styled("@", Style::default().fg(Color::DarkGray))];
    if screen.draft.is_empty() {
        spans.push(Span::styled(
            input.placeholder.clone(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::styled(
            screen.draft.clone(),
            Style::default().fg(Color::White),
        ));
    }
    if screen.input_focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::White)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Username ");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), input_area);

    let (label, style) = if screen.page.controls.submit {
        (
            "Check",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("Checking...", Style::default().fg(Color::DarkGray))
    };
    let button = Paragraph::new(Line::from(Span::styled(format!(" {label} "), style)))
        .centered()
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, button_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(screen: &Screen) -> (String, ratatui::buffer::Buffer) {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), screen))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        (buffer_text(&buffer), buffer)
    }

    #[test]
    fn empty_input_shows_placeholder() {
        let mut screen = Screen::default();
        screen.page.input.placeholder = "Try: crypto".into();
        let (text, _) = draw(&screen);
        assert!(text.contains("@Try: crypto"));
        assert!(text.contains("Check"));
    }

    #[test]
    fn draft_replaces_placeholder() {
        let mut screen = Screen::default();
        screen.draft = "durov".into();
        let (text, _) = draw(&screen);
        assert!(text.contains("@durov"));
        assert!(!text.contains("Enter username"));
    }

    #[test]
    fn busy_button_reads_checking() {
        let mut screen = Screen::default();
        screen.page.controls.submit = false;
        let (text, _) = draw(&screen);
        assert!(text.contains("Checking..."));
    }

    #[test]
    fn border_follows_hint() {
        let mut screen = Screen::default();
        screen.page.input.hint = InputHint::Warning;
        let (_, buffer) = draw(&screen);
        assert_eq!(buffer[(0, 0)].fg, Color::Rgb(0xff, 0x98, 0x00));
    }
}
