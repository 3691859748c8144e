// Widgets for each screen zone and overlay.

pub mod form;
pub mod modal;
pub mod notification;
pub mod results;
pub mod status_bar;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use handlecheck_core::page::SlotContent;

/// Width of the confidence bar in cells.
pub const GAUGE_WIDTH: usize = 20;

/// Terminal color for a rarity styling class.
pub fn rarity_color(class: &str) -> Color {
    match class {
        "rarity-basic" => Color::Gray,
        "rarity-common" => Color::White,
        "rarity-uncommon" => Color::Green,
        "rarity-rare" => Color::Blue,
        "rarity-epic" => Color::Magenta,
        "rarity-legendary" => Color::Yellow,
        "rarity-mythical" => Color::Red,
        _ => Color::White,
    }
}

/// Text bar for a 0..=100 fill, e.g. `█████░░░░░`.
pub fn gauge_bar(fill_percent: f64, width: usize) -> String {
    let filled = ((fill_percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Spans for one slot. Unwritten slots show a dim dash.
pub fn slot_spans(content: Option<&SlotContent>) -> Vec<Span<'static>> {
    match content {
        None => vec![Span::styled("-", Style::default().fg(Color::DarkGray))],
        Some(SlotContent::Text(text)) => vec![Span::styled(
            text.clone(),
            Style::default().fg(Color::White),
        )],
        Some(SlotContent::Highlight(text)) => vec![Span::styled(
            text.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )],
        Some(SlotContent::Badge { label, class }) => vec![Span::styled(
            format!(" {label} "),
            Style::default()
                .fg(Color::Black)
                .bg(rarity_color(class))
                .add_modifier(Modifier::BOLD),
        )],
        Some(SlotContent::Gauge {
            label,
            fill_percent,
        }) => vec![
            Span::styled(
                gauge_bar(*fill_percent, GAUGE_WIDTH),
                Style::default().fg(Color::Green),
            ),
            Span::raw(" "),
            Span::styled(label.clone(), Style::default().fg(Color::White)),
        ],
        Some(SlotContent::Link(url)) => vec![Span::styled(
            url.clone(),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
        )],
    }
}
