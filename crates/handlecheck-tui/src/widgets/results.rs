// Result panel: idle prompt, loading message, or one of the three cards.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use handlecheck_core::evaluation::FragmentView;
use handlecheck_core::page::{Page, ResultView, SlotId, ViewState};

use super::slot_spans;

pub fn render(frame: &mut Frame, area: Rect, page: &Page) {
    let (title, border_color, lines) = match page.view {
        ViewState::Idle => (" Result ", Color::DarkGray, idle_lines()),
        ViewState::Loading => (" Checking ", Color::Cyan, loading_lines(page)),
        ViewState::Result(ResultView::Available) => {
            (" Available ", Color::Green, available_lines(page))
        }
        ViewState::Result(ResultView::Taken) => (" Taken ", Color::Red, taken_lines(page)),
        ViewState::Result(ResultView::Fragment(sub)) => {
            (" On Fragment ", Color::Yellow, fragment_lines(page, sub))
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn idle_lines() -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            "  Type a username and press Enter to see what it is worth.",
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn loading_lines(page: &Page) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  {}", page.surface.text(SlotId::LoadingMessage)),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        )),
    ]
}

/// `  Label:        value`
fn row(page: &Page, label: &str, slot: SlotId) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("  {label:<16}"),
        Style::default().fg(Color::Gray),
    )];
    spans.extend(slot_spans(page.surface.get(slot)));
    Line::from(spans)
}

fn headline(page: &Page, slot: SlotId, note: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            page.surface.text(slot).to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(note.to_string(), Style::default().fg(color)),
    ])
}

fn buttons(items: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (key, label) in items {
        spans.push(Span::styled(
            format!("[{key}]"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {label}   "),
            Style::default().fg(Color::White),
        ));
    }
    Line::from(spans)
}

fn available_lines(page: &Page) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        headline(page, SlotId::AvailableUsername, "is available", Color::Green),
        Line::default(),
        row(page, "Rarity", SlotId::AvailableRarity),
        row(page, "Estimated value", SlotId::AvailableValue),
        row(page, "Confidence", SlotId::AvailableConfidence),
        Line::default(),
    ];
    let busy = !page.controls.create_channel;
    lines.push(buttons(&[
        (
            "c",
            if busy {
                "Creating channel..."
            } else {
                "Create channel"
            },
        ),
        ("s", "Set as my username"),
    ]));
    lines
}

fn taken_lines(page: &Page) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        headline(page, SlotId::TakenUsername, "is taken", Color::Red),
        Line::default(),
        row(page, "Rarity", SlotId::TakenRarity),
        row(page, "Estimated value", SlotId::TakenValue),
        row(page, "Confidence", SlotId::TakenConfidence),
    ]
}

fn fragment_lines(page: &Page, sub: FragmentView) -> Vec<Line<'static>> {
    let status = page.surface.text(SlotId::FragmentStatus).to_string();
    let mut lines = vec![
        Line::default(),
        headline(page, SlotId::FragmentUsername, &status, Color::Yellow),
        Line::default(),
    ];

    match sub {
        FragmentView::OpenAuction => {
            lines.push(row(page, "Minimum bid", SlotId::FragmentMinBid));
            lines.push(row(page, "USD", SlotId::FragmentUsdPrice));
            lines.push(row(page, "Decreases by", SlotId::FragmentDecrease));
            lines.push(row(page, "Minimum price", SlotId::FragmentMinimum));
        }
        FragmentView::Sold => {
            lines.push(row(page, "Sold for", SlotId::FragmentSoldPrice));
            lines.push(row(page, "USD", SlotId::FragmentSoldUsd));
        }
        FragmentView::LiveAuction => {
            lines.push(row(page, "Current bid", SlotId::FragmentCurrentBid));
            lines.push(row(page, "USD", SlotId::FragmentCurrentUsd));
        }
        FragmentView::HeadlineOnly => {}
    }
    if sub != FragmentView::HeadlineOnly {
        lines.push(Line::default());
    }

    lines.push(row(page, "Rarity", SlotId::FragmentRarity));
    lines.push(row(page, "Market value", SlotId::FragmentMarketValue));
    lines.push(row(page, "Auction status", SlotId::FragmentAuctionStatus));
    lines.push(Line::default());
    lines.push(buttons(&[("o", "Make offer"), ("f", "View on Fragment")]));
    lines
}
