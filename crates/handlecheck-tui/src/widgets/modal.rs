// Dialog overlays: channel created, set-username confirmation, username set,
// and the local quit prompt.
//
// Open dialogs are drawn in `ModalId::ALL` order, so the last open one ends up
// on top and is the one that receives keys.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use handlecheck_core::modal::ModalId;
use handlecheck_core::page::{Page, SlotId};

use super::slot_spans;
use crate::layout::{centered_rect, modal_rect, MODAL_WIDTH};

pub fn render(frame: &mut Frame, area: Rect, page: &Page) {
    let open = page.modals.open_modals();
    if open.is_empty() {
        return;
    }

    // Dim the backdrop once, whatever the number of dialogs.
    dim(frame, area);

    let rect = modal_rect(area);
    for id in open {
        frame.render_widget(Clear, rect);
        frame.render_widget(dialog(id, page), rect);
    }
}

/// Quit confirmation. Lives on the screen, not the page, so it is drawn
/// after (and over) any open dialog.
pub fn render_quit_prompt(frame: &mut Frame, area: Rect) {
    dim(frame, area);

    let rect = centered_rect(MODAL_WIDTH, QUIT_PROMPT_HEIGHT, area);
    let mut hints = key_hint("y", "Quit", Color::Green);
    hints.extend(key_hint("n", "Stay", Color::Red));
    let lines = vec![
        Line::from(vec![Span::raw("  Leave "), emphasized("handlecheck"), Span::raw("?")]),
        Line::default(),
        Line::from(hints),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(framed(" Quit ", Color::Yellow, None, lines), rect);
}

const QUIT_PROMPT_HEIGHT: u16 = 6;

fn dim(frame: &mut Frame, area: Rect) {
    let backdrop = Block::default().style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(backdrop, area);
}

fn key_hint(key: &str, label: &str, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(
            format!("[{key}]"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {label}  ")),
    ]
}

fn emphasized(text: &str) -> Span<'static> {
    Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn dialog(id: ModalId, page: &Page) -> Paragraph<'static> {
    let surface = &page.surface;
    let (title, color, lines) = match id {
        ModalId::ChannelCreated => {
            let mut link = vec![Span::raw("  ")];
            link.extend(slot_spans(surface.get(SlotId::ChannelLink)));
            (
                " Channel created ",
                Color::Green,
                vec![
                    Line::from(vec![
                        Span::raw("  Your channel "),
                        emphasized(surface.text(SlotId::CreatedChannelName)),
                        Span::raw(" is ready."),
                    ]),
                    Line::default(),
                    Line::from(link),
                    Line::default(),
                    Line::from(key_hint("Enter", "Close", Color::Green)),
                ],
            )
        }
        ModalId::UsernameConfirm => {
            let mut hints = if page.controls.confirm_username {
                key_hint("y", "Confirm", Color::Green)
            } else {
                vec![Span::styled(
                    "Setting...  ",
                    Style::default().fg(Color::DarkGray),
                )]
            };
            hints.extend(key_hint("n", "Cancel", Color::Red));
            (
                " Set username ",
                Color::Yellow,
                vec![
                    Line::from(vec![
                        Span::raw("  Set "),
                        emphasized(surface.text(SlotId::ConfirmUsername)),
                        Span::raw(" as your username?"),
                    ]),
                    Line::default(),
                    Line::from(Span::styled(
                        "  Your current username will be replaced.",
                        Style::default().fg(Color::Gray),
                    )),
                    Line::default(),
                    Line::from(hints),
                ],
            )
        }
        ModalId::UsernameSuccess => (
            " Username updated ",
            Color::Green,
            vec![
                Line::from(vec![
                    Span::raw("  Your username is now "),
                    emphasized(surface.text(SlotId::NewUsername)),
                ]),
                Line::default(),
                Line::from(key_hint("Enter", "Close", Color::Green)),
            ],
        ),
    };

    framed(title, color, Some(" x:close  Esc:close all "), lines)
}

/// Bordered dialog body with a blank first row.
fn framed(
    title: &'static str,
    color: Color,
    footer: Option<&'static str>,
    lines: Vec<Line<'static>>,
) -> Paragraph<'static> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    if let Some(footer) = footer {
        block = block.title_bottom(Line::from(footer).right_aligned());
    }

    let mut padded = vec![Line::default()];
    padded.extend(lines);
    Paragraph::new(padded)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Black))
}
