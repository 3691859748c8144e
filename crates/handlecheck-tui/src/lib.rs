// Terminal front end: layout, input handling, and widget rendering.
//
// The TUI keeps a `Screen` holding the latest `Page` pushed by the app
// orchestrator plus a few purely local bits (the input draft, quit
// confirmation). Pages arrive over an mpsc channel; the screen re-renders at
// ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream};
use crossterm::execute;
use futures_util::StreamExt;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use handlecheck_core::page::{Page, ResultView, ViewState};
use handlecheck_core::protocol::{NavigationTarget, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// Why the TUI loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// The server sent us elsewhere.
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct Screen {
    /// Latest page model from the orchestrator.
    pub page: Page,
    /// Input text as typed. Sent on every edit; the page copy may lag behind.
    pub draft: String,
    pub input_focused: bool,
    pub confirm_quit: bool,
    /// Last link opened alongside the page, shown in the status bar.
    pub opened_link: Option<String>,
    pub exit: Option<Exit>,
    /// Terminal area of the last frame, for mouse hit testing.
    pub area: Rect,
}

impl Default for Screen {
    fn default() -> Self {
        let page = Page::default();
        let input_focused = page.input.focused;
        Screen {
            page,
            draft: String::new(),
            input_focused,
            confirm_quit: false,
            opened_link: None,
            exit: None,
            area: Rect::default(),
        }
    }
}

/// Apply a single update from the orchestrator.
pub fn apply_ui_update(screen: &mut Screen, update: UiUpdate) {
    match update {
        UiUpdate::Page(page) => {
            screen.page = *page;
        }
        UiUpdate::Navigate { url, target } => match target {
            NavigationTarget::SameWindow => {
                info!("Redirected to {}", url);
                screen.exit = Some(Exit::Redirect(url));
            }
            NavigationTarget::NewTab => {
                info!("Opened {}", url);
                screen.opened_link = Some(url);
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, screen: &Screen) {
    let area = frame.area();
    let layout: AppLayout = build_layout(area);

    widgets::status_bar::render(frame, layout.status_bar, screen);
    widgets::form::render(frame, layout.form, screen);
    widgets::results::render(frame, layout.results, &screen.page);
    render_help_bar(frame, &layout, screen);

    widgets::notification::render(frame, layout.results, &screen.page.notifications);
    widgets::modal::render(frame, area, &screen.page);

    if screen.confirm_quit {
        widgets::modal::render_quit_prompt(frame, area);
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, screen: &Screen) {
    let hints = help_text(screen);
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hints,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

/// Shortcut hints for the current context.
pub fn help_text(screen: &Screen) -> &'static str {
    if screen.confirm_quit {
        return " y:Quit  n:Stay";
    }
    if screen.page.modals.any_open() {
        return " Enter:Confirm/Close  n:Cancel  Esc:Close all";
    }
    if screen.input_focused {
        return " Enter:Check  Tab:Actions  Esc:Leave input  Ctrl+C:Quit";
    }
    match screen.page.view {
        ViewState::Result(ResultView::Available) => {
            " c:Create channel  s:Set as username  d:Dismiss  Tab:Input  q:Quit"
        }
        ViewState::Result(ResultView::Fragment(_)) => {
            " o:Make offer  f:View on Fragment  d:Dismiss  Tab:Input  q:Quit"
        }
        _ => " Tab:Input  d:Dismiss  q:Quit",
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits, the orchestrator goes away,
/// or a redirect arrives.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<Exit> {
    let mut terminal = ratatui::init();
    if let Err(e) = execute!(stdout(), EnableMouseCapture) {
        warn!("Mouse capture unavailable: {}", e);
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut screen = Screen::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let exit = loop {
        if let Some(exit) = screen.exit.take() {
            break exit;
        }

        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut screen, ui_update),
                    None => break Exit::Quit,
                }
            }

            maybe_event = event_stream.next() => {
                let command = match maybe_event {
                    Some(Ok(Event::Key(key_event))) => input::handle_key(key_event, &mut screen),
                    Some(Ok(Event::Mouse(mouse_event))) => input::handle_mouse(mouse_event, &mut screen),
                    Some(Ok(_)) => None,
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break Exit::Quit;
                    }
                    None => break Exit::Quit,
                };
                if let Some(command) = command {
                    let quitting = command == UserCommand::Quit;
                    if cmd_tx.send(command).await.is_err() {
                        break Exit::Quit;
                    }
                    if quitting {
                        break Exit::Quit;
                    }
                }
            }

            _ = render_tick.tick() => {
                let completed = terminal.draw(|frame| render_frame(frame, &screen))?;
                screen.area = completed.area;
            }
        }
    };

    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();

    Ok(exit)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::test_support::buffer_text;
    use super::*;
    use handlecheck_core::evaluation::FragmentView;
    use handlecheck_core::modal::ModalId;
    use handlecheck_core::page::SlotId;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn screen_default_is_sensible() {
        let screen = Screen::default();
        assert_eq!(screen.page.view, ViewState::Idle);
        assert!(screen.draft.is_empty());
        assert!(screen.input_focused);
        assert!(!screen.confirm_quit);
        assert!(screen.opened_link.is_none());
        assert!(screen.exit.is_none());
    }

    #[test]
    fn page_update_replaces_page_but_keeps_draft() {
        let mut screen = Screen::default();
        screen.draft = "abcde".into();

        let mut page = Page::default();
        page.view = ViewState::Loading;
        page.input.text = "abcd".into();
        apply_ui_update(&mut screen, UiUpdate::Page(Box::new(page)));

        assert_eq!(screen.page.view, ViewState::Loading);
        assert_eq!(screen.draft, "abcde");
    }

    #[test]
    fn same_window_navigation_ends_the_session() {
        let mut screen = Screen::default();
        apply_ui_update(
            &mut screen,
            UiUpdate::Navigate {
                url: "http://127.0.0.1:5000/login".into(),
                target: NavigationTarget::SameWindow,
            },
        );
        assert_eq!(
            screen.exit,
            Some(Exit::Redirect("http://127.0.0.1:5000/login".into()))
        );
    }

    #[test]
    fn new_tab_navigation_is_remembered() {
        let mut screen = Screen::default();
        apply_ui_update(
            &mut screen,
            UiUpdate::Navigate {
                url: "https://fragment.com/username/abcd".into(),
                target: NavigationTarget::NewTab,
            },
        );
        assert!(screen.exit.is_none());
        assert_eq!(
            screen.opened_link.as_deref(),
            Some("https://fragment.com/username/abcd")
        );
    }

    #[test]
    fn help_text_follows_context() {
        let mut screen = Screen::default();
        assert!(help_text(&screen).contains("Enter:Check"));

        screen.input_focused = false;
        screen.page.view = ViewState::Result(ResultView::Fragment(FragmentView::Sold));
        assert!(help_text(&screen).contains("o:Make offer"));

        screen.page.modals.open(ModalId::UsernameConfirm);
        assert!(help_text(&screen).contains("Esc:Close all"));

        screen.confirm_quit = true;
        assert_eq!(help_text(&screen), " y:Quit  n:Stay");
    }

    #[test]
    fn full_frame_renders_all_zones() {
        let mut screen = Screen::default();
        screen.draft = "durov".into();
        screen.page.view = ViewState::Result(ResultView::Available);
        screen.page.surface.set_text(SlotId::AvailableUsername, "@durov");
        screen.page.surface.set_text(SlotId::UsageCount, "1/3");

        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_frame(frame, &screen)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Checks 1/3"));
        assert!(text.contains("durov"));
        assert!(text.contains("Available"));
        assert!(text.contains("Enter:Check"));
    }

    #[test]
    fn quit_confirmation_draws_on_top() {
        let mut screen = Screen::default();
        screen.confirm_quit = true;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_frame(frame, &screen)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Leave handlecheck?"));
    }
}
