// Keyboard and mouse handling.
//
// Keys are routed by mode, highest priority first: quit confirmation, open
// dialogs, the focused input, then result-card shortcuts.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use handlecheck_core::modal::{CloseReason, ModalId};
use handlecheck_core::page::{ResultView, ViewState};
use handlecheck_core::protocol::UserCommand;
use handlecheck_core::validate::sanitize_live;

use crate::layout::{build_layout, modal_rect};
use crate::Screen;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key should reach the orchestrator.
/// Local effects such as the draft text and quit confirmation are applied to
/// `screen` directly.
pub fn handle_key(key_event: KeyEvent, screen: &mut Screen) -> Option<UserCommand> {
    // Windows reports Press and Release for each keystroke.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if screen.confirm_quit {
        return handle_confirm_quit(key_event, screen);
    }

    if screen.page.modals.any_open() {
        return handle_modal_keys(key_event, screen);
    }

    if screen.input_focused {
        return handle_input_keys(key_event, screen);
    }

    match key_event.code {
        KeyCode::Tab | KeyCode::Char('i') | KeyCode::Char('/') => set_focus(screen, true),
        KeyCode::Char('d') => screen
            .page
            .notifications
            .current()
            .map(|n| UserCommand::DismissNotification(n.id)),
        KeyCode::Char('q') => {
            screen.confirm_quit = true;
            None
        }
        KeyCode::Esc => Some(UserCommand::Escape),
        code => result_shortcut(code, screen.page.view),
    }
}

/// Card buttons. Only the buttons on the visible card respond.
fn result_shortcut(code: KeyCode, view: ViewState) -> Option<UserCommand> {
    match (view, code) {
        (ViewState::Result(ResultView::Available), KeyCode::Char('c')) => {
            Some(UserCommand::CreateChannel)
        }
        (ViewState::Result(ResultView::Available), KeyCode::Char('s')) => {
            Some(UserCommand::OpenSetUsername)
        }
        (ViewState::Result(ResultView::Fragment(_)), KeyCode::Char('o')) => {
            Some(UserCommand::MakeOffer)
        }
        (ViewState::Result(ResultView::Fragment(_)), KeyCode::Char('f')) => {
            Some(UserCommand::ViewFragment)
        }
        _ => None,
    }
}

fn handle_confirm_quit(key_event: KeyEvent, screen: &mut Screen) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            screen.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// The topmost open dialog takes the keys; Esc closes them all.
fn handle_modal_keys(key_event: KeyEvent, screen: &mut Screen) -> Option<UserCommand> {
    if key_event.code == KeyCode::Esc {
        return Some(UserCommand::Escape);
    }
    let top = topmost_modal(screen)?;

    match (top, key_event.code) {
        (ModalId::UsernameConfirm, KeyCode::Enter | KeyCode::Char('y')) => {
            Some(UserCommand::ConfirmSetUsername)
        }
        (ModalId::UsernameConfirm, KeyCode::Char('n')) => Some(UserCommand::CloseModal(
            ModalId::UsernameConfirm,
            CloseReason::CancelButton,
        )),
        (_, KeyCode::Char('x')) => Some(UserCommand::CloseModal(top, CloseReason::CloseButton)),
        (ModalId::ChannelCreated | ModalId::UsernameSuccess, KeyCode::Enter) => {
            Some(UserCommand::CloseModal(top, CloseReason::CloseButton))
        }
        _ => None,
    }
}

fn handle_input_keys(key_event: KeyEvent, screen: &mut Screen) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => Some(UserCommand::Submit),
        KeyCode::Tab | KeyCode::Esc => set_focus(screen, false),
        KeyCode::Backspace => {
            screen.draft.pop();
            Some(UserCommand::InputChanged(screen.draft.clone()))
        }
        KeyCode::Char(c) => {
            let mut raw = screen.draft.clone();
            raw.push(c);
            screen.draft = sanitize_live(&raw);
            // The orchestrator sanitizes again; send what was typed.
            Some(UserCommand::InputChanged(raw))
        }
        _ => None,
    }
}

fn set_focus(screen: &mut Screen, focused: bool) -> Option<UserCommand> {
    if screen.input_focused == focused {
        return None;
    }
    screen.input_focused = focused;
    Some(UserCommand::FocusInput(focused))
}

/// Dialogs stack in declaration order; the last open one is drawn on top.
fn topmost_modal(screen: &Screen) -> Option<ModalId> {
    screen.page.modals.open_modals().last().copied()
}

/// Handle a mouse event. Only left clicks matter: on a dialog overlay they
/// become `ModalClick`, elsewhere they move focus into or out of the input.
pub fn handle_mouse(mouse_event: MouseEvent, screen: &mut Screen) -> Option<UserCommand> {
    if mouse_event.kind != MouseEventKind::Down(MouseButton::Left) || screen.confirm_quit {
        return None;
    }
    let position = Position::new(mouse_event.column, mouse_event.row);

    if let Some(modal) = topmost_modal(screen) {
        let dialog: Rect = modal_rect(screen.area);
        return Some(UserCommand::ModalClick {
            modal,
            on_backdrop: !dialog.contains(position),
        });
    }

    let form = build_layout(screen.area).form;
    set_focus(screen, form.contains(position))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use handlecheck_core::evaluation::FragmentView;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn unfocused_screen(view: ViewState) -> Screen {
        let mut screen = Screen::default();
        screen.input_focused = false;
        screen.page.view = view;
        screen.area = Rect::new(0, 0, 80, 24);
        screen
    }

    // -- Input editing --

    #[test]
    fn typing_updates_draft_and_sends_raw_text() {
        let mut screen = Screen::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('@')), &mut screen),
            Some(UserCommand::InputChanged("@".into()))
        );
        assert_eq!(screen.draft, "");

        handle_key(key(KeyCode::Char('a')), &mut screen);
        let cmd = handle_key(key(KeyCode::Char('b')), &mut screen);
        assert_eq!(cmd, Some(UserCommand::InputChanged("ab".into())));
        assert_eq!(screen.draft, "ab");
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut screen = Screen::default();
        screen.draft = "abcd".into();
        assert_eq!(
            handle_key(key(KeyCode::Backspace), &mut screen),
            Some(UserCommand::InputChanged("abc".into()))
        );
        assert_eq!(screen.draft, "abc");
    }

    #[test]
    fn enter_in_input_submits() {
        let mut screen = Screen::default();
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut screen),
            Some(UserCommand::Submit)
        );
    }

    #[test]
    fn tab_toggles_focus() {
        let mut screen = Screen::default();
        assert_eq!(
            handle_key(key(KeyCode::Tab), &mut screen),
            Some(UserCommand::FocusInput(false))
        );
        assert!(!screen.input_focused);
        assert_eq!(
            handle_key(key(KeyCode::Tab), &mut screen),
            Some(UserCommand::FocusInput(true))
        );
        assert!(screen.input_focused);
    }

    #[test]
    fn shortcut_letters_are_text_while_typing() {
        let mut screen = Screen::default();
        screen.page.view = ViewState::Result(ResultView::Available);
        assert_eq!(
            handle_key(key(KeyCode::Char('c')), &mut screen),
            Some(UserCommand::InputChanged("c".into()))
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut screen = Screen::default();
        let mut event = key(KeyCode::Char('a'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event, &mut screen), None);
        assert!(screen.draft.is_empty());
    }

    // -- Card shortcuts --

    #[test]
    fn available_card_shortcuts() {
        let mut screen = unfocused_screen(ViewState::Result(ResultView::Available));
        assert_eq!(
            handle_key(key(KeyCode::Char('c')), &mut screen),
            Some(UserCommand::CreateChannel)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('s')), &mut screen),
            Some(UserCommand::OpenSetUsername)
        );
        assert_eq!(handle_key(key(KeyCode::Char('o')), &mut screen), None);
    }

    #[test]
    fn fragment_card_shortcuts() {
        let mut screen =
            unfocused_screen(ViewState::Result(ResultView::Fragment(FragmentView::Sold)));
        assert_eq!(
            handle_key(key(KeyCode::Char('o')), &mut screen),
            Some(UserCommand::MakeOffer)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('f')), &mut screen),
            Some(UserCommand::ViewFragment)
        );
        assert_eq!(handle_key(key(KeyCode::Char('c')), &mut screen), None);
    }

    #[test]
    fn taken_card_has_no_buttons() {
        let mut screen = unfocused_screen(ViewState::Result(ResultView::Taken));
        assert_eq!(handle_key(key(KeyCode::Char('c')), &mut screen), None);
        assert_eq!(handle_key(key(KeyCode::Char('f')), &mut screen), None);
    }

    #[test]
    fn dismiss_targets_current_notification() {
        let mut screen = unfocused_screen(ViewState::Idle);
        assert_eq!(handle_key(key(KeyCode::Char('d')), &mut screen), None);

        let id = screen.page.notifications.notify(
            "Network error occurred",
            handlecheck_core::notify::NotificationKind::Error,
            tokio::time::Instant::now(),
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), &mut screen),
            Some(UserCommand::DismissNotification(id))
        );
    }

    // -- Quit --

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut screen = Screen::default();
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut screen),
            Some(UserCommand::Quit)
        );
        screen.page.modals.open(ModalId::ChannelCreated);
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut screen),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn q_asks_before_quitting() {
        let mut screen = unfocused_screen(ViewState::Idle);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut screen), None);
        assert!(screen.confirm_quit);

        assert_eq!(handle_key(key(KeyCode::Char('c')), &mut screen), None);
        assert_eq!(handle_key(key(KeyCode::Char('n')), &mut screen), None);
        assert!(!screen.confirm_quit);

        handle_key(key(KeyCode::Char('q')), &mut screen);
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut screen),
            Some(UserCommand::Quit)
        );
    }

    // -- Dialogs --

    #[test]
    fn confirm_dialog_keys() {
        let mut screen = Screen::default();
        screen.page.modals.open(ModalId::UsernameConfirm);

        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut screen),
            Some(UserCommand::ConfirmSetUsername)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut screen),
            Some(UserCommand::CloseModal(
                ModalId::UsernameConfirm,
                CloseReason::CancelButton
            ))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('x')), &mut screen),
            Some(UserCommand::CloseModal(
                ModalId::UsernameConfirm,
                CloseReason::CloseButton
            ))
        );
        // Typing does not reach the input behind the dialog.
        assert_eq!(handle_key(key(KeyCode::Char('a')), &mut screen), None);
        assert!(screen.draft.is_empty());
    }

    #[test]
    fn topmost_dialog_takes_enter() {
        let mut screen = Screen::default();
        screen.page.modals.open(ModalId::UsernameConfirm);
        screen.page.modals.open(ModalId::UsernameSuccess);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut screen),
            Some(UserCommand::CloseModal(
                ModalId::UsernameSuccess,
                CloseReason::CloseButton
            ))
        );
    }

    #[test]
    fn escape_with_dialog_open_closes_all() {
        let mut screen = Screen::default();
        screen.page.modals.open(ModalId::ChannelCreated);
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut screen),
            Some(UserCommand::Escape)
        );
        // Focus is untouched; Esc belonged to the dialog.
        assert!(screen.input_focused);
    }

    // -- Mouse --

    #[test]
    fn clicks_on_dialog_overlay() {
        let mut screen = unfocused_screen(ViewState::Idle);
        screen.page.modals.open(ModalId::ChannelCreated);

        assert_eq!(
            handle_mouse(click(0, 0), &mut screen),
            Some(UserCommand::ModalClick {
                modal: ModalId::ChannelCreated,
                on_backdrop: true,
            })
        );
        assert_eq!(
            handle_mouse(click(40, 12), &mut screen),
            Some(UserCommand::ModalClick {
                modal: ModalId::ChannelCreated,
                on_backdrop: false,
            })
        );
    }

    #[test]
    fn click_moves_focus() {
        let mut screen = unfocused_screen(ViewState::Idle);
        assert_eq!(
            handle_mouse(click(10, 2), &mut screen),
            Some(UserCommand::FocusInput(true))
        );
        assert_eq!(handle_mouse(click(10, 2), &mut screen), None);
        assert_eq!(
            handle_mouse(click(10, 15), &mut screen),
            Some(UserCommand::FocusInput(false))
        );
    }

    #[test]
    fn other_mouse_events_are_ignored() {
        let mut screen = unfocused_screen(ViewState::Idle);
        let mut event = click(10, 2);
        event.kind = MouseEventKind::Moved;
        assert_eq!(handle_mouse(event, &mut screen), None);
    }
}
