// Modal dialogs: one Closed/Open state machine per dialog.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalId {
    /// "Channel created" result dialog.
    ChannelCreated,
    /// "Set this username?" confirmation.
    UsernameConfirm,
    /// "Username updated" result dialog.
    UsernameSuccess,
}

impl ModalId {
    pub const ALL: [ModalId; 3] = [
        ModalId::ChannelCreated,
        ModalId::UsernameConfirm,
        ModalId::UsernameSuccess,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    CloseButton,
    CancelButton,
    Backdrop,
    Escape,
    /// Closed by the workflow itself (confirm dialog after a successful set).
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modals {
    channel_created: ModalState,
    username_confirm: ModalState,
    username_success: ModalState,
}

impl Modals {
    fn slot(&mut self, id: ModalId) -> &mut ModalState {
        match id {
            ModalId::ChannelCreated => &mut self.channel_created,
            ModalId::UsernameConfirm => &mut self.username_confirm,
            ModalId::UsernameSuccess => &mut self.username_success,
        }
    }

    pub fn state(&self, id: ModalId) -> ModalState {
        match id {
            ModalId::ChannelCreated => self.channel_created,
            ModalId::UsernameConfirm => self.username_confirm,
            ModalId::UsernameSuccess => self.username_success,
        }
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.state(id) == ModalState::Open
    }

    pub fn any_open(&self) -> bool {
        ModalId::ALL.iter().any(|id| self.is_open(*id))
    }

    pub fn open_modals(&self) -> Vec<ModalId> {
        ModalId::ALL
            .into_iter()
            .filter(|id| self.is_open(*id))
            .collect()
    }

    /// Returns whether the state changed.
    pub fn open(&mut self, id: ModalId) -> bool {
        let slot = self.slot(id);
        let changed = *slot == ModalState::Closed;
        *slot = ModalState::Open;
        changed
    }

    /// Returns whether the state changed. `reason` is only informational.
    pub fn close(&mut self, id: ModalId, reason: CloseReason) -> bool {
        let slot = self.slot(id);
        let changed = *slot == ModalState::Open;
        *slot = ModalState::Closed;
        if changed {
            tracing::debug!(?id, ?reason, "modal closed");
        }
        changed
    }

    /// Escape: close every open dialog. Returns the ones that were closed.
    pub fn close_all_open(&mut self) -> Vec<ModalId> {
        let open = self.open_modals();
        for id in &open {
            self.close(*id, CloseReason::Escape);
        }
        open
    }

    /// A click on `id`'s overlay closes it only when the click hit the
    /// backdrop itself, not the dialog box.
    pub fn click(&mut self, id: ModalId, on_backdrop: bool) -> bool {
        on_backdrop && self.close(id, CloseReason::Backdrop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_and_close_are_idempotent() {
        let mut modals = Modals::default();
        assert!(modals.open(ModalId::ChannelCreated));
        assert!(!modals.open(ModalId::ChannelCreated));
        assert!(modals.close(ModalId::ChannelCreated, CloseReason::CloseButton));
        assert!(!modals.close(ModalId::ChannelCreated, CloseReason::CloseButton));
    }

    #[test]
    fn escape_closes_every_open_modal() {
        let mut modals = Modals::default();
        modals.open(ModalId::ChannelCreated);
        modals.open(ModalId::UsernameSuccess);

        let closed = modals.close_all_open();
        assert_eq!(closed, vec![ModalId::ChannelCreated, ModalId::UsernameSuccess]);
        assert!(!modals.any_open());
        assert!(modals.close_all_open().is_empty());
    }

    #[test]
    fn escape_leaves_closed_modals_alone() {
        let mut modals = Modals::default();
        modals.open(ModalId::UsernameConfirm);
        assert_eq!(modals.close_all_open(), vec![ModalId::UsernameConfirm]);
        assert_eq!(modals.state(ModalId::ChannelCreated), ModalState::Closed);
    }

    #[test]
    fn click_inside_dialog_does_not_close() {
        let mut modals = Modals::default();
        modals.open(ModalId::UsernameConfirm);
        assert!(!modals.click(ModalId::UsernameConfirm, false));
        assert!(modals.is_open(ModalId::UsernameConfirm));
        assert!(modals.click(ModalId::UsernameConfirm, true));
        assert!(!modals.is_open(ModalId::UsernameConfirm));
    }

    #[test]
    fn modals_are_independent() {
        let mut modals = Modals::default();
        modals.open(ModalId::UsernameConfirm);
        modals.open(ModalId::UsernameSuccess);
        modals.close(ModalId::UsernameConfirm, CloseReason::Completed);
        assert_eq!(modals.open_modals(), vec![ModalId::UsernameSuccess]);
    }
}
