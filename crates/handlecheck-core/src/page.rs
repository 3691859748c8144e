// Page model: the display surface, the exclusive view state, and the
// control/input state the UI renders from.
//
// The app orchestrator owns one `Page` and mutates it through the
// component modules; the UI receives clones and never writes back.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::evaluation::FragmentView;
use crate::modal::Modals;
use crate::notify::NotificationCenter;
use crate::validate::InputHint;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Stable identifier of a display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    LoadingMessage,
    UsageCount,

    AvailableUsername,
    AvailableRarity,
    AvailableValue,
    AvailableConfidence,

    TakenUsername,
    TakenRarity,
    TakenValue,
    TakenConfidence,

    FragmentUsername,
    FragmentStatus,
    FragmentMinBid,
    FragmentUsdPrice,
    FragmentDecrease,
    FragmentMinimum,
    FragmentSoldPrice,
    FragmentSoldUsd,
    FragmentCurrentBid,
    FragmentCurrentUsd,
    FragmentRarity,
    FragmentMarketValue,
    FragmentAuctionStatus,

    ConfirmUsername,
    CreatedChannelName,
    ChannelLink,
    NewUsername,
}

impl SlotId {
    /// Element identifier in the page markup.
    pub fn element_id(self) -> &'static str {
        match self {
            SlotId::LoadingMessage => "loading-message",
            SlotId::UsageCount => "usage-count",
            SlotId::AvailableUsername => "available-username",
            SlotId::AvailableRarity => "available-rarity",
            SlotId::AvailableValue => "available-value",
            SlotId::AvailableConfidence => "available-confidence",
            SlotId::TakenUsername => "taken-username",
            SlotId::TakenRarity => "taken-rarity",
            SlotId::TakenValue => "taken-value",
            SlotId::TakenConfidence => "taken-confidence",
            SlotId::FragmentUsername => "fragment-username",
            SlotId::FragmentStatus => "fragment-status",
            SlotId::FragmentMinBid => "fragment-min-bid",
            SlotId::FragmentUsdPrice => "fragment-usd-price",
            SlotId::FragmentDecrease => "fragment-decrease",
            SlotId::FragmentMinimum => "fragment-minimum",
            SlotId::FragmentSoldPrice => "fragment-sold-price",
            SlotId::FragmentSoldUsd => "fragment-sold-usd",
            SlotId::FragmentCurrentBid => "fragment-current-bid",
            SlotId::FragmentCurrentUsd => "fragment-current-usd",
            SlotId::FragmentRarity => "fragment-rarity",
            SlotId::FragmentMarketValue => "fragment-market-value",
            SlotId::FragmentAuctionStatus => "fragment-auction-status",
            SlotId::ConfirmUsername => "confirm-username",
            SlotId::CreatedChannelName => "created-channel-name",
            SlotId::ChannelLink => "channel-link",
            SlotId::NewUsername => "new-username",
        }
    }
}

/// What a slot currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotContent {
    Text(String),
    /// Emphasized value text (currency figures).
    Highlight(String),
    Badge { label: String, class: String },
    /// Percentage text with a proportional bar, `fill_percent` in 0..=100.
    Gauge { label: String, fill_percent: f64 },
    Link(String),
}

impl SlotContent {
    pub fn text(&self) -> &str {
        match self {
            SlotContent::Text(s) | SlotContent::Highlight(s) | SlotContent::Link(s) => s,
            SlotContent::Badge { label, .. } | SlotContent::Gauge { label, .. } => label,
        }
    }
}

/// Slot contents keyed by id. A slot keeps its content until rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    slots: HashMap<SlotId, SlotContent>,
}

impl Surface {
    pub fn set(&mut self, id: SlotId, content: SlotContent) {
        self.slots.insert(id, content);
    }

    pub fn set_text(&mut self, id: SlotId, text: impl Into<String>) {
        self.set(id, SlotContent::Text(text.into()));
    }

    pub fn get(&self, id: SlotId) -> Option<&SlotContent> {
        self.slots.get(&id)
    }

    /// Displayed text of a slot, empty when never written.
    pub fn text(&self, id: SlotId) -> &str {
        self.get(id).map(SlotContent::text).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Which result container is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    Available,
    Taken,
    Fragment(FragmentView),
}

/// Exactly one of these is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Result(ResultView),
}

// ---------------------------------------------------------------------------
// Controls / input
// ---------------------------------------------------------------------------

/// Triggers that are disabled while their own request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Submit,
    CreateChannel,
    ConfirmUsername,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub submit: bool,
    pub create_channel: bool,
    pub confirm_username: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            submit: true,
            create_channel: true,
            confirm_username: true,
        }
    }
}

impl Controls {
    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::Submit => self.submit,
            Control::CreateChannel => self.create_channel,
            Control::ConfirmUsername => self.confirm_username,
        }
    }

    pub fn set_enabled(&mut self, control: Control, enabled: bool) {
        match control {
            Control::Submit => self.submit = enabled,
            Control::CreateChannel => self.create_channel = enabled,
            Control::ConfirmUsername => self.confirm_username = enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub text: String,
    pub hint: InputHint,
    pub placeholder: String,
    pub focused: bool,
}

impl Default for InputField {
    fn default() -> Self {
        InputField {
            text: String::new(),
            hint: InputHint::Neutral,
            placeholder: crate::cycles::PLACEHOLDERS[0].to_string(),
            focused: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub view: ViewState,
    pub surface: Surface,
    pub modals: Modals,
    pub notifications: NotificationCenter,
    pub controls: Controls,
    pub input: InputField,
    /// Wall-clock time of the last revealed result.
    pub checked_at: Option<DateTime<Local>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_keeps_content_until_rewritten() {
        let mut surface = Surface::default();
        assert_eq!(surface.text(SlotId::FragmentDecrease), "");

        surface.set_text(SlotId::FragmentDecrease, "5 TON");
        assert_eq!(surface.text(SlotId::FragmentDecrease), "5 TON");

        surface.set(
            SlotId::AvailableConfidence,
            SlotContent::Gauge {
                label: "87%".into(),
                fill_percent: 87.0,
            },
        );
        assert_eq!(surface.text(SlotId::AvailableConfidence), "87%");
        assert_eq!(surface.text(SlotId::FragmentDecrease), "5 TON");
    }

    #[test]
    fn controls_start_enabled() {
        let mut controls = Controls::default();
        assert!(controls.is_enabled(Control::Submit));
        controls.set_enabled(Control::CreateChannel, false);
        assert!(!controls.is_enabled(Control::CreateChannel));
        assert!(controls.is_enabled(Control::ConfirmUsername));
    }

    #[test]
    fn element_ids_are_unique() {
        use std::collections::HashSet;
        let ids = [
            SlotId::LoadingMessage,
            SlotId::UsageCount,
            SlotId::AvailableValue,
            SlotId::TakenValue,
            SlotId::FragmentMinBid,
            SlotId::FragmentMarketValue,
            SlotId::ConfirmUsername,
            SlotId::NewUsername,
        ];
        let set: HashSet<_> = ids.iter().map(|i| i.element_id()).collect();
        assert_eq!(set.len(), ids.len());
    }

    #[test]
    fn default_page_is_idle() {
        let page = Page::default();
        assert_eq!(page.view, ViewState::Idle);
        assert!(page.notifications.current().is_none());
        assert!(!page.modals.any_open());
        assert_eq!(page.input.placeholder, "Enter username");
    }
}
