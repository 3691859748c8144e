// Result renderer: turns one `Evaluation` into slot writes plus the count-ups
// the animator should start.
//
// Slots whose source field is absent are left as they are. Hiding the other
// result containers is implicit: the caller stores the returned `ResultView`
// and the view enum can only hold one.

use crate::animate::{AnimationRequest, Suffix};
use crate::evaluation::{Analysis, Evaluation, FragmentDetails, FragmentView};
use crate::page::{ResultView, SlotContent, SlotId, Surface};

/// Status headline when the marketplace did not send one.
pub const DEFAULT_FRAGMENT_STATUS: &str = "Fragment Auction";
/// Auction status line when the marketplace did not send one.
pub const DEFAULT_AUCTION_STATUS: &str = "Unknown";

/// What rendering an evaluation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub view: ResultView,
    pub animations: Vec<AnimationRequest>,
    /// Marketplace link to remember for view-fragment; only set for Fragment
    /// results, empty when the response carried none.
    pub fragment_url: Option<String>,
}

/// Display a number the way a plain template would: integers without a
/// fractional part, everything else as-is.
pub fn plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

pub fn handle_label(username: &str) -> String {
    format!("@{username}")
}

fn rarity_badge(analysis: &Analysis) -> SlotContent {
    SlotContent::Badge {
        label: analysis.rarity.label().to_string(),
        class: analysis.rarity.css_class(),
    }
}

fn confidence_gauge(analysis: &Analysis) -> SlotContent {
    SlotContent::Gauge {
        label: format!("{}%", plain_number(analysis.confidence)),
        fill_percent: analysis.confidence.clamp(0.0, 100.0),
    }
}

pub fn render_evaluation(evaluation: &Evaluation, username: &str, surface: &mut Surface) -> Rendered {
    match evaluation {
        Evaluation::Available { analysis } => Rendered {
            view: ResultView::Available,
            animations: render_analysis_card(
                analysis,
                username,
                surface,
                [
                    SlotId::AvailableUsername,
                    SlotId::AvailableRarity,
                    SlotId::AvailableValue,
                    SlotId::AvailableConfidence,
                ],
            ),
            fragment_url: None,
        },
        Evaluation::Taken { analysis } => Rendered {
            view: ResultView::Taken,
            animations: render_analysis_card(
                analysis,
                username,
                surface,
                [
                    SlotId::TakenUsername,
                    SlotId::TakenRarity,
                    SlotId::TakenValue,
                    SlotId::TakenConfidence,
                ],
            ),
            fragment_url: None,
        },
        Evaluation::FragmentAuction { details, analysis } => {
            let (sub, animations) = render_fragment(details, analysis, username, surface);
            Rendered {
                view: ResultView::Fragment(sub),
                animations,
                fragment_url: Some(details.fragment_url.clone().unwrap_or_default()),
            }
        }
    }
}

/// Available and Taken share one layout; only the slot ids differ.
fn render_analysis_card(
    analysis: &Analysis,
    username: &str,
    surface: &mut Surface,
    [name, rarity, value, confidence]: [SlotId; 4],
) -> Vec<AnimationRequest> {
    surface.set_text(name, handle_label(username));
    surface.set(rarity, rarity_badge(analysis));
    surface.set(confidence, confidence_gauge(analysis));
    vec![AnimationRequest::new(value, analysis.value, Suffix::Currency)]
}

fn render_fragment(
    details: &FragmentDetails,
    analysis: &Analysis,
    username: &str,
    surface: &mut Surface,
) -> (FragmentView, Vec<AnimationRequest>) {
    let mut animations = Vec::new();
    let status = details.status.as_deref().filter(|s| !s.is_empty());

    surface.set_text(SlotId::FragmentUsername, handle_label(username));
    surface.set_text(
        SlotId::FragmentStatus,
        status.unwrap_or(DEFAULT_FRAGMENT_STATUS),
    );

    let view = details.view();
    match view {
        FragmentView::OpenAuction => {
            if let Some(bid) = details.minimum_bid() {
                animations.push(AnimationRequest::new(SlotId::FragmentMinBid, bid, Suffix::None));
            }
            surface.set_text(
                SlotId::FragmentUsdPrice,
                FragmentDetails::usd_label(details.usd_price.as_ref()),
            );
            if let Some(step) = details.decreases_by() {
                surface.set_text(SlotId::FragmentDecrease, format!("{} TON", plain_number(step)));
            }
            if let Some(floor) = details.minimum_price() {
                surface.set_text(SlotId::FragmentMinimum, format!("{} TON", plain_number(floor)));
            }
        }
        FragmentView::Sold => {
            if let Some(price) = details.sold_price() {
                animations.push(AnimationRequest::new(SlotId::FragmentSoldPrice, price, Suffix::None));
            }
            surface.set_text(
                SlotId::FragmentSoldUsd,
                FragmentDetails::usd_label(details.sold_usd.as_ref()),
            );
        }
        FragmentView::LiveAuction => {
            if let Some(price) = details.current_price() {
                animations.push(AnimationRequest::new(
                    SlotId::FragmentCurrentBid,
                    price,
                    Suffix::None,
                ));
            }
            surface.set_text(
                SlotId::FragmentCurrentUsd,
                FragmentDetails::usd_label(details.usd_price.as_ref()),
            );
        }
        FragmentView::HeadlineOnly => {}
    }

    surface.set(SlotId::FragmentRarity, rarity_badge(analysis));
    animations.push(AnimationRequest::new(
        SlotId::FragmentMarketValue,
        details.market_value(analysis),
        Suffix::Currency,
    ));
    surface.set_text(
        SlotId::FragmentAuctionStatus,
        status.unwrap_or(DEFAULT_AUCTION_STATUS),
    );

    (view, animations)
}
