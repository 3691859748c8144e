// Evaluation model: the three result variants and the Fragment
// sub-presentation rules.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Categorical label from the backend. Used only for badge styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    Basic,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythical,
    /// A label this client does not know; rendered verbatim.
    Other(String),
}

impl Rarity {
    pub fn label(&self) -> &str {
        match self {
            Rarity::Basic => "Basic",
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythical => "Mythical",
            Rarity::Other(label) => label,
        }
    }

    /// Styling class, e.g. `rarity-legendary`.
    pub fn css_class(&self) -> String {
        format!("rarity-{}", self.label().to_lowercase())
    }
}

impl From<String> for Rarity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Basic" => Rarity::Basic,
            "Common" => Rarity::Common,
            "Uncommon" => Rarity::Uncommon,
            "Rare" => Rarity::Rare,
            "Epic" => Rarity::Epic,
            "Legendary" => Rarity::Legendary,
            "Mythical" => Rarity::Mythical,
            _ => Rarity::Other(s),
        }
    }
}

impl From<Rarity> for String {
    fn from(r: Rarity) -> Self {
        r.label().to_string()
    }
}

// ---------------------------------------------------------------------------
// Analysis / Fragment details
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub rarity: Rarity,
    pub value: f64,
    /// 0..=100.
    pub confidence: f64,
}

/// A price the backend sends either as a number or as a preformatted string
/// (USD figures arrive as strings with separators removed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    fn is_blank(&self) -> bool {
        match self {
            Amount::Number(n) => *n == 0.0,
            Amount::Text(s) => s.is_empty(),
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Number(n) => f.write_str(&crate::render::plain_number(*n)),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

/// Marketplace data for a username listed on Fragment. Every field is
/// optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentDetails {
    pub status: Option<String>,
    pub available: bool,
    pub fragment_url: Option<String>,
    pub minimum_bid: Option<f64>,
    pub usd_price: Option<Amount>,
    pub decreases_by: Option<f64>,
    pub minimum_price: Option<f64>,
    pub sold_price: Option<f64>,
    pub sold_usd: Option<Amount>,
    pub current_price: Option<f64>,
}

/// Zero counts as absent for marketplace figures.
fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|n| *n != 0.0)
}

impl FragmentDetails {
    pub fn minimum_bid(&self) -> Option<f64> {
        present(self.minimum_bid)
    }

    pub fn current_price(&self) -> Option<f64> {
        present(self.current_price)
    }

    pub fn sold_price(&self) -> Option<f64> {
        present(self.sold_price)
    }

    pub fn decreases_by(&self) -> Option<f64> {
        present(self.decreases_by)
    }

    pub fn minimum_price(&self) -> Option<f64> {
        present(self.minimum_price)
    }

    /// `"~ $<amount>"`, with `0` standing in for a missing amount.
    pub fn usd_label(amount: Option<&Amount>) -> String {
        match amount {
            Some(a) if !a.is_blank() => format!("~ ${a}"),
            _ => "~ $0".to_string(),
        }
    }

    /// Which marketplace sub-panel applies, checked in priority order.
    pub fn view(&self) -> FragmentView {
        let status = self.status.as_deref();
        if self.available && self.minimum_bid().is_some() {
            FragmentView::OpenAuction
        } else if status == Some("Sold") && self.sold_price().is_some() {
            FragmentView::Sold
        } else if status == Some("Active Auction") && self.current_price().is_some() {
            FragmentView::LiveAuction
        } else {
            FragmentView::HeadlineOnly
        }
    }

    /// Market value: the first present of minimum bid, current price and
    /// sold price, falling back to the generic analysis value.
    pub fn market_value(&self, analysis: &Analysis) -> f64 {
        self.minimum_bid()
            .or_else(|| self.current_price())
            .or_else(|| self.sold_price())
            .unwrap_or(analysis.value)
    }
}

/// Fragment sub-presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentView {
    OpenAuction,
    Sold,
    LiveAuction,
    HeadlineOnly,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// One check result, built from the response and consumed by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Available {
        analysis: Analysis,
    },
    Taken {
        analysis: Analysis,
    },
    FragmentAuction {
        details: FragmentDetails,
        analysis: Analysis,
    },
}

impl Evaluation {
    /// Apply the selection rule: Fragment flag first, then availability.
    pub fn select(
        fragment_auction: bool,
        available: bool,
        details: Option<FragmentDetails>,
        analysis: Analysis,
    ) -> Self {
        if fragment_auction {
            Evaluation::FragmentAuction {
                details: details.unwrap_or_default(),
                analysis,
            }
        } else if available {
            Evaluation::Available { analysis }
        } else {
            Evaluation::Taken { analysis }
        }
    }
}
