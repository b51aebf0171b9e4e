//! # Result preview
//!
//! Builds the read-only, mobile-style rendering of a result from either the
//! live [`EntryModel`] or the hydrated server rows of an edit session.
//!
//! ## Key Responsibilities
//! - Collect the non-empty rows of every tier in display order
//! - Pick the ticket layout of each prize card
//! - Format amounts in Indian digit grouping (`₹1,00,000/-`)
//! - Gate re-rendering on a hash of the collected document

use log::debug;
use shared::{parse_amount, Draw, PrizeEntriesData, PrizeTier};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::entry_model::EntryModel;

pub const NO_DATA_MESSAGE: &str = "Fill in the form data to see the preview";

/// Grouped tiers other than consolation switch to a grid above this many tickets
const LIST_LAYOUT_MAX: usize = 4;

/// Timing of the preview panel
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    /// Periodic refresh while the preview is visible
    pub refresh_interval_ms: u32,
    /// Coalescing window for edits
    pub debounce_ms: u32,
    /// How long the visibility toggle stays locked
    pub toggle_lock_ms: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 2000,
            debounce_ms: 300,
            toggle_lock_ms: 600,
        }
    }
}

/// Where the preview reads its prize rows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewSource {
    Live,
    Hydrated,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHeader {
    /// dd/mm/yyyy, or "No Date"
    pub date: String,
    /// Draw number, or "No Draw Number"
    pub draw_number: String,
    pub lottery_name: String,
    pub published: bool,
    pub bumper: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketLayout {
    /// Ranked tiers: one ticket per line with its place
    WithPlace,
    Grid,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewTicket {
    pub ticket: String,
    pub place: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrizeCard {
    pub tier: PrizeTier,
    pub title: String,
    pub amount: String,
    pub layout: TicketLayout,
    pub tickets: Vec<PreviewTicket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreviewDocument {
    /// Nothing has been filled in yet
    NoData,
    Ready {
        source: PreviewSource,
        header: Option<PreviewHeader>,
        cards: Vec<PrizeCard>,
    },
}

impl PreviewDocument {
    pub fn cards(&self) -> &[PrizeCard] {
        match self {
            PreviewDocument::NoData => &[],
            PreviewDocument::Ready { cards, .. } => cards,
        }
    }

    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// A collected row of one tier: amount, ticket and place
struct PreviewRow {
    amount: String,
    ticket: String,
    place: String,
}

pub struct PreviewProjection;

impl PreviewProjection {
    /// Builds the preview. Hydrated rows win over the live model when given.
    pub fn project(draw: &Draw, model: &EntryModel, hydrated: Option<&PrizeEntriesData>) -> PreviewDocument {
        let source = match hydrated {
            Some(data) if data.values().any(|rows| !rows.is_empty()) => PreviewSource::Hydrated,
            _ => PreviewSource::Live,
        };

        let mut cards = Vec::new();
        for tier in PrizeTier::DISPLAY_ORDER {
            let rows = match (source, hydrated) {
                (PreviewSource::Hydrated, Some(data)) => Self::hydrated_rows(data, tier),
                _ => Self::live_rows(model, tier),
            };
            if let Some(card) = Self::card(tier, &rows) {
                cards.push(card);
            }
        }

        if cards.is_empty() {
            return PreviewDocument::NoData;
        }
        debug!("Projected preview with {} prize cards from {:?}", cards.len(), source);
        PreviewDocument::Ready {
            source,
            header: Self::header(draw),
            cards,
        }
    }

    fn header(draw: &Draw) -> Option<PreviewHeader> {
        if draw.date.trim().is_empty() && draw.draw_number.trim().is_empty() {
            return None;
        }
        let draw_number = if draw.draw_number.trim().is_empty() {
            "No Draw Number".to_string()
        } else {
            draw.draw_number.trim().to_string()
        };
        Some(PreviewHeader {
            date: draw.formatted_date().unwrap_or_else(|| "No Date".to_string()),
            draw_number,
            lottery_name: draw.lottery_name.clone(),
            published: draw.is_published,
            bumper: draw.is_bumper,
        })
    }

    fn live_rows(model: &EntryModel, tier: PrizeTier) -> Vec<PreviewRow> {
        let mut rows = Vec::new();
        for entry in model.tier(tier).entries() {
            let amount = model.effective_amount(tier, entry.index).trim().to_string();
            let place = entry.place.trim().to_string();
            let tickets = entry.filled_tickets();
            if tickets.is_empty() {
                if !amount.is_empty() {
                    rows.push(PreviewRow {
                        amount,
                        ticket: String::new(),
                        place,
                    });
                }
                continue;
            }
            for ticket in tickets {
                rows.push(PreviewRow {
                    amount: amount.clone(),
                    ticket: ticket.to_string(),
                    place: place.clone(),
                });
            }
        }
        rows
    }

    fn hydrated_rows(data: &PrizeEntriesData, tier: PrizeTier) -> Vec<PreviewRow> {
        data.get(&tier)
            .map(|rows| {
                rows.iter()
                    .map(|row| PreviewRow {
                        amount: row.prize_amount.trim().to_string(),
                        ticket: row.ticket_number.trim().to_string(),
                        place: row.place.as_deref().unwrap_or("").trim().to_string(),
                    })
                    .filter(|row| !row.amount.is_empty() || !row.ticket.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn card(tier: PrizeTier, rows: &[PreviewRow]) -> Option<PrizeCard> {
        let first = rows.first()?;
        let tickets: Vec<PreviewTicket> = rows
            .iter()
            .filter(|row| !row.ticket.is_empty())
            .map(|row| PreviewTicket {
                ticket: row.ticket.clone(),
                place: (tier.is_ranked() && !row.place.is_empty()).then(|| row.place.clone()),
            })
            .collect();

        let layout = if tier.is_ranked() {
            TicketLayout::WithPlace
        } else if tier == PrizeTier::Consolation || tickets.len() > LIST_LAYOUT_MAX {
            TicketLayout::Grid
        } else {
            TicketLayout::List
        };

        Some(PrizeCard {
            tier,
            title: tier.title(),
            amount: format_inr(&first.amount),
            layout,
            tickets,
        })
    }
}

/// Formats an amount as whole rupees with Indian digit grouping, e.g. `₹1,00,000/-`
pub fn format_inr(amount: &str) -> String {
    let Some(value) = parse_amount(amount) else {
        return "₹0/-".to_string();
    };
    let rupees = value.trunc() as i64;
    let digits = rupees.unsigned_abs().to_string();
    let sign = if rupees < 0 { "-" } else { "" };

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };
    format!("₹{}{}/-", sign, grouped)
}

/// Suppresses re-rendering of an unchanged preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewGate {
    last: Option<u64>,
}

impl PreviewGate {
    /// True when the document differs from the last rendered one
    pub fn should_render(&mut self, document: &PreviewDocument) -> bool {
        let fingerprint = document.fingerprint();
        if self.last == Some(fingerprint) {
            return false;
        }
        self.last = Some(fingerprint);
        true
    }

    /// Forgets the last render, e.g. when the preview is hidden
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::HydratedPrizeEntry;

    fn draw() -> Draw {
        Draw {
            lottery: "2".to_string(),
            lottery_name: "Win-Win".to_string(),
            draw_number: "W-812".to_string(),
            date: "2025-03-07".to_string(),
            is_published: true,
            ..Draw::default()
        }
    }

    #[test]
    fn test_format_inr_grouping() {
        assert_eq!(format_inr("100"), "₹100/-");
        assert_eq!(format_inr("5000"), "₹5,000/-");
        assert_eq!(format_inr("100000"), "₹1,00,000/-");
        assert_eq!(format_inr("7500000.00"), "₹75,00,000/-");
        assert_eq!(format_inr("12345678"), "₹1,23,45,678/-");
        assert_eq!(format_inr(""), "₹0/-");
        assert_eq!(format_inr("abc"), "₹0/-");
    }

    #[test]
    fn test_empty_model_has_no_data() {
        let document = PreviewProjection::project(&draw(), &EntryModel::new(), None);
        assert_eq!(document, PreviewDocument::NoData);
    }

    #[test]
    fn test_cards_follow_display_order_and_layouts() {
        let mut model = EntryModel::new();
        model.set_amount(PrizeTier::First, 0, "7500000").unwrap();
        model.set_ticket(PrizeTier::First, 0, 0, "WA123456").unwrap();
        model.set_place(PrizeTier::First, 0, "Kollam").unwrap();
        model.set_amount(PrizeTier::Fourth, 0, "5000").unwrap();
        model.set_ticket(PrizeTier::Fourth, 0, 0, "WB111111").unwrap();
        model.bulk_import(PrizeTier::Consolation, "8000", "WC1 WC2").unwrap();
        model
            .bulk_import(PrizeTier::Seventh, "500", "1111 2222 3333 4444 5555")
            .unwrap();

        let document = PreviewProjection::project(&draw(), &model, None);

        let tiers: Vec<PrizeTier> = document.cards().iter().map(|c| c.tier).collect();
        assert_eq!(
            tiers,
            vec![PrizeTier::First, PrizeTier::Consolation, PrizeTier::Fourth, PrizeTier::Seventh]
        );
        let cards = document.cards();
        assert_eq!(cards[0].layout, TicketLayout::WithPlace);
        assert_eq!(cards[0].amount, "₹75,00,000/-");
        assert_eq!(cards[0].tickets[0].place.as_deref(), Some("Kollam"));
        assert_eq!(cards[1].layout, TicketLayout::Grid);
        assert_eq!(cards[2].layout, TicketLayout::List);
        assert_eq!(cards[3].layout, TicketLayout::Grid);
        assert_eq!(cards[3].tickets.len(), 5);
    }

    #[test]
    fn test_header_formats_date() {
        let mut model = EntryModel::new();
        model.set_ticket(PrizeTier::Second, 0, 0, "WA000001").unwrap();

        let PreviewDocument::Ready { header, source, .. } = PreviewProjection::project(&draw(), &model, None) else {
            panic!("expected a rendered preview");
        };

        let header = header.unwrap();
        assert_eq!(source, PreviewSource::Live);
        assert_eq!(header.date, "07/03/2025");
        assert_eq!(header.draw_number, "W-812");
        assert!(header.published);
    }

    #[test]
    fn test_hydrated_rows_are_preferred() {
        let mut model = EntryModel::new();
        model.set_ticket(PrizeTier::Second, 0, 0, "LIVE0001").unwrap();
        let mut data = PrizeEntriesData::new();
        data.insert(
            PrizeTier::Third,
            vec![HydratedPrizeEntry {
                ticket_number: "SAVED001".to_string(),
                prize_amount: "100000.00".to_string(),
                place: Some("Kannur".to_string()),
            }],
        );

        let document = PreviewProjection::project(&draw(), &model, Some(&data));

        let cards = document.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].tier, PrizeTier::Third);
        assert_eq!(cards[0].amount, "₹1,00,000/-");
        assert_eq!(cards[0].tickets[0].ticket, "SAVED001");
    }

    #[test]
    fn test_empty_hydration_falls_back_to_live_model() {
        let mut model = EntryModel::new();
        model.set_ticket(PrizeTier::Second, 0, 0, "LIVE0001").unwrap();
        let data = PrizeEntriesData::new();

        let document = PreviewProjection::project(&draw(), &model, Some(&data));

        assert_eq!(document.cards()[0].tickets[0].ticket, "LIVE0001");
    }

    #[test]
    fn test_gate_skips_unchanged_documents() {
        let mut model = EntryModel::new();
        model.set_ticket(PrizeTier::First, 0, 0, "WA123456").unwrap();
        let mut gate = PreviewGate::default();

        let document = PreviewProjection::project(&draw(), &model, None);
        assert!(gate.should_render(&document));
        assert!(!gate.should_render(&PreviewProjection::project(&draw(), &model, None)));

        model.set_place(PrizeTier::First, 0, "Kochi").unwrap();
        assert!(gate.should_render(&PreviewProjection::project(&draw(), &model, None)));

        gate.reset();
        assert!(gate.should_render(&PreviewProjection::project(&draw(), &model, None)));
    }
}
