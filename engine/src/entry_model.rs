//! Entry model for the result entry form.
//!
//! The model is the single source of truth for every tier's entries and ticket
//! slots. The rendered form, the preview and the submission payload are all
//! projections of it; nothing is ever read back from the rendering surface.
//!
//! ## Shape
//!
//! - **Ranked tiers** (1st to 3rd): each entry carries one ticket slot, its own
//!   amount and a place.
//! - **Grouped tiers** (4th to 10th, consolation): each entry carries
//!   `row_width` ticket slots. Entry 0 owns the tier amount and every other
//!   entry holds a read-only mirror of it (see [`crate::amount_inheritance`]).
//!
//! Every tier always keeps at least one entry. Slots get a [`SlotId`] that
//! stays stable across removals, so asynchronous auto-save completions can
//! find their slot even after the entries around it were renumbered.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::{strip_whitespace, PrizeEntriesData, PrizeTier};
use std::fmt;

use crate::errors::EntryError;

/// Stable identity of a ticket slot for the lifetime of the page session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Auto-save status surfaced next to a ticket slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotStatus {
    /// No save pending and nothing to show
    #[default]
    Unsaved,
    Saving,
    Saved,
    /// Last save failed; carries the detail shown to the user
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketSlot {
    pub id: SlotId,
    pub value: String,
    pub status: SlotStatus,
    /// Last value the backend confirmed for this slot
    pub last_confirmed: Option<String>,
    /// Contiguous 1..N display number, `None` while the slot is empty
    pub ordinal: Option<usize>,
    /// Version of the most recent auto-save request sent for this slot
    pub sent_version: u64,
}

impl TicketSlot {
    fn new(id: SlotId) -> Self {
        Self {
            id,
            value: String::new(),
            status: SlotStatus::Unsaved,
            last_confirmed: None,
            ordinal: None,
            sent_version: 0,
        }
    }

    pub fn is_filled(&self) -> bool {
        !self.value.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrizeEntry {
    /// Position of the entry within its tier
    pub index: usize,
    pub amount: String,
    /// Only used by ranked tiers
    pub place: String,
    pub slots: Vec<TicketSlot>,
}

impl PrizeEntry {
    pub fn filled_tickets(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| slot.is_filled())
            .map(|slot| slot.value.as_str())
            .collect()
    }

    pub fn has_tickets(&self) -> bool {
        self.slots.iter().any(TicketSlot::is_filled)
    }

    /// True when nothing has been typed into the entry
    pub fn is_blank(&self) -> bool {
        !self.has_tickets() && self.amount.trim().is_empty() && self.place.trim().is_empty()
    }
}

/// All entries of one tier
#[derive(Debug, Clone, PartialEq)]
pub struct TierEntries {
    pub tier: PrizeTier,
    pub(crate) entries: Vec<PrizeEntry>,
}

impl TierEntries {
    pub fn entries(&self) -> &[PrizeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(PrizeEntry::is_blank)
    }

    pub fn entry(&self, index: usize) -> Option<&PrizeEntry> {
        self.entries.get(index)
    }

    /// Representative amount of the tier, i.e. the amount of entry 0
    pub fn amount(&self) -> &str {
        self.entries.first().map(|e| e.amount.as_str()).unwrap_or("")
    }

    /// Every non-empty ticket in entry and slot order
    pub fn filled_tickets(&self) -> Vec<&str> {
        self.entries.iter().flat_map(PrizeEntry::filled_tickets).collect()
    }

    pub fn ticket_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.slots.iter().filter(|s| s.is_filled()).count())
            .sum()
    }

    /// Display ordinals of the filled slots, in entry and slot order
    pub fn ordinals(&self) -> Vec<usize> {
        self.entries
            .iter()
            .flat_map(|e| e.slots.iter().filter_map(|s| s.ordinal))
            .collect()
    }

    /// A single blank entry is the minimum a tier can shrink to
    pub fn is_minimal_and_empty(&self) -> bool {
        self.entries.len() == 1 && self.is_empty()
    }

    fn reindex(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.index = index;
        }
    }

    /// Assigns 1..N to the filled slots and clears the ordinal of empty ones
    fn renumber(&mut self) -> usize {
        let mut next = 0;
        for slot in self.entries.iter_mut().flat_map(|e| e.slots.iter_mut()) {
            if slot.is_filled() {
                next += 1;
                slot.ordinal = Some(next);
            } else {
                slot.ordinal = None;
            }
        }
        next
    }
}

/// Result of a "clear all" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { removed_entries: usize },
    /// The tier was already a single blank entry
    NothingToClear,
    /// The caller did not confirm the destructive action; nothing changed
    ConfirmationRequired,
}

/// Outcome of a ticket or place edit after whitespace stripping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub value: String,
    pub removed_whitespace: usize,
    pub changed: bool,
}

/// Entries of every tier of the result form
#[derive(Debug, Clone, PartialEq)]
pub struct EntryModel {
    /// Indexed by [`PrizeTier::position`]
    tiers: Vec<TierEntries>,
    next_slot_id: u64,
}

impl Default for EntryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryModel {
    /// Create-mode model: every tier seeded with a single empty entry
    pub fn new() -> Self {
        let mut model = Self {
            tiers: Vec::with_capacity(PrizeTier::ALL.len()),
            next_slot_id: 1,
        };
        for tier in PrizeTier::ALL {
            let entry = model.new_entry(tier, 0, String::new());
            model.tiers.push(TierEntries { tier, entries: vec![entry] });
        }
        model
    }

    /// Edit-mode model seeded from persisted server rows
    pub fn hydrate(data: &PrizeEntriesData) -> Self {
        let mut model = Self::new();
        for (tier, rows) in data {
            let rows: Vec<_> = rows
                .iter()
                .filter(|row| !row.ticket_number.trim().is_empty())
                .collect();
            if rows.is_empty() {
                continue;
            }

            let mut entries = Vec::new();
            if tier.is_ranked() {
                for (index, row) in rows.iter().enumerate() {
                    let mut entry = model.new_entry(*tier, index, row.prize_amount.trim().to_string());
                    entry.place = strip_whitespace(row.place.as_deref().unwrap_or("")).0;
                    Self::confirm_slot(&mut entry.slots[0], &row.ticket_number);
                    entries.push(entry);
                }
            } else {
                let amount = rows[0].prize_amount.trim().to_string();
                for (index, chunk) in rows.chunks(tier.row_width()).enumerate() {
                    let mut entry = model.new_entry(*tier, index, amount.clone());
                    for (slot, row) in entry.slots.iter_mut().zip(chunk) {
                        Self::confirm_slot(slot, &row.ticket_number);
                    }
                    entries.push(entry);
                }
            }

            let mut tier_entries = TierEntries { tier: *tier, entries };
            tier_entries.renumber();
            info!("Hydrated {} with {} tickets", tier, tier_entries.ticket_count());
            *model.tier_mut(*tier) = tier_entries;
        }
        model
    }

    fn confirm_slot(slot: &mut TicketSlot, ticket: &str) {
        let value = strip_whitespace(ticket).0;
        slot.last_confirmed = Some(value.clone());
        slot.value = value;
    }

    /// Marks every grouped-tier slot as holding what the backend stores after
    /// a full submission. Saves still in flight become stale.
    pub fn confirm_all(&mut self) {
        for entries in self.tiers.iter_mut().filter(|entries| entries.tier.is_grouped()) {
            for slot in entries.entries.iter_mut().flat_map(|entry| entry.slots.iter_mut()) {
                slot.last_confirmed = slot.is_filled().then(|| slot.value.clone());
                if slot.status == SlotStatus::Saving {
                    slot.sent_version += 1;
                    slot.status = SlotStatus::Unsaved;
                }
            }
        }
        debug!("Confirmed every grouped slot against the submitted result");
    }

    fn allocate_slot_id(&mut self) -> SlotId {
        let id = SlotId(self.next_slot_id);
        self.next_slot_id += 1;
        id
    }

    pub(crate) fn new_entry(&mut self, tier: PrizeTier, index: usize, amount: String) -> PrizeEntry {
        let slots = (0..tier.row_width())
            .map(|_| TicketSlot::new(self.allocate_slot_id()))
            .collect();
        PrizeEntry {
            index,
            amount,
            place: String::new(),
            slots,
        }
    }

    pub fn tier(&self, tier: PrizeTier) -> &TierEntries {
        &self.tiers[tier.position()]
    }

    pub(crate) fn tier_mut(&mut self, tier: PrizeTier) -> &mut TierEntries {
        &mut self.tiers[tier.position()]
    }

    /// Every tier in storage order
    pub fn tiers(&self) -> impl Iterator<Item = &TierEntries> {
        self.tiers.iter()
    }

    pub fn total_tickets(&self) -> usize {
        self.tiers.iter().map(TierEntries::ticket_count).sum()
    }

    /// Appends an entry and returns its index. Grouped tiers start the new
    /// entry with a mirror of the current tier amount.
    pub fn add_entry(&mut self, tier: PrizeTier) -> usize {
        let index = self.tier(tier).len();
        let amount = if tier.is_grouped() {
            self.tier(tier).amount().to_string()
        } else {
            String::new()
        };
        let entry = self.new_entry(tier, index, amount);
        let entries = self.tier_mut(tier);
        entries.entries.push(entry);
        entries.renumber();
        debug!("Added entry {} to {}", index, tier);
        index
    }

    /// Removes an additional entry. The first entry of a tier is never removable.
    pub fn remove_entry(&mut self, tier: PrizeTier, index: usize) -> Result<PrizeEntry, EntryError> {
        if index == 0 {
            return Err(EntryError::CannotRemoveFirstEntry { tier });
        }
        let entries = self.tier_mut(tier);
        if index >= entries.entries.len() {
            return Err(EntryError::UnknownEntry { tier, index });
        }
        let removed = entries.entries.remove(index);
        entries.reindex();
        entries.renumber();
        debug!("Removed entry {} from {}", index, tier);
        Ok(removed)
    }

    /// Recomputes the contiguous display ordinals of a tier, returning N
    pub fn renumber(&mut self, tier: PrizeTier) -> usize {
        self.tier_mut(tier).renumber()
    }

    /// Drops every entry but the first and empties the first one
    pub fn clear_all(&mut self, tier: PrizeTier, confirmed: bool) -> ClearOutcome {
        if self.tier(tier).is_minimal_and_empty() {
            return ClearOutcome::NothingToClear;
        }
        if !confirmed {
            return ClearOutcome::ConfirmationRequired;
        }

        let entries = self.tier_mut(tier);
        let removed_entries = entries.entries.len() - 1;
        entries.entries.truncate(1);
        let first = &mut entries.entries[0];
        first.amount.clear();
        first.place.clear();
        for slot in &mut first.slots {
            slot.value.clear();
            slot.status = SlotStatus::Unsaved;
        }
        entries.renumber();
        info!("Cleared {} ({} additional entries removed)", tier, removed_entries);
        ClearOutcome::Cleared { removed_entries }
    }

    fn entry_mut(&mut self, tier: PrizeTier, index: usize) -> Result<&mut PrizeEntry, EntryError> {
        self.tier_mut(tier)
            .entries
            .get_mut(index)
            .ok_or(EntryError::UnknownEntry { tier, index })
    }

    /// Sets a ticket value, stripping whitespace at edit time
    pub fn set_ticket(
        &mut self,
        tier: PrizeTier,
        entry: usize,
        slot: usize,
        raw: &str,
    ) -> Result<FieldEdit, EntryError> {
        let (value, removed_whitespace) = strip_whitespace(raw);
        let target = self
            .entry_mut(tier, entry)?
            .slots
            .get_mut(slot)
            .ok_or(EntryError::UnknownSlot { tier, entry, slot })?;

        let changed = target.value != value;
        let filled_changed = target.value.is_empty() != value.is_empty();
        if changed {
            target.value = value.clone();
            if target.status != SlotStatus::Saving {
                target.status = SlotStatus::Unsaved;
            }
        }
        if filled_changed {
            self.renumber(tier);
        }

        Ok(FieldEdit {
            value,
            removed_whitespace,
            changed,
        })
    }

    /// Sets the place of a ranked entry, stripping whitespace at edit time
    pub fn set_place(&mut self, tier: PrizeTier, entry: usize, raw: &str) -> Result<FieldEdit, EntryError> {
        if !tier.is_ranked() {
            return Err(EntryError::PlaceNotSupported { tier });
        }
        let (value, removed_whitespace) = strip_whitespace(raw);
        let target = self.entry_mut(tier, entry)?;
        let changed = target.place != value;
        target.place = value.clone();
        Ok(FieldEdit {
            value,
            removed_whitespace,
            changed,
        })
    }

    /// Finds a slot by id, returning (tier, entry index, slot index)
    pub fn locate_slot(&self, id: SlotId) -> Option<(PrizeTier, usize, usize)> {
        self.tiers.iter().find_map(|tier_entries| {
            tier_entries.entries.iter().find_map(|entry| {
                entry
                    .slots
                    .iter()
                    .position(|slot| slot.id == id)
                    .map(|slot| (tier_entries.tier, entry.index, slot))
            })
        })
    }

    pub fn slot(&self, id: SlotId) -> Option<&TicketSlot> {
        self.tiers
            .iter()
            .flat_map(|t| t.entries.iter())
            .flat_map(|e| e.slots.iter())
            .find(|slot| slot.id == id)
    }

    pub(crate) fn slot_mut(&mut self, id: SlotId) -> Option<&mut TicketSlot> {
        self.tiers
            .iter_mut()
            .flat_map(|t| t.entries.iter_mut())
            .flat_map(|e| e.slots.iter_mut())
            .find(|slot| slot.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::HydratedPrizeEntry;

    fn row(ticket: &str, amount: &str, place: Option<&str>) -> HydratedPrizeEntry {
        HydratedPrizeEntry {
            ticket_number: ticket.to_string(),
            prize_amount: amount.to_string(),
            place: place.map(str::to_string),
        }
    }

    fn assert_contiguous(model: &EntryModel, tier: PrizeTier) {
        let ordinals = model.tier(tier).ordinals();
        let expected: Vec<usize> = (1..=model.tier(tier).ticket_count()).collect();
        assert_eq!(ordinals, expected);
    }

    #[test]
    fn test_new_model_seeds_one_empty_entry_per_tier() {
        let model = EntryModel::new();
        for tier in PrizeTier::ALL {
            let entries = model.tier(tier);
            assert_eq!(entries.len(), 1);
            assert!(entries.is_minimal_and_empty());
            assert_eq!(entries.entries()[0].slots.len(), tier.row_width());
        }
        assert_eq!(model.total_tickets(), 0);
    }

    #[test]
    fn test_slot_ids_are_unique() {
        let mut model = EntryModel::new();
        model.add_entry(PrizeTier::Consolation);
        let mut ids: Vec<SlotId> = model
            .tiers()
            .flat_map(|t| t.entries().iter())
            .flat_map(|e| e.slots.iter().map(|s| s.id))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_add_entry_mirrors_grouped_amount() {
        let mut model = EntryModel::new();
        model.tier_mut(PrizeTier::Fifth).entries[0].amount = "2000".to_string();

        let index = model.add_entry(PrizeTier::Fifth);

        assert_eq!(index, 1);
        assert_eq!(model.tier(PrizeTier::Fifth).entries()[1].amount, "2000");
    }

    #[test]
    fn test_add_entry_ranked_starts_blank() {
        let mut model = EntryModel::new();
        model.tier_mut(PrizeTier::First).entries[0].amount = "7500000".to_string();

        model.add_entry(PrizeTier::First);

        assert_eq!(model.tier(PrizeTier::First).entries()[1].amount, "");
    }

    #[test]
    fn test_first_entry_cannot_be_removed() {
        let mut model = EntryModel::new();
        assert_eq!(
            model.remove_entry(PrizeTier::Fourth, 0),
            Err(EntryError::CannotRemoveFirstEntry { tier: PrizeTier::Fourth })
        );
        assert_eq!(
            model.remove_entry(PrizeTier::Fourth, 3),
            Err(EntryError::UnknownEntry { tier: PrizeTier::Fourth, index: 3 })
        );
    }

    #[test]
    fn test_renumber_after_removal_is_contiguous() {
        let tier = PrizeTier::Consolation;
        let mut model = EntryModel::new();
        model.add_entry(tier);
        model.add_entry(tier);
        model.set_ticket(tier, 0, 0, "1111").unwrap();
        model.set_ticket(tier, 1, 2, "2222").unwrap();
        model.set_ticket(tier, 2, 1, "3333").unwrap();
        model.set_ticket(tier, 0, 2, "4444").unwrap();
        assert_contiguous(&model, tier);

        model.remove_entry(tier, 1).unwrap();

        assert_contiguous(&model, tier);
        assert_eq!(model.tier(tier).filled_tickets(), vec!["1111", "4444", "3333"]);
        assert_eq!(model.tier(tier).entries()[1].index, 1);
    }

    #[test]
    fn test_set_ticket_strips_whitespace() {
        let mut model = EntryModel::new();
        let edit = model.set_ticket(PrizeTier::First, 0, 0, " KA 123456 ").unwrap();
        assert_eq!(edit.value, "KA123456");
        assert_eq!(edit.removed_whitespace, 3);
        assert!(edit.changed);
        assert_eq!(model.tier(PrizeTier::First).filled_tickets(), vec!["KA123456"]);
    }

    #[test]
    fn test_set_ticket_unknown_slot() {
        let mut model = EntryModel::new();
        assert_eq!(
            model.set_ticket(PrizeTier::Fourth, 0, 7, "1"),
            Err(EntryError::UnknownSlot { tier: PrizeTier::Fourth, entry: 0, slot: 7 })
        );
    }

    #[test]
    fn test_edit_clears_failed_status() {
        let mut model = EntryModel::new();
        let id = model.tier(PrizeTier::Sixth).entries()[0].slots[0].id;
        model.slot_mut(id).unwrap().status = SlotStatus::Failed("boom".to_string());

        model.set_ticket(PrizeTier::Sixth, 0, 0, "123456").unwrap();

        assert_eq!(model.slot(id).unwrap().status, SlotStatus::Unsaved);
    }

    #[test]
    fn test_place_only_for_ranked_tiers() {
        let mut model = EntryModel::new();
        let edit = model.set_place(PrizeTier::Second, 0, "Thrissur ").unwrap();
        assert_eq!(edit.value, "Thrissur");
        assert_eq!(
            model.set_place(PrizeTier::Fourth, 0, "x"),
            Err(EntryError::PlaceNotSupported { tier: PrizeTier::Fourth })
        );
    }

    #[test]
    fn test_clear_all_requires_confirmation() {
        let tier = PrizeTier::Fourth;
        let mut model = EntryModel::new();
        model.add_entry(tier);
        model.set_ticket(tier, 1, 0, "KC123456").unwrap();

        assert_eq!(model.clear_all(tier, false), ClearOutcome::ConfirmationRequired);
        assert_eq!(model.tier(tier).len(), 2);

        assert_eq!(model.clear_all(tier, true), ClearOutcome::Cleared { removed_entries: 1 });
        assert!(model.tier(tier).is_minimal_and_empty());
    }

    #[test]
    fn test_clear_all_on_empty_tier_is_idempotent() {
        let mut model = EntryModel::new();
        let before = model.clone();
        assert_eq!(model.clear_all(PrizeTier::Ninth, true), ClearOutcome::NothingToClear);
        assert_eq!(model.clear_all(PrizeTier::Ninth, false), ClearOutcome::NothingToClear);
        assert_eq!(model, before);
    }

    #[test]
    fn test_hydrate_packs_grouped_rows_by_row_width() {
        let mut data = PrizeEntriesData::new();
        data.insert(
            PrizeTier::Consolation,
            vec![
                row("KA111111", "8000.00", None),
                row("KB222222", "8000.00", None),
                row("KC333333", "8000.00", None),
                row("KD444444", "8000.00", None),
            ],
        );
        data.insert(
            PrizeTier::First,
            vec![row("KA123456", "7500000.00", Some("Kollam"))],
        );

        let model = EntryModel::hydrate(&data);

        let consolation = model.tier(PrizeTier::Consolation);
        assert_eq!(consolation.len(), 2);
        assert_eq!(consolation.amount(), "8000.00");
        assert_eq!(consolation.entries()[1].amount, "8000.00");
        assert_eq!(consolation.entries()[1].filled_tickets(), vec!["KD444444"]);
        assert_eq!(
            consolation.entries()[0].slots[1].last_confirmed.as_deref(),
            Some("KB222222")
        );
        assert_contiguous(&model, PrizeTier::Consolation);

        let first = model.tier(PrizeTier::First);
        assert_eq!(first.entries()[0].place, "Kollam");
        assert_eq!(first.amount(), "7500000.00");

        assert!(model.tier(PrizeTier::Tenth).is_minimal_and_empty());
    }

    #[test]
    fn test_locate_slot_follows_removals() {
        let tier = PrizeTier::Fourth;
        let mut model = EntryModel::new();
        model.add_entry(tier);
        model.add_entry(tier);
        let id = model.tier(tier).entries()[2].slots[1].id;

        model.remove_entry(tier, 1).unwrap();

        assert_eq!(model.locate_slot(id), Some((tier, 1, 1)));
        assert_eq!(model.locate_slot(SlotId(9999)), None);
    }
}
