//! Amount inheritance for grouped tiers.
//!
//! A grouped tier has exactly one editable amount, the one on entry 0. Every
//! other entry holds a read-only mirror that is overwritten in the same call
//! whenever the editable amount changes. Ranked tiers have no inheritance and
//! each entry's amount is edited independently.

use log::debug;
use shared::PrizeTier;

use crate::entry_model::EntryModel;
use crate::errors::EntryError;

/// Result of an amount edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountEdit {
    pub value: String,
    /// Number of mirrors overwritten by the edit
    pub mirrors_updated: usize,
}

impl EntryModel {
    /// Whether the amount input of an entry accepts edits
    pub fn is_amount_editable(&self, tier: PrizeTier, entry: usize) -> bool {
        tier.is_ranked() || entry == 0
    }

    /// Current amount governing the tickets of an entry
    pub fn effective_amount(&self, tier: PrizeTier, entry: usize) -> &str {
        let entries = self.tier(tier);
        if tier.is_grouped() {
            entries.amount()
        } else {
            entries.entry(entry).map(|e| e.amount.as_str()).unwrap_or("")
        }
    }

    /// Edits an amount. Editing entry 0 of a grouped tier rewrites every mirror;
    /// editing a mirror directly is refused.
    pub fn set_amount(&mut self, tier: PrizeTier, entry: usize, raw: &str) -> Result<AmountEdit, EntryError> {
        let value = raw.trim().to_string();
        if entry >= self.tier(tier).len() {
            return Err(EntryError::UnknownEntry { tier, index: entry });
        }
        if !self.is_amount_editable(tier, entry) {
            return Err(EntryError::ReadOnlyAmount { tier, entry });
        }

        if tier.is_ranked() {
            self.tier_mut(tier).entries[entry].amount = value.clone();
            return Ok(AmountEdit {
                value,
                mirrors_updated: 0,
            });
        }

        self.tier_mut(tier).entries[0].amount = value.clone();
        let mirrors_updated = self.sync_mirrors(tier);
        Ok(AmountEdit { value, mirrors_updated })
    }

    /// Copies the entry-0 amount into every other entry of a grouped tier
    pub fn sync_mirrors(&mut self, tier: PrizeTier) -> usize {
        if !tier.is_grouped() {
            return 0;
        }
        let entries = self.tier_mut(tier);
        let Some((first, mirrors)) = entries.entries.split_first_mut() else {
            return 0;
        };
        for mirror in mirrors.iter_mut() {
            mirror.amount.clone_from(&first.amount);
        }
        debug!("Synced {} amount mirrors of {}", mirrors.len(), tier);
        mirrors.len()
    }

    /// True when every mirror of a grouped tier equals its entry-0 amount
    pub fn mirrors_consistent(&self, tier: PrizeTier) -> bool {
        let entries = self.tier(tier);
        tier.is_ranked() || entries.entries().iter().all(|e| e.amount == entries.amount())
    }
}
