//! # Auto-save of grouped-tier ticket slots
//!
//! A ticket slot of a grouped tier is persisted on its own as soon as the
//! user leaves it, without submitting the whole form.
//!
//! ## Lifecycle
//!
//! 1. [`EntryModel::begin_auto_save`] checks the preconditions, bumps the
//!    slot's version and marks it `Saving`. It returns the [`PendingSave`]
//!    describing the request to send.
//! 2. The caller hands the request to an [`AutoSaveTransport`] through
//!    [`dispatch`]. Calls are fire-and-forget and never block editing.
//! 3. [`EntryModel::complete_auto_save`] applies the response, but only if it
//!    belongs to the latest request sent for that slot. Older responses are
//!    dropped as stale. A confirmed save always records the sent value, but
//!    the slot only shows `Saved` or `Failed` while it still holds that value.
//! 4. [`EntryModel::clear_status`] is run by the status timers and is
//!    version-checked the same way.
//!
//! Failures never retry. The next edit of the slot starts over.

use async_trait::async_trait;
use log::{debug, info, warn};
use shared::{AutoSaveRequest, AutoSaveResponse, Draw, PrizeTier};

use crate::entry_model::{EntryModel, SlotId, SlotStatus};
use crate::errors::{AutoSaveError, PersistenceError, PreconditionError};
use crate::validation::Validator;

/// Timing of the auto-save flow
#[derive(Debug, Clone, PartialEq)]
pub struct AutoSaveConfig {
    /// Delay between leaving a slot and issuing the request
    pub settle_delay_ms: u32,
    /// How long a "saved" marker stays visible
    pub saved_clear_ms: u32,
    /// How long a "failed" marker stays visible unless the slot is edited
    pub failed_clear_ms: u32,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            saved_clear_ms: 3000,
            failed_clear_ms: 5000,
        }
    }
}

impl AutoSaveConfig {
    /// Delay after which a status should be cleared, if it clears at all
    pub fn clear_delay_ms(&self, status: &SlotStatus) -> Option<u32> {
        match status {
            SlotStatus::Saved => Some(self.saved_clear_ms),
            SlotStatus::Failed(_) => Some(self.failed_clear_ms),
            SlotStatus::Unsaved | SlotStatus::Saving => None,
        }
    }
}

/// A request that has been issued for a slot and not yet completed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub slot: SlotId,
    pub tier: PrizeTier,
    pub version: u64,
    pub request: AutoSaveRequest,
}

/// What happened to a completion handed back to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The response was current and the slot now shows this status
    Applied(SlotStatus),
    /// A newer request was sent for the slot since; nothing changed
    Stale,
    /// The slot was removed while the request was in flight
    SlotGone,
}

/// Sends a single auto-save request to the backend
#[async_trait(?Send)]
pub trait AutoSaveTransport {
    async fn send(&self, request: &AutoSaveRequest) -> Result<AutoSaveResponse, String>;
}

/// Sends a pending save, tagging transport failures with the tier
pub async fn dispatch<T>(transport: &T, pending: &PendingSave) -> Result<AutoSaveResponse, PersistenceError>
where
    T: AutoSaveTransport + ?Sized,
{
    debug!(
        "Auto-saving {} slot {} (version {})",
        pending.tier, pending.slot, pending.version
    );
    transport
        .send(&pending.request)
        .await
        .map_err(|message| PersistenceError {
            tier: pending.tier,
            message,
        })
}

impl EntryModel {
    /// Prepares an auto-save for a slot that just lost focus.
    ///
    /// Returns `Ok(None)` when there is nothing to send: the slot is empty or
    /// still holds the value the backend last confirmed.
    pub fn begin_auto_save(&mut self, draw: &Draw, slot: SlotId) -> Result<Option<PendingSave>, AutoSaveError> {
        let (tier, _, _) = self.locate_slot(slot).ok_or(AutoSaveError::UnknownSlot(slot))?;
        let amount = self.tier(tier).amount().to_string();
        let target = self.slot_mut(slot).ok_or(AutoSaveError::UnknownSlot(slot))?;
        if target.value.is_empty() || target.last_confirmed.as_deref() == Some(target.value.as_str()) {
            return Ok(None);
        }

        if !tier.is_grouped() {
            return Err(PreconditionError::NotGroupedTier { tier }.into());
        }
        let result_id = draw.result_id.ok_or(PreconditionError::DrawNotSaved { tier })?;
        Validator::check_ticket(tier, &target.value)?;
        Validator::check_amount(tier, &amount)?;

        target.sent_version += 1;
        target.status = SlotStatus::Saving;
        let pending = PendingSave {
            slot,
            tier,
            version: target.sent_version,
            request: AutoSaveRequest {
                result_id,
                prize_type: tier,
                ticket_number: target.value.clone(),
                prize_amount: amount,
                original_ticket_number: target.last_confirmed.clone(),
            },
        };
        Ok(Some(pending))
    }

    /// Applies the outcome of a dispatched save if it is still the latest one
    pub fn complete_auto_save(
        &mut self,
        pending: &PendingSave,
        result: Result<AutoSaveResponse, PersistenceError>,
    ) -> CompletionOutcome {
        let Some(target) = self.slot_mut(pending.slot) else {
            debug!("Dropping auto-save response for removed slot {}", pending.slot);
            return CompletionOutcome::SlotGone;
        };
        if target.sent_version != pending.version {
            debug!(
                "Dropping stale auto-save response for slot {} (version {}, latest {})",
                pending.slot, pending.version, target.sent_version
            );
            return CompletionOutcome::Stale;
        }

        // The slot may have been edited or cleared while the request was out
        let current = target.value == pending.request.ticket_number;
        target.status = match result {
            Ok(response) if response.success => {
                info!("{}: saved ticket {}", pending.tier, pending.request.ticket_number);
                target.last_confirmed = Some(pending.request.ticket_number.clone());
                if current {
                    SlotStatus::Saved
                } else {
                    SlotStatus::Unsaved
                }
            }
            Ok(response) if !current => {
                warn!("{}: backend rejected superseded ticket: {}", pending.tier, response.message);
                SlotStatus::Unsaved
            }
            Ok(response) => {
                warn!("{}: backend rejected ticket: {}", pending.tier, response.message);
                SlotStatus::Failed(response.message)
            }
            Err(e) => {
                warn!("{}", e);
                if current {
                    SlotStatus::Failed(e.message)
                } else {
                    SlotStatus::Unsaved
                }
            }
        };
        CompletionOutcome::Applied(target.status.clone())
    }

    /// Clears a "saved" or "failed" marker set by the save with `version`.
    /// Returns false when a newer save or an edit has taken over the slot.
    pub fn clear_status(&mut self, slot: SlotId, version: u64) -> bool {
        match self.slot_mut(slot) {
            Some(target)
                if target.sent_version == version
                    && matches!(target.status, SlotStatus::Saved | SlotStatus::Failed(_)) =>
            {
                target.status = SlotStatus::Unsaved;
                true
            }
            _ => false,
        }
    }
}
