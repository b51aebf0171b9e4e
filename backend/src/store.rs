use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    strip_whitespace, AutoSaveRequest, AutoSaveResponse, Draw, HydratedPrizeEntry, LotteryOption,
    LotteryResultResponse, PrizeEntriesData, PrizeTier, ResultSubmissionResponse,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Please fill in all required fields.")]
    MissingFields,
    #[error("Unknown lottery: {0}")]
    UnknownLottery(String),
    #[error("Invalid draw date: {0}")]
    InvalidDate(String),
    #[error("Invalid result id: {0}")]
    InvalidResultId(String),
    #[error("Lottery result {0} not found")]
    ResultNotFound(i64),
}

#[derive(Debug, Clone)]
struct StoredResult {
    draw: Draw,
    prizes: PrizeEntriesData,
}

#[derive(Debug)]
struct StoreInner {
    lotteries: Vec<LotteryOption>,
    results: BTreeMap<i64, StoredResult>,
    next_id: i64,
}

/// Draw fields and prize rows read out of a url-encoded form post
#[derive(Debug, Default)]
struct SubmittedForm {
    lottery: String,
    draw_number: String,
    date: String,
    is_published: bool,
    is_bumper: bool,
    notify_on_save: bool,
    result_id: Option<String>,
    prizes: PrizeEntriesData,
}

impl SubmittedForm {
    fn parse(fields: &[(String, String)]) -> Self {
        let mut form = Self::default();
        let mut amounts: BTreeMap<PrizeTier, Vec<String>> = BTreeMap::new();
        let mut tickets: BTreeMap<PrizeTier, Vec<String>> = BTreeMap::new();
        let mut places: BTreeMap<PrizeTier, Vec<String>> = BTreeMap::new();

        for (name, value) in fields {
            match name.as_str() {
                "lottery" => form.lottery = value.trim().to_string(),
                "draw_number" => form.draw_number = strip_whitespace(value).0,
                "date" => form.date = value.trim().to_string(),
                "is_published" => form.is_published = value == "on",
                "is_bumper" => form.is_bumper = value == "on",
                "notify_on_save" => form.notify_on_save = value == "on",
                "result_id" => form.result_id = Some(value.trim().to_string()),
                other => {
                    for tier in PrizeTier::ALL {
                        if other == tier.amount_field() {
                            amounts.entry(tier).or_default().push(strip_whitespace(value).0);
                        } else if other == tier.ticket_field() {
                            tickets.entry(tier).or_default().push(strip_whitespace(value).0);
                        } else if other == tier.place_field() {
                            places.entry(tier).or_default().push(strip_whitespace(value).0);
                        }
                    }
                }
            }
        }

        for tier in PrizeTier::ALL {
            let tier_amounts = amounts.remove(&tier).unwrap_or_default();
            let tier_tickets = tickets.remove(&tier).unwrap_or_default();
            let tier_places = places.remove(&tier).unwrap_or_default();

            // Rows pair up by position; a row needs both an amount and a ticket
            let rows: Vec<HydratedPrizeEntry> = tier_amounts
                .into_iter()
                .zip(tier_tickets)
                .enumerate()
                .filter(|(_, (amount, ticket))| !amount.is_empty() && !ticket.is_empty())
                .map(|(i, (prize_amount, ticket_number))| HydratedPrizeEntry {
                    ticket_number,
                    prize_amount,
                    place: if tier.is_ranked() {
                        tier_places.get(i).filter(|place| !place.is_empty()).cloned()
                    } else {
                        None
                    },
                })
                .collect();
            if !rows.is_empty() {
                form.prizes.insert(tier, rows);
            }
        }
        form
    }
}

/// In-memory persistence for lottery results
#[derive(Debug, Clone)]
pub struct ResultStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        let lotteries = [
            "Win-Win",
            "Sthree Sakthi",
            "Akshaya",
            "Karunya Plus",
            "Nirmal",
            "Karunya",
            "Fifty-Fifty",
        ]
        .iter()
        .enumerate()
        .map(|(i, name)| LotteryOption {
            id: i as i64 + 1,
            name: name.to_string(),
        })
        .collect();
        Self::with_lotteries(lotteries)
    }

    pub fn with_lotteries(lotteries: Vec<LotteryOption>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                lotteries,
                results: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    pub async fn lotteries(&self) -> Vec<LotteryOption> {
        self.inner.read().await.lotteries.clone()
    }

    pub async fn get_result(&self, result_id: i64) -> Result<LotteryResultResponse, StoreError> {
        let inner = self.inner.read().await;
        let stored = inner
            .results
            .get(&result_id)
            .ok_or(StoreError::ResultNotFound(result_id))?;
        Ok(LotteryResultResponse {
            draw: stored.draw.clone(),
            prizes: stored.prizes.clone(),
        })
    }

    /// Create a result, or replace every prize row of an existing one when
    /// the form carries a `result_id`
    pub async fn save_submission(
        &self,
        fields: &[(String, String)],
    ) -> Result<ResultSubmissionResponse, StoreError> {
        let form = SubmittedForm::parse(fields);
        if form.lottery.is_empty() || form.draw_number.is_empty() || form.date.is_empty() {
            return Err(StoreError::MissingFields);
        }
        NaiveDate::parse_from_str(&form.date, "%Y-%m-%d")
            .map_err(|_| StoreError::InvalidDate(form.date.clone()))?;

        let mut inner = self.inner.write().await;
        let lottery_name = inner
            .lotteries
            .iter()
            .find(|lottery| lottery.id.to_string() == form.lottery)
            .map(|lottery| lottery.name.clone())
            .ok_or_else(|| StoreError::UnknownLottery(form.lottery.clone()))?;

        let existing = match form.result_id.as_deref() {
            Some(raw) if !raw.is_empty() => {
                let id = raw
                    .parse::<i64>()
                    .map_err(|_| StoreError::InvalidResultId(raw.to_string()))?;
                if !inner.results.contains_key(&id) {
                    return Err(StoreError::ResultNotFound(id));
                }
                Some(id)
            }
            _ => None,
        };
        let result_id = match existing {
            Some(id) => id,
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                id
            }
        };

        let row_count: usize = form.prizes.values().map(Vec::len).sum();
        let draw = Draw {
            lottery: form.lottery,
            lottery_name: lottery_name.clone(),
            draw_number: form.draw_number,
            date: form.date,
            is_published: form.is_published,
            is_bumper: form.is_bumper,
            notify_on_save: form.notify_on_save,
            result_id: Some(result_id),
        };
        let verb = if existing.is_some() { "updated" } else { "created" };
        let message = format!(
            "Lottery result for {} - {} has been {} successfully.",
            lottery_name, draw.draw_number, verb
        );
        inner.results.insert(
            result_id,
            StoredResult {
                draw,
                prizes: form.prizes,
            },
        );
        info!("Result {} {} with {} prize rows", result_id, verb, row_count);

        Ok(ResultSubmissionResponse { result_id, message })
    }

    /// Persist one ticket of a grouped tier. The row whose ticket equals
    /// `original_ticket_number` is replaced; otherwise a row is appended.
    pub async fn auto_save(&self, request: &AutoSaveRequest) -> Result<AutoSaveResponse, StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .results
            .get_mut(&request.result_id)
            .ok_or(StoreError::ResultNotFound(request.result_id))?;

        let ticket = strip_whitespace(&request.ticket_number).0;
        let amount = strip_whitespace(&request.prize_amount).0;
        if ticket.is_empty() || amount.is_empty() {
            warn!("Auto-save for result {} rejected: empty ticket or amount", request.result_id);
            return Ok(AutoSaveResponse {
                success: false,
                message: "Ticket number and prize amount are required".to_string(),
            });
        }

        let rows = stored.prizes.entry(request.prize_type).or_default();
        let target = request
            .original_ticket_number
            .as_deref()
            .and_then(|original| rows.iter().position(|row| row.ticket_number == original));

        let message = match target {
            Some(index) => {
                rows[index].ticket_number = ticket.clone();
                "Ticket updated"
            }
            None => {
                rows.push(HydratedPrizeEntry {
                    ticket_number: ticket.clone(),
                    prize_amount: amount.clone(),
                    place: None,
                });
                "Ticket saved"
            }
        };
        // Grouped tiers share a single amount
        for row in rows.iter_mut() {
            row.prize_amount = amount.clone();
        }

        info!(
            "Auto-saved {} ticket {} on result {}",
            request.prize_type.key(),
            ticket,
            request.result_id
        );
        Ok(AutoSaveResponse {
            success: true,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    fn draw_fields() -> Vec<(String, String)> {
        vec![
            field("lottery", "1"),
            field("draw_number", " W 812 "),
            field("date", "2025-03-07"),
            field("is_published", "on"),
        ]
    }

    #[tokio::test]
    async fn test_submission_keeps_complete_rows_only() {
        let store = ResultStore::new();
        let mut fields = draw_fields();
        fields.extend([
            field("1st_prize_amount[]", "7500000"),
            field("1st_ticket_number[]", "WA 123456"),
            field("1st_place[]", "Palakkad"),
            field("1st_prize_amount[]", ""),
            field("1st_ticket_number[]", "WB654321"),
            field("1st_place[]", ""),
            field("consolation_prize_amount[]", "8000"),
            field("consolation_ticket_number[]", "WB123456"),
            field("consolation_prize_amount[]", "8000"),
            field("consolation_ticket_number[]", "WC123456"),
        ]);

        let saved = store.save_submission(&fields).await.unwrap();
        assert_eq!(saved.result_id, 1);
        assert_eq!(saved.message, "Lottery result for Win-Win - W812 has been created successfully.");

        let result = store.get_result(1).await.unwrap();
        assert_eq!(result.draw.draw_number, "W812");
        assert_eq!(result.draw.lottery_name, "Win-Win");
        assert!(result.draw.is_published);
        assert!(!result.draw.is_bumper);

        let first = &result.prizes[&PrizeTier::First];
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].ticket_number, "WA123456");
        assert_eq!(first[0].place.as_deref(), Some("Palakkad"));
        assert_eq!(result.prizes[&PrizeTier::Consolation].len(), 2);
    }

    #[tokio::test]
    async fn test_resubmission_replaces_rows() {
        let store = ResultStore::new();
        let mut fields = draw_fields();
        fields.extend([
            field("5th_prize_amount[]", "2000"),
            field("5th_ticket_number[]", "1234"),
        ]);
        let created = store.save_submission(&fields).await.unwrap();

        let mut fields = draw_fields();
        fields.push(field("result_id", &created.result_id.to_string()));
        fields.extend([
            field("5th_prize_amount[]", "2000"),
            field("5th_ticket_number[]", "5678"),
        ]);
        let updated = store.save_submission(&fields).await.unwrap();
        assert_eq!(updated.result_id, created.result_id);
        assert!(updated.message.ends_with("has been updated successfully."));

        let result = store.get_result(created.result_id).await.unwrap();
        let fifth = &result.prizes[&PrizeTier::Fifth];
        assert_eq!(fifth.len(), 1);
        assert_eq!(fifth[0].ticket_number, "5678");
    }

    #[tokio::test]
    async fn test_submission_requires_draw_fields() {
        let store = ResultStore::new();
        let fields = vec![field("lottery", "1"), field("date", "2025-03-07")];
        assert!(matches!(
            store.save_submission(&fields).await,
            Err(StoreError::MissingFields)
        ));

        let mut fields = draw_fields();
        fields[0] = field("lottery", "99");
        assert!(matches!(
            store.save_submission(&fields).await,
            Err(StoreError::UnknownLottery(_))
        ));
    }

    #[tokio::test]
    async fn test_auto_save_inserts_then_updates() {
        let store = ResultStore::new();
        let created = store.save_submission(&draw_fields()).await.unwrap();

        let mut request = AutoSaveRequest {
            result_id: created.result_id,
            prize_type: PrizeTier::Eighth,
            ticket_number: "1111".to_string(),
            prize_amount: "500".to_string(),
            original_ticket_number: None,
        };
        let response = store.auto_save(&request).await.unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Ticket saved");

        request.original_ticket_number = Some("1111".to_string());
        request.ticket_number = "2222".to_string();
        request.prize_amount = "600".to_string();
        let response = store.auto_save(&request).await.unwrap();
        assert_eq!(response.message, "Ticket updated");

        let result = store.get_result(created.result_id).await.unwrap();
        let eighth = &result.prizes[&PrizeTier::Eighth];
        assert_eq!(eighth.len(), 1);
        assert_eq!(eighth[0].ticket_number, "2222");
        assert_eq!(eighth[0].prize_amount, "600");
    }

    #[tokio::test]
    async fn test_auto_save_unknown_result() {
        let store = ResultStore::new();
        let request = AutoSaveRequest {
            result_id: 42,
            prize_type: PrizeTier::Sixth,
            ticket_number: "KA1".to_string(),
            prize_amount: "1000".to_string(),
            original_ticket_number: None,
        };
        assert!(matches!(
            store.auto_save(&request).await,
            Err(StoreError::ResultNotFound(42))
        ));
    }
}
