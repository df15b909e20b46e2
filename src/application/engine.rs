use crate::domain::account::Amount;
use crate::domain::ledger::Ledger;
use crate::domain::transaction::{TransactionRecord, TransactionStatus};
use crate::domain::transfer::{TRANSFER_COMPLETED, TransferReceipt, TransferRequest};
use crate::error::{AccountRole, Result, TransferError};
use crate::infrastructure::in_memory::InMemoryLedgerStore;
use chrono::{DateTime, Utc};
use tracing::info;

/// Validates and executes transfers against a ledger.
///
/// `TransferEngine` holds the store's write lock for the full
/// validate-then-mutate sequence of each request, so two transfers never
/// interleave, whatever accounts they touch.
#[derive(Clone)]
pub struct TransferEngine {
    store: InMemoryLedgerStore,
}

impl TransferEngine {
    /// Creates a new `TransferEngine` over `store`.
    pub fn new(store: InMemoryLedgerStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &InMemoryLedgerStore {
        &self.store
    }

    /// Submits a transfer for processing.
    ///
    /// Returns a receipt on success. On error nothing has been modified.
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt> {
        let mut ledger = self.store.write().await;
        let result = apply(&mut ledger, &request, Utc::now());
        log_result(&request, &result);
        result.map(|record| receipt(&record))
    }
}

/// Applies `request` to `ledger` at time `now`.
///
/// Checks run in a fixed order and the first failure wins:
/// - source and destination differ
/// - source exists, then destination exists
/// - source is active, then destination is active
/// - amount is positive
/// - idempotency key, if any, was never recorded
/// - source balance covers the amount
///
/// Only then is the source debited, the destination credited and the record appended.
pub(crate) fn apply(
    ledger: &mut Ledger,
    request: &TransferRequest,
    now: DateTime<Utc>,
) -> Result<TransactionRecord> {
    let from_id = request.from_account_id;
    let to_id = request.to_account_id;

    if from_id == to_id {
        return Err(TransferError::SameAccount);
    }

    let from = ledger
        .account(from_id)
        .ok_or(TransferError::AccountNotFound(AccountRole::Source, from_id))?;
    let to = ledger
        .account(to_id)
        .ok_or(TransferError::AccountNotFound(AccountRole::Destination, to_id))?;

    if !from.is_active() {
        return Err(TransferError::AccountNotActive(
            AccountRole::Source,
            from_id,
            from.status,
        ));
    }
    if !to.is_active() {
        return Err(TransferError::AccountNotActive(
            AccountRole::Destination,
            to_id,
            to.status,
        ));
    }

    let amount = Amount::new(request.amount)?;

    // Checked before funds so a retried request is refused even once the balance has moved
    let key = request.idempotency_key();
    if let Some(key) = key
        && ledger.has_idempotency_key(key)
    {
        return Err(TransferError::DuplicateRequest);
    }

    if !from.balance.covers(amount) {
        return Err(TransferError::InsufficientFunds {
            account: from_id,
            balance: from.balance,
            requested: amount,
        });
    }

    let (from, to) = ledger.account_pair_mut(from_id, to_id).ok_or_else(|| {
        TransferError::Internal(
            format!("accounts {from_id} and {to_id} disappeared mid-transfer").into(),
        )
    })?;
    from.debit(amount, now);
    to.credit(amount, now);

    let record = TransactionRecord::success(from_id, to_id, amount, key.map(String::from), now);
    ledger.append(record.clone());

    Ok(record)
}

fn receipt(record: &TransactionRecord) -> TransferReceipt {
    TransferReceipt {
        transaction_id: record.id,
        status: TransactionStatus::Success,
        message: TRANSFER_COMPLETED.to_string(),
        debited_from: record.from_account_id,
        credited_to: record.to_account_id,
        amount: record.amount,
    }
}

/// Idempotency keys are sensitive: only their presence is logged.
fn log_result(request: &TransferRequest, result: &Result<TransactionRecord>) {
    let keyed = request.idempotency_key().is_some();
    match result {
        Ok(record) => info!(
            from = request.from_account_id,
            to = request.to_account_id,
            amount = %request.amount,
            keyed,
            tx = %record.id,
            "transfer applied"
        ),
        Err(e) => info!(
            from = request.from_account_id,
            to = request.to_account_id,
            amount = %request.amount,
            keyed,
            code = %e.code(),
            reason = %e,
            "transfer rejected"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{Account, AccountStatus, Balance};
    use crate::error::ErrorKind;
    use rust_decimal_macros::dec;

    fn ledger() -> Ledger {
        Ledger::seeded()
    }

    fn balance(ledger: &Ledger, id: u64) -> Balance {
        ledger.account(id).unwrap().balance
    }

    #[test]
    fn test_successful_transfer_moves_funds() {
        let mut ledger = ledger();
        let now = Utc::now();
        let request = TransferRequest::new(1, 2, dec!(100)).with_idempotency_key("k1");

        let record = apply(&mut ledger, &request, now).unwrap();

        assert_eq!(balance(&ledger, 1), Balance::new(dec!(4900)));
        assert_eq!(balance(&ledger, 2), Balance::new(dec!(2600.50)));
        assert_eq!(record.amount.value(), dec!(100));
        assert_eq!(record.idempotency_key.as_deref(), Some("k1"));
        assert_eq!(record.created_on, now);
        assert_eq!(ledger.account(1).unwrap().last_updated, now);
        assert_eq!(ledger.account(2).unwrap().last_updated, now);
        assert_eq!(ledger.transactions(), &[record]);
    }

    #[test]
    fn test_same_account_wins_over_every_other_rule() {
        let mut ledger = ledger();
        // closed account, non-positive amount and no funds: still a same-account error
        let request = TransferRequest::new(3, 3, dec!(-1000000));
        let err = apply(&mut ledger, &request, Utc::now()).unwrap_err();
        assert!(matches!(err, TransferError::SameAccount));
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = apply(&mut ledger, &TransferRequest::new(99, 99, dec!(1)), Utc::now())
            .unwrap_err();
        assert!(matches!(err, TransferError::SameAccount));
    }

    #[test]
    fn test_missing_source_checked_before_destination() {
        let mut ledger = ledger();
        let err = apply(&mut ledger, &TransferRequest::new(98, 99, dec!(1)), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::AccountNotFound(AccountRole::Source, 98)
        ));

        let err = apply(&mut ledger, &TransferRequest::new(1, 99, dec!(1)), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::AccountNotFound(AccountRole::Destination, 99)
        ));
    }

    #[test]
    fn test_missing_destination_checked_before_inactive_source() {
        let mut ledger = ledger();
        let err = apply(&mut ledger, &TransferRequest::new(3, 99, dec!(1)), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::AccountNotFound(AccountRole::Destination, 99)
        ));
    }

    #[test]
    fn test_inactive_accounts_are_forbidden() {
        let mut ledger = ledger();
        ledger.insert_account(Account::new(
            4,
            "Locked",
            Balance::new(dec!(10)),
            AccountStatus::Locked,
        ));

        let err = apply(&mut ledger, &TransferRequest::new(3, 4, dec!(1)), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::AccountNotActive(AccountRole::Source, 3, AccountStatus::Closed)
        ));

        let err = apply(&mut ledger, &TransferRequest::new(1, 4, dec!(1)), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::AccountNotActive(AccountRole::Destination, 4, AccountStatus::Locked)
        ));
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_inactive_destination_checked_before_amount() {
        let mut ledger = ledger();
        let err = apply(&mut ledger, &TransferRequest::new(1, 3, dec!(0)), Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::AccountNotActive(AccountRole::Destination, 3, _)
        ));
    }

    #[test]
    fn test_non_positive_amount() {
        let mut ledger = ledger();
        for amount in [dec!(0), dec!(-5)] {
            let err = apply(&mut ledger, &TransferRequest::new(1, 2, amount), Utc::now())
                .unwrap_err();
            assert!(matches!(err, TransferError::NonPositiveAmount(_)));
        }
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_non_positive_amount_checked_before_duplicate_key() {
        let mut ledger = ledger();
        let request = TransferRequest::new(1, 2, dec!(1)).with_idempotency_key("k");
        apply(&mut ledger, &request, Utc::now()).unwrap();

        let retry = TransferRequest::new(1, 2, dec!(0)).with_idempotency_key("k");
        let err = apply(&mut ledger, &retry, Utc::now()).unwrap_err();
        assert!(matches!(err, TransferError::NonPositiveAmount(_)));
    }

    #[test]
    fn test_duplicate_key_checked_before_funds() {
        let mut ledger = ledger();
        let request = TransferRequest::new(1, 2, dec!(5000)).with_idempotency_key("all-in");
        apply(&mut ledger, &request, Utc::now()).unwrap();
        assert_eq!(balance(&ledger, 1), Balance::ZERO);

        // a plain retry would now also lack funds, but the duplicate is reported
        let err = apply(&mut ledger, &request, Utc::now()).unwrap_err();
        assert!(matches!(err, TransferError::DuplicateRequest));
        assert_eq!(balance(&ledger, 1), Balance::ZERO);
        assert_eq!(balance(&ledger, 2), Balance::new(dec!(7500.50)));
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn test_requests_without_key_are_never_duplicates() {
        let mut ledger = ledger();
        let request = TransferRequest::new(1, 2, dec!(10));
        apply(&mut ledger, &request, Utc::now()).unwrap();
        apply(&mut ledger, &request, Utc::now()).unwrap();
        assert_eq!(ledger.transactions().len(), 2);
        assert_eq!(balance(&ledger, 1), Balance::new(dec!(4980)));
    }

    #[test]
    fn test_empty_key_is_treated_as_no_key() {
        let mut ledger = ledger();
        let request: TransferRequest = serde_json::from_str(
            r#"{"fromAccountId": 1, "toAccountId": 2, "amount": 10, "idempotencyKey": ""}"#,
        )
        .unwrap();

        let first = apply(&mut ledger, &request, Utc::now()).unwrap();
        apply(&mut ledger, &request, Utc::now()).unwrap();

        assert!(first.idempotency_key.is_none());
        assert!(!ledger.has_idempotency_key(""));
        assert_eq!(ledger.transactions().len(), 2);
        assert_eq!(balance(&ledger, 1), Balance::new(dec!(4980)));
    }

    #[test]
    fn test_insufficient_funds_leaves_ledger_untouched() {
        let mut ledger = ledger();
        let before = ledger.account(1).unwrap().clone();
        let err = apply(&mut ledger, &TransferRequest::new(1, 2, dec!(999999)), Utc::now())
            .unwrap_err();

        assert!(matches!(
            err,
            TransferError::InsufficientFunds { account: 1, .. }
        ));
        assert_eq!(ledger.account(1).unwrap(), &before);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_exact_balance_transfer_empties_account() {
        let mut ledger = ledger();
        apply(&mut ledger, &TransferRequest::new(2, 1, dec!(2500.50)), Utc::now()).unwrap();
        assert_eq!(balance(&ledger, 2), Balance::ZERO);
        assert_eq!(balance(&ledger, 1), Balance::new(dec!(7500.50)));
    }

    #[tokio::test]
    async fn test_engine_returns_receipt() {
        let engine = TransferEngine::new(InMemoryLedgerStore::seeded());
        let receipt = engine
            .transfer(TransferRequest::new(1, 2, dec!(100)))
            .await
            .unwrap();

        assert_eq!(receipt.status, TransactionStatus::Success);
        assert_eq!(receipt.message, TRANSFER_COMPLETED);
        assert_eq!(receipt.debited_from, 1);
        assert_eq!(receipt.credited_to, 2);
        assert_eq!(receipt.amount.value(), dec!(100));

        let ledger = engine.store().read().await;
        assert_eq!(ledger.transactions()[0].id, receipt.transaction_id);
    }
}
