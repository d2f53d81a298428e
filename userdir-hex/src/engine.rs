//! Balance transfer engine.
//!
//! The one piece of this service where correctness depends on ordering,
//! atomicity, and isolation: moving funds between two accounts that many
//! callers may touch at once. The engine owns a per-account lock table and
//! serializes every transfer touching a given account, so read-modify-write
//! cycles never interleave (no lost updates). The commit itself is a single
//! atomic pair write through the store, so no reader anywhere, engine client
//! or not, ever sees a half-applied transfer.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use userdir_types::{AccountStore, Money, PaymentRequest, TransferError, TransferReceipt, UserId};

/// Transfer engine with pessimistic per-account locking.
///
/// Locks are always acquired in ascending account-id order. Every caller
/// follows the same global sequence, so two transfers moving funds between
/// the same pair of accounts in opposite directions cannot circular-wait.
pub struct TransferEngine<S: AccountStore> {
    store: Arc<S>,
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl<S: AccountStore> TransferEngine<S> {
    /// Creates a new engine over the given account store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Moves `req.amount` from the giver account to the taker account.
    ///
    /// On success both balance writes have been applied; on any failure the
    /// store is left exactly as it was. Balances are re-read under the held
    /// locks, never taken from values observed earlier.
    pub async fn transfer(&self, req: PaymentRequest) -> Result<TransferReceipt, TransferError> {
        if req.amount <= 0 {
            return Err(TransferError::InvalidRequest(
                "Amount must be positive".into(),
            ));
        }
        if req.taker_id == req.giver_id {
            return Err(TransferError::InvalidRequest(
                "Cannot transfer between an account and itself".into(),
            ));
        }
        let amount = Money::new(req.amount)?;

        let (lo, hi) = if req.giver_id < req.taker_id {
            (req.giver_id, req.taker_id)
        } else {
            (req.taker_id, req.giver_id)
        };
        let lo_lock = self.account_lock(lo);
        let hi_lock = self.account_lock(hi);
        let _lo_guard = lo_lock.lock().await;
        let _hi_guard = hi_lock.lock().await;

        let giver_balance = self
            .store
            .get_balance(req.giver_id)
            .await?
            .ok_or(TransferError::AccountNotFound(req.giver_id))?;
        let taker_balance = self
            .store
            .get_balance(req.taker_id)
            .await?
            .ok_or(TransferError::AccountNotFound(req.taker_id))?;

        let new_giver = giver_balance.checked_sub(amount)?;
        let new_taker = taker_balance.saturating_add(amount);

        // Single atomic commit: no reader anywhere sees the debit without
        // the credit, and a failed commit writes neither balance.
        self.store
            .set_balances((req.giver_id, new_giver), (req.taker_id, new_taker))
            .await?;

        Ok(TransferReceipt {
            taker_id: req.taker_id,
            giver_id: req.giver_id,
            taker_balance: new_taker.amount(),
            giver_balance: new_giver.amount(),
        })
    }

    /// Drops the lock entry for an account that no longer exists.
    ///
    /// The entry is only removed while nothing else holds a handle to it, so
    /// an in-flight transfer keeps serializing on the mutex it already
    /// cloned. A stale transfer that recreates the entry afterwards fails on
    /// the balance read.
    pub fn forget_account(&self, id: UserId) {
        self.locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    fn account_lock(&self, id: UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use userdir_repo::MemoryRepo;
    use userdir_types::CreateUserRequest;

    async fn seed_user(store: &MemoryRepo, name: &str, balance: i64) -> UserId {
        store
            .create_user(CreateUserRequest {
                first_name: name.to_string(),
                last_name: "Test".to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password: "secret".to_string(),
                initial_balance: balance,
            })
            .await
            .unwrap()
            .id
    }

    fn engine_over(store: MemoryRepo) -> (Arc<MemoryRepo>, Arc<TransferEngine<MemoryRepo>>) {
        let store = Arc::new(store);
        let engine = Arc::new(TransferEngine::new(store.clone()));
        (store, engine)
    }

    async fn balance_of(store: &MemoryRepo, id: UserId) -> i64 {
        store.get_balance(id).await.unwrap().unwrap().amount()
    }

    #[tokio::test]
    async fn test_transfer_moves_funds() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let b = seed_user(&store, "Bob", 50).await;
        let (store, engine) = engine_over(store);

        let receipt = engine
            .transfer(PaymentRequest {
                taker_id: a,
                giver_id: b,
                amount: 30,
            })
            .await
            .unwrap();

        assert_eq!(receipt.taker_balance, 130);
        assert_eq!(receipt.giver_balance, 20);
        assert_eq!(balance_of(&store, a).await, 130);
        assert_eq!(balance_of(&store, b).await, 20);
    }

    #[tokio::test]
    async fn test_insufficient_funds_is_a_no_op() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let b = seed_user(&store, "Bob", 10).await;
        let (store, engine) = engine_over(store);

        let result = engine
            .transfer(PaymentRequest {
                taker_id: a,
                giver_id: b,
                amount: 30,
            })
            .await;

        assert!(matches!(
            result,
            Err(TransferError::InsufficientFunds {
                available: 10,
                requested: 30
            })
        ));
        assert_eq!(balance_of(&store, a).await, 100);
        assert_eq!(balance_of(&store, b).await, 10);
    }

    #[tokio::test]
    async fn test_missing_giver_is_rejected() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let (store, engine) = engine_over(store);
        let ghost = UserId::new(999);

        let result = engine
            .transfer(PaymentRequest {
                taker_id: a,
                giver_id: ghost,
                amount: 10,
            })
            .await;

        assert!(matches!(result, Err(TransferError::AccountNotFound(id)) if id == ghost));
        assert_eq!(balance_of(&store, a).await, 100);
    }

    #[tokio::test]
    async fn test_self_transfer_rejected() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let (_, engine) = engine_over(store);

        let result = engine
            .transfer(PaymentRequest {
                taker_id: a,
                giver_id: a,
                amount: 10,
            })
            .await;

        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_nonpositive_amount_rejected_deterministically() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let b = seed_user(&store, "Bob", 100).await;
        let (store, engine) = engine_over(store);

        for amount in [0, -50] {
            for _ in 0..3 {
                let result = engine
                    .transfer(PaymentRequest {
                        taker_id: a,
                        giver_id: b,
                        amount,
                    })
                    .await;
                assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
            }
        }
        assert_eq!(balance_of(&store, a).await, 100);
        assert_eq!(balance_of(&store, b).await, 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_opposing_transfers_complete_without_deadlock() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let b = seed_user(&store, "Bob", 100).await;
        let (store, engine) = engine_over(store);

        let e1 = engine.clone();
        let t1 = tokio::spawn(async move {
            e1.transfer(PaymentRequest {
                taker_id: a,
                giver_id: b,
                amount: 50,
            })
            .await
        });
        let e2 = engine.clone();
        let t2 = tokio::spawn(async move {
            e2.transfer(PaymentRequest {
                taker_id: b,
                giver_id: a,
                amount: 20,
            })
            .await
        });

        let joined = tokio::time::timeout(Duration::from_secs(30), async {
            (t1.await.unwrap(), t2.await.unwrap())
        })
        .await
        .expect("opposing transfers deadlocked");

        joined.0.unwrap();
        joined.1.unwrap();

        let a_balance = balance_of(&store, a).await;
        let b_balance = balance_of(&store, b).await;
        assert_eq!(a_balance + b_balance, 200);
        assert!(a_balance >= 0 && b_balance >= 0);
        assert_eq!(a_balance, 130);
        assert_eq!(b_balance, 70);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_conservation_under_concurrent_load() {
        let store = MemoryRepo::new();
        let mut ids = Vec::new();
        for i in 0..4 {
            ids.push(seed_user(&store, &format!("User{}", i), 10_000).await);
        }
        let (store, engine) = engine_over(store);

        let mut tasks = Vec::new();
        for task_no in 0..8 {
            let engine = engine.clone();
            let ids = ids.clone();
            tasks.push(tokio::spawn(async move {
                for round in 0..100 {
                    let giver = ids[(task_no + round) % ids.len()];
                    let taker = ids[(task_no + round + 1) % ids.len()];
                    // Insufficient-funds rejections are fine; they must be no-ops.
                    let _ = engine
                        .transfer(PaymentRequest {
                            taker_id: taker,
                            giver_id: giver,
                            amount: 1 + (round as i64 % 7) * 100,
                        })
                        .await;
                }
            }));
        }

        tokio::time::timeout(Duration::from_secs(60), async {
            for task in tasks {
                task.await.unwrap();
            }
        })
        .await
        .expect("concurrent transfers deadlocked");

        let mut total = 0;
        for id in ids {
            let balance = balance_of(&store, id).await;
            assert!(balance >= 0, "overdraft on account {}", id);
            total += balance;
        }
        assert_eq!(total, 40_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reader_never_observes_half_applied_transfer() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 1_000_000).await;
        let b = seed_user(&store, "Bob", 1_000_000).await;
        let (store, engine) = engine_over(store);

        let writer = {
            let engine = engine.clone();
            tokio::spawn(async move {
                for _ in 0..2_000 {
                    engine
                        .transfer(PaymentRequest {
                            taker_id: a,
                            giver_id: b,
                            amount: 7,
                        })
                        .await
                        .unwrap();
                    engine
                        .transfer(PaymentRequest {
                            taker_id: b,
                            giver_id: a,
                            amount: 7,
                        })
                        .await
                        .unwrap();
                }
            })
        };

        let reader = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..20_000 {
                    // Snapshot read over both accounts, same path GET serves.
                    let users = store.list_users().await.unwrap();
                    let sum: i64 = users.iter().map(|u| u.balance.amount()).sum();
                    assert_eq!(sum, 2_000_000, "observed a half-applied transfer");
                }
            })
        };

        tokio::time::timeout(Duration::from_secs(60), async {
            writer.await.unwrap();
            reader.await.unwrap();
        })
        .await
        .expect("reader/writer interleaving stalled");
    }

    #[tokio::test]
    async fn test_forget_account_evicts_lock_entry() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let b = seed_user(&store, "Bob", 100).await;
        let (store, engine) = engine_over(store);

        engine
            .transfer(PaymentRequest {
                taker_id: a,
                giver_id: b,
                amount: 10,
            })
            .await
            .unwrap();
        assert_eq!(engine.locks.len(), 2);

        store.delete_user(b).await.unwrap();
        engine.forget_account(b);

        assert_eq!(engine.locks.len(), 1);
        assert!(engine.locks.contains_key(&a));
    }

    #[tokio::test]
    async fn test_forget_account_keeps_contended_lock() {
        let store = MemoryRepo::new();
        let a = seed_user(&store, "Alice", 100).await;
        let (_, engine) = engine_over(store);

        let held = engine.account_lock(a);
        let _guard = held.lock().await;
        engine.forget_account(a);

        // A caller still holds the mutex, so the entry must survive.
        assert_eq!(engine.locks.len(), 1);
    }
}
