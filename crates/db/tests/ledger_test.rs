//! Journal engine and chart of accounts against the memory store.

mod common;

use common::{setup, setup_with_retries};
use futures::future::join_all;
use koperasi_core::coa::{CoaError, CreateAccountInput, AccountType, UpdateAccountInput};
use koperasi_core::ledger::{JournalLineInput, LedgerError, PostJournalInput};
use koperasi_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn transfer(debit: AccountId, credit: AccountId, amount: Decimal) -> PostJournalInput {
    PostJournalInput {
        description: "Setoran modal".to_string(),
        lines: vec![
            JournalLineInput::debit(debit, amount),
            JournalLineInput::credit(credit, amount),
        ],
    }
}

#[tokio::test]
async fn test_post_updates_balances_on_normal_side() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;

    let entry = ctx
        .journal
        .post(transfer(kas.id, pokok.id, dec!(1000000)), None)
        .await
        .unwrap();

    assert_eq!(entry.lines[0].account_code, "1-1100");
    assert_eq!(ctx.account("1-1100").await.balance, dec!(1000000));
    assert_eq!(ctx.account("3-1100").await.balance, dec!(1000000));
    assert_eq!(ctx.journal.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_reverses_old_lines() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;
    let gaji = ctx.account("5-1100").await;

    let original = ctx
        .journal
        .post(transfer(kas.id, pokok.id, dec!(1000)), None)
        .await
        .unwrap();
    let edited = ctx
        .journal
        .post(transfer(gaji.id, kas.id, dec!(200)), Some(original.id))
        .await
        .unwrap();

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.date, original.date);
    assert_eq!(ctx.account("1-1100").await.balance, dec!(-200));
    assert_eq!(ctx.account("3-1100").await.balance, Decimal::ZERO);
    assert_eq!(ctx.account("5-1100").await.balance, dec!(200));
    assert_eq!(ctx.journal.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_restores_balances() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;

    let entry = ctx
        .journal
        .post(transfer(kas.id, pokok.id, dec!(750)), None)
        .await
        .unwrap();
    ctx.journal.delete(entry.id).await.unwrap();

    assert_eq!(ctx.account("1-1100").await.balance, Decimal::ZERO);
    assert_eq!(ctx.account("3-1100").await.balance, Decimal::ZERO);
    assert!(matches!(
        ctx.journal.get(entry.id).await,
        Err(LedgerError::EntryNotFound(_))
    ));
}

#[tokio::test]
async fn test_unbalanced_entry_writes_nothing() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;

    let input = PostJournalInput {
        description: "Salah".to_string(),
        lines: vec![
            JournalLineInput::debit(kas.id, dec!(100)),
            JournalLineInput::credit(pokok.id, dec!(90)),
        ],
    };
    let err = ctx.journal.post(input, None).await.unwrap_err();
    assert!(matches!(err, LedgerError::UnbalancedTransaction { .. }));
    assert!(ctx.journal.list().await.unwrap().is_empty());
    assert_eq!(ctx.account("1-1100").await.balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_unknown_account_aborts_without_effect() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let ghost = AccountId::new();

    let err = ctx
        .journal
        .post(transfer(kas.id, ghost, dec!(100)), None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(id) if id == ghost));
    assert_eq!(ctx.account("1-1100").await.balance, Decimal::ZERO);
    assert!(ctx.journal.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_of_missing_entry_fails() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;
    let missing = JournalEntryId::new();

    let err = ctx
        .journal
        .post(transfer(kas.id, pokok.id, dec!(1)), Some(missing))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EntryNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_concurrent_posts_keep_every_delta() {
    let ctx = setup_with_retries(100).await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;

    let posts = (0..20).map(|_| ctx.journal.post(transfer(kas.id, pokok.id, dec!(100)), None));
    for result in join_all(posts).await {
        result.unwrap();
    }

    assert_eq!(ctx.account("1-1100").await.balance, dec!(2000));
    assert_eq!(ctx.account("3-1100").await.balance, dec!(2000));
    assert!(ctx.reports.drift().await.unwrap().is_consistent);
}

#[tokio::test]
async fn test_exhausted_retries_surface_concurrent_modification() {
    let ctx = setup_with_retries(0).await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;

    let posts = (0..10).map(|_| ctx.journal.post(transfer(kas.id, pokok.id, dec!(10)), None));
    let results = join_all(posts).await;

    let committed = results.iter().filter(|r| r.is_ok()).count();
    assert!(committed >= 1);
    for result in &results {
        if let Err(err) = result {
            assert!(matches!(err, LedgerError::ConcurrentModification));
        }
    }
    let expected = Decimal::from(u32::try_from(committed).unwrap()) * dec!(10);
    assert_eq!(ctx.account("1-1100").await.balance, expected);
}

#[tokio::test]
async fn test_rename_cascades_to_children_and_lines() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;
    let current = ctx.account("1-1000").await;

    let entry = ctx
        .journal
        .post(transfer(kas.id, pokok.id, dec!(500)), None)
        .await
        .unwrap();

    ctx.accounts.rename(current.id, "1-1900").await.unwrap();
    assert_eq!(ctx.account("1-1100").await.parent_code.as_deref(), Some("1-1900"));
    assert_eq!(ctx.account("1-1300").await.parent_code.as_deref(), Some("1-1900"));

    ctx.accounts.rename(kas.id, "1-1110").await.unwrap();
    let stored = ctx.journal.get(entry.id).await.unwrap();
    assert_eq!(stored.lines[0].account_code, "1-1110");
    assert_eq!(stored.lines[1].account_code, "3-1100");
    assert_eq!(ctx.account("1-1110").await.balance, dec!(500));
}

#[tokio::test]
async fn test_rename_rejects_duplicate_code() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let err = ctx.accounts.rename(kas.id, "1-1200").await.unwrap_err();
    assert!(matches!(err, CoaError::DuplicateCode(code) if code == "1-1200"));
}

#[tokio::test]
async fn test_delete_guards() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;
    ctx.journal
        .post(transfer(kas.id, pokok.id, dec!(1)), None)
        .await
        .unwrap();

    assert!(matches!(
        ctx.accounts.delete(kas.id).await,
        Err(CoaError::AccountInUse { references: 1, .. })
    ));
    let parent = ctx.account("1-1000").await;
    assert!(matches!(
        ctx.accounts.delete(parent.id).await,
        Err(CoaError::HasChildren { .. })
    ));

    let spare = ctx
        .accounts
        .create(CreateAccountInput {
            code: "5-1200".to_string(),
            name: "Beban Listrik".to_string(),
            account_type: AccountType::Expense,
            parent_code: Some("5-1000".to_string()),
        })
        .await
        .unwrap();
    ctx.accounts.delete(spare.id).await.unwrap();
    assert!(matches!(
        ctx.accounts.get(spare.id).await,
        Err(CoaError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn test_type_is_frozen_once_referenced() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;
    ctx.journal
        .post(transfer(kas.id, pokok.id, dec!(1)), None)
        .await
        .unwrap();

    let change_type = UpdateAccountInput {
        account_type: Some(AccountType::Liability),
        ..UpdateAccountInput::default()
    };
    assert!(matches!(
        ctx.accounts.update(kas.id, change_type).await,
        Err(CoaError::TypeChangeNotAllowed(_))
    ));

    let rename = UpdateAccountInput {
        name: Some("Kas Besar".to_string()),
        ..UpdateAccountInput::default()
    };
    let updated = ctx.accounts.update(kas.id, rename).await.unwrap();
    assert_eq!(updated.name, "Kas Besar");
    assert_eq!(updated.code, "1-1100");
}

#[tokio::test]
async fn test_projection_matches_persisted_after_mixed_operations() {
    let ctx = setup().await;
    let kas = ctx.account("1-1100").await;
    let pokok = ctx.account("3-1100").await;
    let margin = ctx.account("4-1100").await;
    let gaji = ctx.account("5-1100").await;

    let a = ctx.journal.post(transfer(kas.id, pokok.id, dec!(5000)), None).await.unwrap();
    let b = ctx.journal.post(transfer(kas.id, margin.id, dec!(800)), None).await.unwrap();
    ctx.journal.post(transfer(gaji.id, kas.id, dec!(300)), None).await.unwrap();
    ctx.journal.post(transfer(gaji.id, kas.id, dec!(50)), Some(b.id)).await.unwrap();
    ctx.journal.delete(a.id).await.unwrap();

    let drift = ctx.reports.drift().await.unwrap();
    assert!(drift.is_consistent, "{:?}", drift.drifted);

    let trial = ctx.reports.trial_balance().await.unwrap();
    assert!(trial.totals.is_balanced);

    let projection = ctx.reports.balances().await.unwrap();
    assert_eq!(projection.get(kas.id).unwrap().balance, dec!(-350));
    assert_eq!(projection.get(ctx.account("1").await.id).unwrap().rollup, dec!(-350));
}
