//! Member repository: registry, savings postings and savings history.

use chrono::Utc;
use koperasi_core::financing::Contract;
use koperasi_core::member::{
    CreateMemberInput, Member, MemberError, MemberService, SavingsPostingInput, SavingsTransaction,
    UpdateMemberInput,
};
use koperasi_shared::types::MemberId;
use tracing::info;

use crate::store::{StoreClient, collections};

/// Member repository.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    store: StoreClient,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Lists members ordered by member number.
    pub async fn list(&self) -> Result<Vec<Member>, MemberError> {
        let mut txn = self.store.begin().await?;
        let mut members: Vec<Member> = txn.query(collections::MEMBERS).await?;
        members.sort_by(|a, b| a.member_number.cmp(&b.member_number));
        Ok(members)
    }

    /// Fetches one member.
    pub async fn get(&self, id: MemberId) -> Result<Member, MemberError> {
        let mut txn = self.store.begin().await?;
        txn.get(collections::MEMBERS, &id.to_string())
            .await?
            .ok_or(MemberError::MemberNotFound(id))
    }

    /// Registers a member.
    pub async fn create(&self, input: CreateMemberInput) -> Result<Member, MemberError> {
        let input = &input;
        let member = self
            .store
            .run("member.create", move || async move {
                let mut txn = self.store.begin().await?;
                let existing: Vec<Member> = txn.query(collections::MEMBERS).await?;
                let member = MemberService::validate_create(input.clone(), &existing)?;
                txn.set(collections::MEMBERS, &member.id.to_string(), &member)?;
                txn.commit().await?;
                Ok::<_, MemberError>(member)
            })
            .await?;

        info!(member_id = %member.id, member_number = %member.member_number, "Member registered");
        Ok(member)
    }

    /// Updates name, unit or status.
    pub async fn update(
        &self,
        id: MemberId,
        input: UpdateMemberInput,
    ) -> Result<Member, MemberError> {
        let input = &input;
        self.store
            .run("member.update", move || async move {
                let mut txn = self.store.begin().await?;
                let member: Member = txn
                    .get(collections::MEMBERS, &id.to_string())
                    .await?
                    .ok_or(MemberError::MemberNotFound(id))?;
                let updated = MemberService::apply_update(&member, input.clone())?;
                txn.set(collections::MEMBERS, &id.to_string(), &updated)?;
                txn.commit().await?;
                Ok::<_, MemberError>(updated)
            })
            .await
    }

    /// Removes a member with no savings and no open contract, along with
    /// their savings history.
    pub async fn delete(&self, id: MemberId) -> Result<(), MemberError> {
        self.store
            .run("member.delete", move || async move {
                let mut txn = self.store.begin().await?;
                let member: Member = txn
                    .get(collections::MEMBERS, &id.to_string())
                    .await?
                    .ok_or(MemberError::MemberNotFound(id))?;
                let contracts: Vec<Contract> = txn.query(collections::CONTRACTS).await?;
                let has_open = contracts
                    .iter()
                    .any(|c| c.member_id == id && !c.status.is_terminal());
                MemberService::validate_delete(&member, has_open)?;

                let history = collections::member_transactions(id);
                for (record_id, _) in txn.query_raw(&history).await? {
                    txn.delete(&history, &record_id);
                }
                txn.delete(collections::MEMBERS, &id.to_string());
                txn.commit().await?;
                Ok::<_, MemberError>(())
            })
            .await?;

        info!(member_id = %id, "Member deleted");
        Ok(())
    }

    /// Deposits to or withdraws from one savings kind.
    ///
    /// The member balance and the audit record are written together.
    pub async fn post_savings(
        &self,
        id: MemberId,
        input: SavingsPostingInput,
    ) -> Result<(Member, SavingsTransaction), MemberError> {
        let input = &input;
        let (member, record) = self
            .store
            .run("member.savings", move || async move {
                let mut txn = self.store.begin().await?;
                let member: Member = txn
                    .get(collections::MEMBERS, &id.to_string())
                    .await?
                    .ok_or(MemberError::MemberNotFound(id))?;
                let (updated, record) = MemberService::post_savings(&member, input, Utc::now())?;

                txn.set(collections::MEMBERS, &id.to_string(), &updated)?;
                txn.set(
                    &collections::member_transactions(id),
                    &record.id.to_string(),
                    &record,
                )?;
                txn.commit().await?;
                Ok::<_, MemberError>((updated, record))
            })
            .await?;

        info!(
            member_id = %id,
            kind = %record.kind,
            amount = %record.amount,
            balance = %record.balance_after,
            "Savings posted"
        );
        Ok((member, record))
    }

    /// Savings history, oldest first.
    pub async fn savings_history(&self, id: MemberId) -> Result<Vec<SavingsTransaction>, MemberError> {
        let mut txn = self.store.begin().await?;
        if txn.get_raw(collections::MEMBERS, &id.to_string()).await?.is_none() {
            return Err(MemberError::MemberNotFound(id));
        }
        let mut history: Vec<SavingsTransaction> =
            txn.query(&collections::member_transactions(id)).await?;
        history.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(history)
    }
}
