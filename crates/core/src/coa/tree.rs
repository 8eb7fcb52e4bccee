//! Account hierarchy navigation.
//!
//! Children point at their parent by code. Codes are not guaranteed to form
//! a proper forest (a parent may be missing, or bad data may loop), so every
//! walk here tracks visited codes.

use std::collections::{BTreeMap, HashMap, HashSet};

use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;

use super::types::Account;

/// Read-only view over a chart of accounts snapshot.
#[derive(Debug)]
pub struct AccountTree<'a> {
    by_code: BTreeMap<&'a str, &'a Account>,
    children: HashMap<&'a str, Vec<&'a Account>>,
}

impl<'a> AccountTree<'a> {
    /// Indexes a snapshot of accounts.
    #[must_use]
    pub fn new(accounts: &'a [Account]) -> Self {
        let mut by_code = BTreeMap::new();
        let mut children: HashMap<&str, Vec<&Account>> = HashMap::new();

        for account in accounts {
            by_code.insert(account.code.as_str(), account);
            if let Some(parent) = account.parent_code.as_deref() {
                children.entry(parent).or_default().push(account);
            }
        }
        for list in children.values_mut() {
            list.sort_by(|a, b| a.code.cmp(&b.code));
        }

        Self { by_code, children }
    }

    /// Looks up an account by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&'a Account> {
        self.by_code.get(code).copied()
    }

    /// Accounts shown at the top level: no parent, or a parent that does not
    /// exist in the snapshot.
    #[must_use]
    pub fn roots(&self) -> Vec<&'a Account> {
        self.by_code
            .values()
            .filter(|a| {
                a.parent_code
                    .as_deref()
                    .is_none_or(|p| !self.by_code.contains_key(p))
            })
            .copied()
            .collect()
    }

    /// Direct children of `code`, ordered by code.
    #[must_use]
    pub fn children(&self, code: &str) -> &[&'a Account] {
        self.children.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All descendants of `code` (children, grandchildren, ...), depth-first.
    #[must_use]
    pub fn descendants(&self, code: &str) -> Vec<&'a Account> {
        let mut out = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(code);
        let mut stack: Vec<&'a Account> = self.children(code).iter().rev().copied().collect();

        while let Some(account) = stack.pop() {
            if !visited.insert(account.code.as_str()) {
                continue;
            }
            out.push(account);
            stack.extend(self.children(&account.code).iter().rev().copied());
        }
        out
    }

    /// Returns true if making `new_parent` the parent of `code` would create
    /// a loop (including `code` being its own parent).
    #[must_use]
    pub fn would_create_cycle(&self, code: &str, new_parent: &str) -> bool {
        if code == new_parent {
            return true;
        }
        self.descendants(code)
            .iter()
            .any(|a| a.code == new_parent)
    }

    /// Sum of `balances` over the account and all its descendants.
    ///
    /// Accounts missing from `balances` count as zero.
    #[must_use]
    pub fn rollup(&self, code: &str, balances: &HashMap<AccountId, Decimal>) -> Decimal {
        let own = self
            .get(code)
            .and_then(|a| balances.get(&a.id))
            .copied()
            .unwrap_or(Decimal::ZERO);

        own + self
            .descendants(code)
            .iter()
            .filter_map(|a| balances.get(&a.id))
            .copied()
            .sum::<Decimal>()
    }
}
