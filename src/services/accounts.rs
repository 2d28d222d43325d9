//! Social account listing and default-account seeding.

use tracing::info;

use crate::error::{Error, Result};
use crate::model::{Platform, SocialAccount, new_id};
use crate::query::account_options;
use crate::store::{Collection, Filter, Store};

#[derive(Clone)]
pub struct AccountService {
    accounts: Collection<SocialAccount>,
}

impl AccountService {
    pub fn new(store: &Store) -> Self {
        Self {
            accounts: store.collection(),
        }
    }

    /// Lists accounts, first creating a disconnected placeholder for every
    /// default platform that has no record yet.
    ///
    /// Seeding is an insert-if-absent keyed by platform, so concurrent first
    /// reads cannot create duplicates. Results are ordered by the default
    /// platform order, with any other platforms last.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if a read or write fails.
    pub async fn list(&self) -> Result<Vec<SocialAccount>> {
        let mut accounts = self.find_all().await?;

        let missing: Vec<_> = Platform::DEFAULT_ACCOUNTS
            .into_iter()
            .filter(|platform| !accounts.iter().any(|a| &a.platform == platform))
            .collect();

        if !missing.is_empty() {
            for platform in missing {
                let guard = Filter::all().eq("platform", platform.as_str());
                let account = SocialAccount::placeholder(platform, new_id());
                let created = self
                    .accounts
                    .insert_if_absent(&guard, &account)
                    .await
                    .map_err(Error::storage)?;
                if created {
                    info!(platform = %account.platform, id = %account.id, "Seeded social account");
                }
            }
            accounts = self.find_all().await?;
        }

        accounts.sort_by_key(|a| a.platform.rank());
        Ok(accounts)
    }

    async fn find_all(&self) -> Result<Vec<SocialAccount>> {
        self.accounts
            .find(&Filter::all(), &account_options())
            .await
            .map_err(Error::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_seeds_four_disconnected_accounts() {
        let service = AccountService::new(&Store::memory());

        let accounts = service.list().await.unwrap();
        let platforms: Vec<_> = accounts.iter().map(|a| a.platform.as_str()).collect();

        assert_eq!(platforms, ["instagram", "facebook", "pinterest", "twitter"]);
        assert!(accounts.iter().all(|a| !a.is_connected));
        assert!(accounts.iter().all(|a| a.credentials.is_none()));
    }

    #[tokio::test]
    async fn test_second_listing_returns_same_records() {
        let service = AccountService::new(&Store::memory());

        let first = service.list().await.unwrap();
        let second = service.list().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_first_reads_do_not_duplicate() {
        let store = Store::memory();
        let service = AccountService::new(&store);

        let (a, b, c) = tokio::join!(service.list(), service.list(), service.list());
        assert_eq!(a.unwrap().len(), 4);
        assert_eq!(b.unwrap().len(), 4);
        assert_eq!(c.unwrap().len(), 4);

        let stored = store
            .collection::<SocialAccount>()
            .count(&Filter::all())
            .await
            .unwrap();
        assert_eq!(stored, 4);
    }

    #[tokio::test]
    async fn test_only_missing_platforms_are_seeded() {
        let store = Store::memory();
        let existing = SocialAccount {
            is_connected: true,
            ..SocialAccount::placeholder(Platform::Facebook, "fb".to_string())
        };
        store
            .collection::<SocialAccount>()
            .insert(&existing)
            .await
            .unwrap();

        let accounts = AccountService::new(&store).list().await.unwrap();
        assert_eq!(accounts.len(), 4);

        let facebook = accounts
            .iter()
            .find(|a| a.platform == Platform::Facebook)
            .unwrap();
        assert_eq!(facebook.id, "fb");
        assert!(facebook.is_connected);
    }
}
