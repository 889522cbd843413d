//! The signed-in account.

use rusqlite::{params, OptionalExtension, Row};

use super::Store;
use crate::error::StoreError;
use crate::models::Account;

const ACCOUNT_SELECT: &str =
    "SELECT id, email, username, display_name, image, banner, bio FROM accounts";

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        display_name: row.get(3)?,
        image: row.get(4)?,
        banner: row.get(5)?,
        bio: row.get(6)?,
    })
}

impl Store {
    pub fn upsert_account(&self, account: &Account) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO accounts
                (id, email, username, display_name, image, banner, bio)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                account.id,
                account.email,
                account.username,
                account.display_name,
                account.image,
                account.banner,
                account.bio,
            ],
        )?;
        Ok(())
    }

    pub fn get_account(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("{} WHERE id = ?1", ACCOUNT_SELECT);
        Ok(self
            .conn()?
            .query_row(&sql, params![id], row_to_account)
            .optional()?)
    }

    pub fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("{} WHERE username = ?1", ACCOUNT_SELECT);
        Ok(self
            .conn()?
            .query_row(&sql, params![username], row_to_account)
            .optional()?)
    }

    /// Overwrite an existing account. Returns false when no row matched.
    pub fn update_account(&self, account: &Account) -> Result<bool, StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE accounts
             SET email = ?1, username = ?2, display_name = ?3, image = ?4, banner = ?5, bio = ?6
             WHERE id = ?7",
            params![
                account.email,
                account.username,
                account.display_name,
                account.image,
                account.banner,
                account.bio,
                account.id,
            ],
        )?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::account;

    #[test]
    fn test_upsert_and_get() {
        let store = Store::open_in_memory().unwrap();
        let alice = account("a1", "alice");
        store.upsert_account(&alice).unwrap();

        assert_eq!(store.get_account("a1").unwrap(), Some(alice.clone()));
        assert_eq!(store.get_account_by_username("alice").unwrap(), Some(alice));
        assert!(store.get_account("a2").unwrap().is_none());
    }

    #[test]
    fn test_update_account() {
        let store = Store::open_in_memory().unwrap();
        store.upsert_account(&account("a1", "alice")).unwrap();

        let edited = Account {
            bio: Some("new bio".into()),
            display_name: "Alice B".into(),
            ..account("a1", "alice")
        };
        assert!(store.update_account(&edited).unwrap());
        assert_eq!(store.get_account("a1").unwrap(), Some(edited));

        assert!(!store.update_account(&account("zz", "ghost")).unwrap());
    }
}
