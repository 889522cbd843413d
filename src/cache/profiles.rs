//! Author rows, shared by posts and profile screens.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::Store;
use crate::error::StoreError;
use crate::models::Profile;

const PROFILE_SELECT: &str = "
    SELECT id, username, display_name, image, bio, banner,
           followers, followee, following, created_at
    FROM authors";

/// Read a profile whose columns start at `offset`.
pub(super) fn row_to_profile(row: &Row<'_>, offset: usize) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(offset)?,
        username: row.get(offset + 1)?,
        display_name: row.get(offset + 2)?,
        image: row.get(offset + 3)?,
        bio: row.get(offset + 4)?,
        banner: row.get(offset + 5)?,
        followers: row.get(offset + 6)?,
        followee: row.get(offset + 7)?,
        following: row.get(offset + 8)?,
        created_at: row.get(offset + 9)?,
    })
}

/// Replace the author row. A different id holding the same username is
/// dropped, since usernames are unique on the server too.
pub(super) fn upsert_author(conn: &Connection, profile: &Profile) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO authors
            (id, username, display_name, image, bio, banner,
             followers, followee, following, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            profile.id,
            profile.username,
            profile.display_name,
            profile.image,
            profile.bio,
            profile.banner,
            profile.followers,
            profile.followee,
            profile.following,
            profile.created_at,
        ],
    )?;
    Ok(())
}

impl Store {
    pub fn upsert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        upsert_author(&*self.conn()?, profile)
    }

    pub fn upsert_profiles(&self, profiles: &[Profile]) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for profile in profiles {
            upsert_author(&tx, profile)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_profile(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        let sql = format!("{} WHERE username = ?1", PROFILE_SELECT);
        Ok(self
            .conn()?
            .query_row(&sql, params![username], |row| row_to_profile(row, 0))
            .optional()?)
    }

    pub fn get_profile_by_id(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let sql = format!("{} WHERE id = ?1", PROFILE_SELECT);
        Ok(self
            .conn()?
            .query_row(&sql, params![id], |row| row_to_profile(row, 0))
            .optional()?)
    }

    /// Profiles whose username or display name contains `query`.
    pub fn search_profiles(&self, query: &str, limit: u32) -> Result<Vec<Profile>, StoreError> {
        let conn = self.conn()?;
        let sql = format!(
            "{} WHERE username LIKE '%' || ?1 || '%' OR display_name LIKE '%' || ?1 || '%'
             ORDER BY username LIMIT ?2",
            PROFILE_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![query, i64::from(limit)], |row| row_to_profile(row, 0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Store the follow state the server reported. Returns whether a row changed.
    pub fn update_follow(
        &self,
        username: &str,
        followers: i64,
        followee: i64,
        following: bool,
    ) -> Result<bool, StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE authors SET followers = ?1, followee = ?2, following = ?3
             WHERE username = ?4",
            params![followers, followee, following, username],
        )?;
        Ok(changed > 0)
    }
}
