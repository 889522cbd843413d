//! Post rows and their paginated queries.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::profiles::{row_to_profile, upsert_author};
use super::{json_column, now_epoch, Store};
use crate::error::StoreError;
use crate::models::{Attachment, Post};

/// Post columns followed by author columns, in `row_to_post` order.
const POST_SELECT: &str = "
    SELECT p.id, p.text, p.likes, p.liked, p.retweets, p.retweeted, p.is_retweet,
           p.file, p.files, p.created_at,
           a.id, a.username, a.display_name, a.image, a.bio, a.banner,
           a.followers, a.followee, a.following, a.created_at
    FROM posts p
    JOIN authors a ON a.id = p.author_id";

/// Offset of the author columns in `POST_SELECT`.
const AUTHOR_OFFSET: usize = 10;

const HAS_MEDIA: &str = "((p.file IS NOT NULL AND p.file != '')
     OR (p.files IS NOT NULL AND p.files NOT IN ('', '[]')))";

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    let files: Option<Vec<Attachment>> = json_column(row, 8)?;
    Ok(Post {
        id: row.get(0)?,
        text: row.get(1)?,
        likes: row.get(2)?,
        liked: row.get(3)?,
        retweets: row.get(4)?,
        retweeted: row.get(5)?,
        is_retweet: row.get(6)?,
        file: json_column(row, 7)?,
        files: files.unwrap_or_default(),
        created_at: row.get(9)?,
        profile: row_to_profile(row, AUTHOR_OFFSET)?,
    })
}

fn query_posts(
    conn: &Connection,
    sql: &str,
    bind: &[&dyn ToSql],
) -> Result<Vec<Post>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(bind, row_to_post)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn encode_attachments(post: &Post) -> Result<(Option<String>, Option<String>), StoreError> {
    let file = post.file.as_ref().map(serde_json::to_string).transpose()?;
    let files = if post.files.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&post.files)?)
    };
    Ok((file, files))
}

/// Insert or update a post and its author.
///
/// Feed membership is never cleared by an upsert, and a fresh copy from the
/// server revives a tombstoned row.
fn upsert_post_row(conn: &Connection, post: &Post, is_feed: bool) -> Result<(), StoreError> {
    upsert_author(conn, &post.profile)?;
    let (file, files) = encode_attachments(post)?;
    conn.execute(
        "INSERT INTO posts (id, text, likes, liked, retweets, retweeted, is_retweet,
                            file, files, author_id, created_at, date_cached, is_feed, is_deleted)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 0)
         ON CONFLICT(id) DO UPDATE SET
            text = excluded.text,
            likes = excluded.likes,
            liked = excluded.liked,
            retweets = excluded.retweets,
            retweeted = excluded.retweeted,
            is_retweet = excluded.is_retweet,
            file = excluded.file,
            files = excluded.files,
            author_id = excluded.author_id,
            created_at = excluded.created_at,
            date_cached = excluded.date_cached,
            is_feed = MAX(posts.is_feed, excluded.is_feed),
            is_deleted = 0",
        params![
            post.id,
            post.text,
            post.likes,
            post.liked,
            post.retweets,
            post.retweeted,
            post.is_retweet,
            file,
            files,
            post.profile.id,
            post.created_at,
            now_epoch(),
            is_feed,
        ],
    )?;
    Ok(())
}

impl Store {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub fn upsert_post(&self, post: &Post, is_feed: bool) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        upsert_post_row(&tx, post, is_feed)?;
        tx.commit()?;
        Ok(())
    }

    pub fn upsert_posts(&self, posts: &[Post], is_feed: bool) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for post in posts {
            upsert_post_row(&tx, post, is_feed)?;
        }
        tx.commit()?;
        tracing::debug!("Cached {} posts (feed: {})", posts.len(), is_feed);
        Ok(())
    }

    /// Set the like counter and flag together. Returns whether a row changed.
    pub fn update_likes(&self, id: &str, likes: i64, liked: bool) -> Result<bool, StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE posts SET likes = ?1, liked = ?2 WHERE id = ?3",
            params![likes, liked, id],
        )?;
        Ok(changed > 0)
    }

    /// Set the retweet counter and flag together. Returns whether a row changed.
    pub fn update_retweets(
        &self,
        id: &str,
        retweets: i64,
        retweeted: bool,
    ) -> Result<bool, StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE posts SET retweets = ?1, retweeted = ?2 WHERE id = ?3",
            params![retweets, retweeted, id],
        )?;
        Ok(changed > 0)
    }

    /// Drop a post from the feed and hide it from lookups, keeping the row.
    pub fn soft_delete_post(&self, id: &str) -> Result<bool, StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE posts SET is_feed = 0, is_deleted = 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }

    /// Remove the row entirely.
    pub fn delete_post(&self, id: &str) -> Result<bool, StoreError> {
        let changed = self
            .conn()?
            .execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// A live (not deleted) post with its author.
    pub fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let conn = self.conn()?;
        let sql = format!("{} WHERE p.id = ?1 AND p.is_deleted = 0", POST_SELECT);
        Ok(conn.query_row(&sql, params![id], row_to_post).optional()?)
    }

    /// Whether a row exists for `id`, deleted or not.
    pub fn contains_post_row(&self, id: &str) -> Result<bool, StoreError> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM posts WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Feed page `page` (1-based), newest first.
    pub fn get_feed_page(&self, page: u32) -> Result<Vec<Post>, StoreError> {
        let size = i64::from(self.page_size);
        let offset = i64::from(page.max(1) - 1) * size;
        let sql = format!(
            "{} WHERE p.is_feed = 1 AND p.is_deleted = 0
             ORDER BY p.created_at DESC LIMIT ?1 OFFSET ?2",
            POST_SELECT
        );
        query_posts(&*self.conn()?, &sql, params![size, offset])
    }

    /// Up to one page of feed posts strictly older than `cursor`.
    pub fn get_feed_before(&self, cursor: &str) -> Result<Vec<Post>, StoreError> {
        let size = i64::from(self.page_size);
        let sql = format!(
            "{} WHERE p.is_feed = 1 AND p.is_deleted = 0 AND p.created_at < ?1
             ORDER BY p.created_at DESC LIMIT ?2",
            POST_SELECT
        );
        query_posts(&*self.conn()?, &sql, params![cursor, size])
    }

    /// The first `page` pages of the feed in one list.
    pub fn restore_feed(&self, page: u32) -> Result<Vec<Post>, StoreError> {
        let limit = i64::from(page.max(1)) * i64::from(self.page_size);
        let sql = format!(
            "{} WHERE p.is_feed = 1 AND p.is_deleted = 0
             ORDER BY p.created_at DESC LIMIT ?1",
            POST_SELECT
        );
        query_posts(&*self.conn()?, &sql, params![limit])
    }

    /// One page of an author's posts, optionally only those with media.
    pub fn get_author_posts(
        &self,
        author_id: &str,
        cursor: Option<&str>,
        media_only: bool,
    ) -> Result<Vec<Post>, StoreError> {
        let size = i64::from(self.page_size);
        let mut sql = format!("{} WHERE p.author_id = ?1 AND p.is_deleted = 0", POST_SELECT);
        let mut bind: Vec<&dyn ToSql> = vec![&author_id];
        if let Some(cursor) = &cursor {
            sql.push_str(" AND p.created_at < ?2");
            bind.push(cursor);
        }
        if media_only {
            sql.push_str(" AND ");
            sql.push_str(HAS_MEDIA);
        }
        sql.push_str(&format!(
            " ORDER BY p.created_at DESC LIMIT ?{}",
            bind.len() + 1
        ));
        bind.push(&size);
        query_posts(&*self.conn()?, &sql, &bind)
    }

    /// Number of live feed rows.
    pub fn feed_post_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM posts WHERE is_feed = 1 AND is_deleted = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
