use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::post_repository::{NewPost, NewReply, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, Reply};

const POST_COLUMNS: &str = r#"
    p.id,
    p.posted_by,
    p.text,
    p.img,
    p.img_asset_id,
    ARRAY(
        SELECT l.user_id
        FROM post_likes l
        WHERE l.post_id = p.id
        ORDER BY l.created_at, l.user_id
    ) AS likes,
    p.created_at
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replies_for(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Reply>>, DomainError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ReplyRow>(
            r#"
            SELECT id, post_id, user_id, text, user_profile_pic, username, created_at
            FROM post_replies
            WHERE post_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        let mut grouped: HashMap<i64, Vec<Reply>> = HashMap::new();
        for row in rows {
            grouped.entry(row.post_id).or_default().push(row.into_reply());
        }
        Ok(grouped)
    }

    async fn attach_replies(&self, rows: Vec<PostRow>) -> Result<Vec<Post>, DomainError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut replies = self.replies_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let post_replies = replies.remove(&row.id).unwrap_or_default();
                row.into_post(post_replies)
            })
            .collect())
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    posted_by: i64,
    text: String,
    img: Option<String>,
    img_asset_id: Option<String>,
    likes: Vec<i64>,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self, replies: Vec<Reply>) -> Post {
        Post {
            id: self.id,
            posted_by: self.posted_by,
            text: self.text,
            img: self.img,
            img_asset_id: self.img_asset_id,
            likes: self.likes,
            replies,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReplyRow {
    id: i64,
    post_id: i64,
    user_id: i64,
    text: String,
    user_profile_pic: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl ReplyRow {
    fn into_reply(self) -> Reply {
        Reply {
            id: self.id,
            user_id: self.user_id,
            text: self.text,
            user_profile_pic: self.user_profile_pic,
            username: self.username,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (posted_by, text, img, img_asset_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, posted_by, text, img, img_asset_id,
                      ARRAY[]::BIGINT[] AS likes, created_at
            "#,
        )
        .bind(input.posted_by)
        .bind(input.text)
        .bind(input.img)
        .bind(input.img_asset_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.into_post(Vec::new()))
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        match row {
            Some(row) => Ok(self.attach_replies(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM post_likes
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn add_reply(&self, post_id: i64, input: NewReply) -> Result<Reply, DomainError> {
        let row = sqlx::query_as::<_, ReplyRow>(
            r#"
            INSERT INTO post_replies (post_id, user_id, text, user_profile_pic, username)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, user_id, text, user_profile_pic, username, created_at
            "#,
        )
        .bind(post_id)
        .bind(input.author.user_id)
        .bind(input.text)
        .bind(input.author.profile_pic)
        .bind(input.author.username)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.into_reply())
    }

    async fn list_by_authors(&self, author_ids: &[i64]) -> Result<Vec<Post>, DomainError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.posted_by = ANY($1) \
             ORDER BY p.created_at DESC, p.id DESC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_post_db_error)?;

        self.attach_replies(rows).await
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("posts_posted_by_fkey") => "author",
            Some("post_likes_user_id_fkey") | Some("post_replies_user_id_fkey") => "user",
            _ => "post",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
