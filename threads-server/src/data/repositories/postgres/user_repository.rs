use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{StudentDetails, User};

const USER_COLUMNS: &str = r#"
    u.id,
    u.name,
    u.username,
    u.email,
    u.password_hash,
    u.profile_pic,
    u.profile_pic_asset_id,
    u.bio,
    u.is_student,
    u.school,
    u.programs,
    u.batch,
    ARRAY(
        SELECT f.followee_id
        FROM follows f
        WHERE f.follower_id = u.id
        ORDER BY f.created_at, f.followee_id
    ) AS following,
    u.created_at
"#;

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        predicate: &str,
        bind: UserKey<'_>,
    ) -> Result<Option<UserRow>, DomainError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE {predicate}");
        let query = sqlx::query_as::<_, UserRow>(&sql);
        let query = match bind {
            UserKey::Id(id) => query.bind(id),
            UserKey::Username(username) => query.bind(username),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_user_db_error)
    }
}

enum UserKey<'a> {
    Id(i64),
    Username(&'a str),
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    username: String,
    email: String,
    password_hash: String,
    profile_pic: String,
    profile_pic_asset_id: Option<String>,
    bio: String,
    is_student: bool,
    school: Option<String>,
    programs: Option<String>,
    batch: Option<String>,
    following: Vec<i64>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_credentials(self) -> Result<UserCredentials, DomainError> {
        let mut user = User::new(self.id, self.name, self.username, self.email, self.created_at)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        user.profile_pic = self.profile_pic;
        user.profile_pic_asset_id = self.profile_pic_asset_id;
        user.bio = self.bio;
        user.following = self.following;
        user.student = self.is_student.then_some(StudentDetails {
            school: self.school,
            programs: self.programs,
            batch: self.batch,
        });

        Ok(UserCredentials {
            user,
            password_hash: self.password_hash,
        })
    }

    fn into_user(self) -> Result<User, DomainError> {
        self.into_credentials().map(|creds| creds.user)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let (is_student, school, programs, batch) = match input.student {
            Some(student) => (true, student.school, student.programs, student.batch),
            None => (false, None, None, None),
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, username, email, password_hash, is_student, school, programs, batch)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, username, email, password_hash, profile_pic,
                      profile_pic_asset_id, bio,
                      is_student, school, programs, batch,
                      ARRAY[]::BIGINT[] AS following, created_at
            "#,
        )
        .bind(input.name)
        .bind(input.username)
        .bind(input.email)
        .bind(input.password_hash)
        .bind(is_student)
        .bind(school)
        .bind(programs)
        .bind(batch)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.into_user()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        self.fetch_one_where("u.id = $1", UserKey::Id(id))
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        self.fetch_one_where("u.username = $1", UserKey::Username(username))
            .await?
            .map(UserRow::into_credentials)
            .transpose()
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                profile_pic = COALESCE($4, profile_pic),
                profile_pic_asset_id = COALESCE($5, profile_pic_asset_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.bio)
        .bind(patch.profile_pic)
        .bind(patch.profile_pic_asset_id)
        .execute(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn add_follow(&self, follower_id: i64, followee_id: i64) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        Ok(())
    }

    async fn remove_follow(&self, follower_id: i64, followee_id: i64) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM follows
            WHERE follower_id = $1 AND followee_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        Ok(())
    }
}

fn map_user_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                let resource = match db_err.constraint() {
                    Some("users_username_key") => "username",
                    Some("users_email_key") => "email",
                    _ => "user",
                };
                return DomainError::AlreadyExists(resource.to_string());
            }
            Some("23503") => return DomainError::NotFound("user".to_string()),
            _ => {}
        }
    }
    DomainError::Unexpected(err.to_string())
}
