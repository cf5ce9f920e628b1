use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::{info, warn};

use crate::data::asset_store::AssetStore;
use crate::data::user_repository::{NewUser, ProfilePatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{
    FollowOutcome, LoginRequest, SignupRequest, UpdateProfileRequest, User, ValidSignup,
};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct UserService<U, A>
where
    U: UserRepository,
    A: AssetStore,
{
    users: U,
    assets: A,
    jwt: JwtService,
}

impl<U, A> UserService<U, A>
where
    U: UserRepository,
    A: AssetStore,
{
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(users: U, assets: A, jwt: JwtService) -> Self {
        Self { users, assets, jwt }
    }

    pub(crate) async fn signup(&self, req: SignupRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;
        let password_hash = self.hash_password(&req.password)?;

        let user = self
            .users
            .create_user(Self::into_new_user(req, password_hash))
            .await?;
        let access_token = self.issue_token(&user)?;

        info!(user_id = user.id, username = %user.username, "user signed up");
        Ok(AuthResult { user, access_token })
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.users.find_by_username(&req.username).await? {
            Some(user_creds) => user_creds,
            None => {
                // keep timing close to the existing-user path
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;
        let access_token = self.issue_token(&user_creds.user)?;

        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    pub(crate) async fn get_profile(&self, username: &str) -> Result<User, DomainError> {
        let username = username.trim();
        self.users
            .find_by_username(username)
            .await?
            .map(|creds| creds.user)
            .ok_or_else(|| DomainError::user_not_found(username))
    }

    pub(crate) async fn update_profile(
        &self,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;

        let current = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        let uploaded = match req.profile_pic.as_deref() {
            Some(payload) => {
                let uploaded = self.assets.upload(payload).await?;
                if let Some(old_id) = current.profile_pic_asset()
                    && let Err(err) = self.assets.delete(&old_id).await
                {
                    warn!(user_id, asset_id = %old_id, error = %err, "failed to delete old profile picture");
                }
                Some(uploaded)
            }
            None => None,
        };
        let (profile_pic, profile_pic_asset_id) = match uploaded {
            Some(asset) => (Some(asset.url), Some(asset.asset_id)),
            None => (None, None),
        };

        let user = self
            .users
            .update_profile(
                user_id,
                ProfilePatch {
                    name: req.name,
                    bio: req.bio,
                    profile_pic,
                    profile_pic_asset_id,
                },
            )
            .await?
            .ok_or_else(|| DomainError::user_not_found(user_id))?;

        info!(user_id, "profile updated");
        Ok(user)
    }

    pub(crate) async fn toggle_follow(
        &self,
        requester_id: i64,
        target_id: i64,
    ) -> Result<FollowOutcome, DomainError> {
        if requester_id == target_id {
            return Err(DomainError::Validation {
                field: "id",
                message: "you cannot follow yourself",
            });
        }

        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(DomainError::user_not_found(target_id));
        }
        let requester = self
            .users
            .find_by_id(requester_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(requester_id))?;

        if requester.is_following(target_id) {
            self.users.remove_follow(requester_id, target_id).await?;
            info!(requester_id, target_id, "user unfollowed");
            Ok(FollowOutcome::Unfollowed)
        } else {
            self.users.add_follow(requester_id, target_id).await?;
            info!(requester_id, target_id, "user followed");
            Ok(FollowOutcome::Followed)
        }
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        self.jwt
            .issue(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }

    fn into_new_user(req: ValidSignup, password_hash: String) -> NewUser {
        NewUser {
            name: req.name,
            username: req.username,
            email: req.email,
            password_hash,
            student: req.student,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
