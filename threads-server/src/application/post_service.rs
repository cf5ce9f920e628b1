use tracing::{info, warn};

use crate::data::asset_store::AssetStore;
use crate::data::post_repository::{NewPost, NewReply, PostRepository};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{
    AuthorSnapshot, CreatePostRequest, LikeOutcome, Post, Reply, normalize_post_text,
    normalize_reply_text, sort_newest_first,
};

pub(crate) struct PostService<P, U, A>
where
    P: PostRepository,
    U: UserRepository,
    A: AssetStore,
{
    posts: P,
    users: U,
    assets: A,
}

impl<P, U, A> PostService<P, U, A>
where
    P: PostRepository,
    U: UserRepository,
    A: AssetStore,
{
    pub(crate) fn new(posts: P, users: U, assets: A) -> Self {
        Self {
            posts,
            users,
            assets,
        }
    }

    pub(crate) async fn create_post(
        &self,
        requester_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let draft = req.require_fields()?;

        let author = self
            .users
            .find_by_id(draft.posted_by)
            .await?
            .ok_or_else(|| DomainError::user_not_found(draft.posted_by))?;

        if author.id != requester_id {
            return Err(DomainError::Unauthorized("unauthorized to create post"));
        }

        let text = normalize_post_text(&draft.text)?;

        let uploaded = match draft.img.as_deref() {
            Some(payload) => Some(self.assets.upload(payload).await?),
            None => None,
        };
        let (img, img_asset_id) = match uploaded {
            Some(asset) => (Some(asset.url), Some(asset.asset_id)),
            None => (None, None),
        };

        let post = self
            .posts
            .create_post(NewPost {
                posted_by: author.id,
                text,
                img,
                img_asset_id,
            })
            .await?;

        info!(post_id = post.id, author_id = post.posted_by, "post created");
        Ok(post)
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    pub(crate) async fn delete_post(
        &self,
        requester_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let post = self.get_post(post_id).await?;

        if post.posted_by != requester_id {
            return Err(DomainError::Unauthorized("unauthorized to delete post"));
        }

        if let Some(asset_id) = post.image_asset_id()
            && let Err(err) = self.assets.delete(&asset_id).await
        {
            warn!(post_id, %asset_id, error = %err, "failed to delete post image");
        }

        if !self.posts.delete_post(post_id).await? {
            return Err(DomainError::post_not_found(post_id));
        }

        info!(post_id, "post deleted");
        Ok(())
    }

    pub(crate) async fn toggle_like(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<LikeOutcome, DomainError> {
        let post = self.get_post(post_id).await?;

        if post.is_liked_by(user_id) {
            self.posts.remove_like(post_id, user_id).await?;
            Ok(LikeOutcome::Unliked)
        } else {
            self.posts.add_like(post_id, user_id).await?;
            Ok(LikeOutcome::Liked)
        }
    }

    pub(crate) async fn add_reply(
        &self,
        author_id: i64,
        post_id: i64,
        text: &str,
    ) -> Result<Reply, DomainError> {
        let text = normalize_reply_text(text)?;

        // existence check only, the reply is appended by id
        self.get_post(post_id).await?;

        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(author_id))?;

        let reply = self
            .posts
            .add_reply(
                post_id,
                NewReply {
                    author: AuthorSnapshot::of(&author),
                    text,
                },
            )
            .await?;

        info!(post_id, reply_id = reply.id, author_id, "reply added");
        Ok(reply)
    }

    pub(crate) async fn feed(&self, requester_id: i64) -> Result<Vec<Post>, DomainError> {
        let user = self
            .users
            .find_by_id(requester_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(requester_id))?;

        let mut posts = self.posts.list_by_authors(&user.following).await?;
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    pub(crate) async fn user_timeline(&self, username: &str) -> Result<Vec<Post>, DomainError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))?
            .user;

        let mut posts = self.posts.list_by_authors(&[user.id]).await?;
        sort_newest_first(&mut posts);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::PostService;
    use crate::application::fakes::{
        InMemoryPostRepo, InMemoryUserRepo, RecordingAssetStore, base_time,
    };
    use crate::domain::error::DomainError;
    use crate::domain::post::{CreatePostRequest, LikeOutcome};

    type Service = PostService<InMemoryPostRepo, InMemoryUserRepo, RecordingAssetStore>;

    struct Fixture {
        posts: InMemoryPostRepo,
        users: InMemoryUserRepo,
        assets: RecordingAssetStore,
        service: Service,
    }

    fn fixture() -> Fixture {
        let posts = InMemoryPostRepo::new();
        let users = InMemoryUserRepo::new();
        let assets = RecordingAssetStore::new();
        let service = PostService::new(posts.clone(), users.clone(), assets.clone());
        Fixture {
            posts,
            users,
            assets,
            service,
        }
    }

    fn create_req(posted_by: i64, text: &str, img: Option<&str>) -> CreatePostRequest {
        CreatePostRequest {
            posted_by: Some(posted_by),
            text: Some(text.to_string()),
            img: img.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn create_post_accepts_500_chars_and_rejects_501() {
        let f = fixture();
        let author = f.users.seed("author");

        let at_limit = "a".repeat(500);
        let post = f
            .service
            .create_post(author, create_req(author, &at_limit, None))
            .await
            .expect("500 chars must be accepted");
        assert_eq!(post.text.chars().count(), 500);

        let err = f
            .service
            .create_post(author, create_req(author, &"a".repeat(501), None))
            .await
            .expect_err("501 chars must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "text", .. }));
        assert_eq!(f.posts.count(), 1);
    }

    #[tokio::test]
    async fn create_post_counts_padding_and_stores_text_as_sent() {
        let f = fixture();
        let author = f.users.seed("author");

        let padded = format!("{} ", "a".repeat(500));
        let err = f
            .service
            .create_post(author, create_req(author, &padded, None))
            .await
            .expect_err("501 chars with padding must be rejected");
        assert!(matches!(err, DomainError::Validation { field: "text", .. }));
        assert_eq!(f.posts.count(), 0);

        let post = f
            .service
            .create_post(author, create_req(author, "  hello  ", None))
            .await
            .expect("must be accepted");
        assert_eq!(post.text, "  hello  ");
    }

    #[tokio::test]
    async fn create_post_rejects_other_identity() {
        let f = fixture();
        let author = f.users.seed("author");
        let intruder = f.users.seed("intruder");

        let err = f
            .service
            .create_post(intruder, create_req(author, "hello", None))
            .await
            .expect_err("must be unauthorized");
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert_eq!(f.posts.count(), 0);
    }

    #[tokio::test]
    async fn create_post_requires_known_author_and_fields() {
        let f = fixture();

        let err = f
            .service
            .create_post(1, create_req(404, "hello", None))
            .await
            .expect_err("unknown author");
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = f
            .service
            .create_post(
                1,
                CreatePostRequest {
                    posted_by: Some(1),
                    text: None,
                    img: None,
                },
            )
            .await
            .expect_err("missing text");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn create_post_uploads_image_and_stores_reference() {
        let f = fixture();
        let author = f.users.seed("author");

        let post = f
            .service
            .create_post(
                author,
                create_req(author, "with picture", Some("data:image/png;base64,AAAA")),
            )
            .await
            .expect("create must succeed");

        assert_eq!(f.assets.uploads(), vec!["data:image/png;base64,AAAA".to_string()]);
        assert_eq!(post.img.as_deref(), Some("https://assets.test/threads/asset1.png"));
        assert_eq!(post.img_asset_id.as_deref(), Some("threads/asset1"));
    }

    #[tokio::test]
    async fn delete_post_only_by_author() {
        let f = fixture();
        let author = f.users.seed("author");
        let other = f.users.seed("other");
        let post = f
            .service
            .create_post(author, create_req(author, "mine", None))
            .await
            .expect("create must succeed");

        let err = f
            .service
            .delete_post(other, post.id)
            .await
            .expect_err("non-author must be rejected");
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert_eq!(f.posts.count(), 1);

        f.service
            .delete_post(author, post.id)
            .await
            .expect("author may delete");
        assert_eq!(f.posts.count(), 0);
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .delete_post(1, 999)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(f.assets.deletes().is_empty());
    }

    #[tokio::test]
    async fn delete_post_with_legacy_image_derives_asset_id_from_url() {
        let f = fixture();
        let author = f.users.seed("author");
        let post_id = f.posts.seed_post(
            author,
            "legacy",
            Some("https://res.cloudinary.com/demo/image/upload/v1712/legacyid.jpg"),
            base_time(),
        );

        f.service
            .delete_post(author, post_id)
            .await
            .expect("delete must succeed");

        assert_eq!(f.assets.deletes(), vec!["legacyid".to_string()]);
    }

    #[tokio::test]
    async fn delete_post_removes_record_even_if_asset_delete_fails() {
        let f = fixture();
        let author = f.users.seed("author");
        let post = f
            .service
            .create_post(author, create_req(author, "pic", Some("https://example.com/cat.png")))
            .await
            .expect("create must succeed");
        f.assets.fail_deletes();

        f.service
            .delete_post(author, post.id)
            .await
            .expect("asset failure must not block delete");

        assert_eq!(f.assets.deletes(), vec!["threads/asset1".to_string()]);
        assert_eq!(f.posts.count(), 0);
    }

    #[tokio::test]
    async fn toggle_like_twice_restores_likes() {
        let f = fixture();
        let author = f.users.seed("author");
        let fan = f.users.seed("fan");
        let post = f
            .service
            .create_post(author, create_req(author, "like me", None))
            .await
            .expect("create must succeed");
        let original = f.posts.likes(post.id);

        let first = f.service.toggle_like(fan, post.id).await.expect("like");
        assert_eq!(first, LikeOutcome::Liked);
        assert_eq!(f.posts.likes(post.id), vec![fan]);

        let second = f.service.toggle_like(fan, post.id).await.expect("unlike");
        assert_eq!(second, LikeOutcome::Unliked);
        assert_eq!(f.posts.likes(post.id), original);
    }

    #[tokio::test]
    async fn toggle_like_on_missing_post_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .toggle_like(1, 42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn add_reply_rejects_empty_text() {
        let f = fixture();
        let author = f.users.seed("author");
        let post = f
            .service
            .create_post(author, create_req(author, "post", None))
            .await
            .expect("create must succeed");

        let err = f
            .service
            .add_reply(author, post.id, "   ")
            .await
            .expect_err("empty reply");
        assert!(matches!(err, DomainError::Validation { field: "text", .. }));
    }

    #[tokio::test]
    async fn add_reply_appends_in_call_order_with_author_snapshot() {
        let f = fixture();
        let author = f.users.seed("author");
        let replier = f.users.seed("replier");
        f.users.set_profile_pic(replier, "https://assets.test/old.png", None);
        let post = f
            .service
            .create_post(author, create_req(author, "post", None))
            .await
            .expect("create must succeed");

        let first = f
            .service
            .add_reply(replier, post.id, "first")
            .await
            .expect("reply");
        f.users.set_profile_pic(replier, "https://assets.test/new.png", None);
        f.service
            .add_reply(author, post.id, "second")
            .await
            .expect("reply");

        assert_eq!(first.username, "replier");
        assert_eq!(first.user_profile_pic, "https://assets.test/old.png");

        let stored = f.service.get_post(post.id).await.expect("post exists");
        let texts: Vec<&str> = stored.replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(stored.replies[0].user_profile_pic, "https://assets.test/old.png");
    }

    #[tokio::test]
    async fn add_reply_to_missing_post_is_not_found() {
        let f = fixture();
        let author = f.users.seed("author");
        let err = f
            .service
            .add_reply(author, 77, "hello")
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn feed_merges_followed_authors_newest_first() {
        let f = fixture();
        let reader = f.users.seed("reader");
        let a = f.users.seed("alice");
        let b = f.users.seed("bob");
        let stranger = f.users.seed("stranger");
        f.users.follow(reader, a);
        f.users.follow(reader, b);

        let t0 = base_time();
        let a_old = f.posts.seed_post(a, "a old", None, t0);
        let b_mid = f.posts.seed_post(b, "b mid", None, t0 + Duration::minutes(5));
        let _hidden = f.posts.seed_post(stranger, "nope", None, t0 + Duration::minutes(7));
        let a_new = f.posts.seed_post(a, "a new", None, t0 + Duration::minutes(10));

        let feed = f.service.feed(reader).await.expect("feed must load");
        let ids: Vec<i64> = feed.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![a_new, b_mid, a_old]);
    }

    #[tokio::test]
    async fn feed_for_unknown_user_is_not_found() {
        let f = fixture();
        let err = f.service.feed(5).await.expect_err("unknown requester");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_timeline_lists_only_that_user() {
        let f = fixture();
        let a = f.users.seed("alice");
        let b = f.users.seed("bob");
        let t0 = base_time();
        let first = f.posts.seed_post(a, "one", None, t0);
        f.posts.seed_post(b, "other", None, t0 + Duration::minutes(1));
        let second = f.posts.seed_post(a, "two", None, t0 + Duration::minutes(2));

        let timeline = f.service.user_timeline("alice").await.expect("timeline");
        let ids: Vec<i64> = timeline.iter().map(|post| post.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn user_timeline_for_unknown_username_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .user_timeline("nobody")
            .await
            .expect_err("no such user");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
