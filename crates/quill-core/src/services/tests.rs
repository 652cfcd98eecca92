//! Service-level tests over in-memory store fakes.
//!
//! The fakes mirror the storage contract, including the delete cascade from
//! posts to comments and the public filter built from `policy::is_public`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::domain::{
    AuthorRef, Category, Comment, Location, Post, PostEntry, PostFields, ProfileFields, User,
};
use crate::error::{DomainError, RepoError};
use crate::page::{Page, PageRequest};
use crate::policy::{self, Viewer};
use crate::ports::{
    AuthorScope, CategoryStore, CommentStore, LocationStore, PostStore, UserStore,
};
use crate::services::{ContentService, Destination, ListingService};

#[derive(Default)]
struct MemDb {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    categories: Mutex<Vec<Category>>,
    locations: Mutex<Vec<Location>>,
    users: Mutex<Vec<User>>,
}

impl MemDb {
    fn entry(&self, post: Post) -> PostEntry {
        let comment_count = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post.id)
            .count() as u64;
        PostEntry {
            post,
            comment_count,
        }
    }

    fn listing(&self, mut posts: Vec<Post>, page: PageRequest) -> Page<PostEntry> {
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        let total = posts.len() as u64;
        let items = posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .map(|p| self.entry(p))
            .collect();
        Page::new(items, page, total)
    }
}

#[async_trait]
impl PostStore for MemDb {
    async fn find(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_public(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| policy::is_public(p, now))
            .cloned()
            .collect();
        Ok(self.listing(posts, page))
    }

    async fn list_in_category(
        &self,
        category_id: Uuid,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category.as_ref().is_some_and(|c| c.id == category_id))
            .filter(|p| policy::is_public(p, now))
            .cloned()
            .collect();
        Ok(self.listing(posts, page))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        scope: AuthorScope,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author.id == author_id)
            .filter(|p| scope == AuthorScope::Everything || policy::is_public(p, now))
            .cloned()
            .collect();
        Ok(self.listing(posts, page))
    }

    async fn insert(&self, post: &Post) -> Result<(), RepoError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let slot = posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts.lock().unwrap().retain(|p| p.id != id);
        // Schema cascade: comments go with the post.
        self.comments.lock().unwrap().retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemDb {
    async fn find(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn insert(&self, comment: &Comment) -> Result<(), RepoError> {
        self.comments.lock().unwrap().push(comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> Result<(), RepoError> {
        let mut comments = self.comments.lock().unwrap();
        let slot = comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.comments.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for MemDb {
    async fn find(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl LocationStore for MemDb {
    async fn find(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self
            .locations
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned())
    }
}

#[async_trait]
impl UserStore for MemDb {
    async fn find(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), RepoError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), RepoError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(())
    }
}

struct Fixture {
    db: Arc<MemDb>,
    listing: ListingService,
    content: ContentService,
}

fn fixture_with(config: SiteConfig) -> Fixture {
    let db = Arc::new(MemDb::default());
    let listing = ListingService::new(
        db.clone(),
        db.clone(),
        db.clone(),
        db.clone(),
        config.clone(),
    );
    let content = ContentService::new(
        db.clone(),
        db.clone(),
        db.clone(),
        db.clone(),
        db.clone(),
        config,
    );
    Fixture {
        db,
        listing,
        content,
    }
}

fn fixture() -> Fixture {
    fixture_with(SiteConfig::default())
}

impl Fixture {
    fn add_user(&self, username: &str) -> User {
        let user = User::new(
            username.to_owned(),
            format!("{username}@example.com"),
            "hash".to_owned(),
        );
        self.db.users.lock().unwrap().push(user.clone());
        user
    }

    fn add_category(&self, slug: &str, published: bool) -> Category {
        let mut category = Category::new(slug.to_owned(), "about".to_owned(), slug.to_owned());
        category.is_published = published;
        self.db.categories.lock().unwrap().push(category.clone());
        category
    }

    fn add_post(
        &self,
        author: &User,
        published: bool,
        pub_date: DateTime<Utc>,
        category: Option<&Category>,
    ) -> Post {
        let post = Post::new(
            AuthorRef {
                id: author.id,
                username: author.username.clone(),
            },
            PostFields {
                title: format!("post by {}", author.username),
                text: "body".to_owned(),
                pub_date,
                is_published: published,
                category_id: category.map(|c| c.id),
                location_id: None,
                image: None,
            },
            category.map(|c| crate::domain::CategoryRef {
                id: c.id,
                slug: c.slug.clone(),
                title: c.title.clone(),
                is_published: c.is_published,
            }),
            None,
        );
        self.db.posts.lock().unwrap().push(post.clone());
        post
    }

    /// Mirror the schema's set-null: dropping a category clears the
    /// reference on its posts but leaves the posts themselves alone.
    fn delete_category(&self, id: Uuid) {
        self.db.categories.lock().unwrap().retain(|c| c.id != id);
        for post in self.db.posts.lock().unwrap().iter_mut() {
            if post.category.as_ref().is_some_and(|c| c.id == id) {
                post.category = None;
            }
        }
    }

    fn add_comment(&self, author: &User, post: &Post) -> Comment {
        let comment = Comment::new(
            AuthorRef {
                id: author.id,
                username: author.username.clone(),
            },
            post.id,
            "nice one".to_owned(),
        );
        self.db.comments.lock().unwrap().push(comment.clone());
        comment
    }
}

fn yesterday() -> DateTime<Utc> {
    Utc::now() - TimeDelta::days(1)
}

fn tomorrow() -> DateTime<Utc> {
    Utc::now() + TimeDelta::days(1)
}

fn fields(title: &str, pub_date: DateTime<Utc>) -> PostFields {
    PostFields {
        title: title.to_owned(),
        text: "body".to_owned(),
        pub_date,
        is_published: true,
        category_id: None,
        location_id: None,
        image: None,
    }
}

#[tokio::test]
async fn index_lists_only_publicly_visible_posts() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let hidden_cat = fx.add_category("drafts", false);

    let open = fx.add_post(&ada, true, yesterday(), None);
    fx.add_post(&ada, false, yesterday(), None);
    fx.add_post(&ada, true, tomorrow(), None);
    fx.add_post(&ada, true, yesterday(), Some(&hidden_cat));

    let page = fx.listing.list_public(1).await.unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].post.id, open.id);
}

#[tokio::test]
async fn index_annotates_live_comment_counts() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let bob = fx.add_user("bob");
    let post = fx.add_post(&ada, true, yesterday(), None);
    fx.add_comment(&bob, &post);
    fx.add_comment(&ada, &post);

    let page = fx.listing.list_public(1).await.unwrap();
    assert_eq!(page.items[0].comment_count, 2);
}

#[tokio::test]
async fn detail_conflates_missing_and_hidden_posts() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let stranger = Viewer::User(fx.add_user("bob").id);
    let hidden = fx.add_post(&ada, false, yesterday(), None);

    let missing = fx
        .listing
        .post_detail(Uuid::new_v4(), stranger)
        .await
        .unwrap_err();
    let denied = fx.listing.post_detail(hidden.id, stranger).await.unwrap_err();

    // The two failures must be indistinguishable.
    match (missing, denied) {
        (DomainError::NotFound { what: a }, DomainError::NotFound { what: b }) => {
            assert_eq!(a, b);
        }
        other => panic!("expected NotFound for both, got {other:?}"),
    }
}

#[tokio::test]
async fn author_sees_own_hidden_posts_everywhere() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let scheduled = fx.add_post(&ada, true, tomorrow(), None);

    // Not on the index today.
    assert_eq!(fx.listing.list_public(1).await.unwrap().total_items, 0);

    // But visible to its author on detail and profile.
    let detail = fx
        .listing
        .post_detail(scheduled.id, Viewer::User(ada.id))
        .await
        .unwrap();
    assert_eq!(detail.post.id, scheduled.id);

    let profile = fx
        .listing
        .list_by_author("ada", Viewer::User(ada.id), 1)
        .await
        .unwrap();
    assert_eq!(profile.posts.total_items, 1);

    // Strangers see an empty profile.
    let as_stranger = fx
        .listing
        .list_by_author("ada", Viewer::Anonymous, 1)
        .await
        .unwrap();
    assert_eq!(as_stranger.posts.total_items, 0);
}

#[tokio::test]
async fn unpublished_category_is_gone_and_gates_its_posts() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let hidden_cat = fx.add_category("secret", false);
    fx.add_post(&ada, true, yesterday(), Some(&hidden_cat));

    assert!(matches!(
        fx.listing.list_by_category("secret", 1).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        fx.listing.list_by_category("no-such", 1).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert_eq!(fx.listing.list_public(1).await.unwrap().total_items, 0);
}

#[tokio::test]
async fn category_delete_nulls_the_reference_and_keeps_the_post() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let secret = fx.add_category("secret", false);
    let post = fx.add_post(&ada, true, yesterday(), Some(&secret));

    // Gated while filed under the unpublished category.
    assert_eq!(fx.listing.list_public(1).await.unwrap().total_items, 0);

    fx.delete_category(secret.id);

    // The post survives with the reference cleared, and with no category
    // left to gate it, the index shows it again.
    let page = fx.listing.list_public(1).await.unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].post.id, post.id);
    assert!(page.items[0].post.category.is_none());
}

#[tokio::test]
async fn category_page_lists_its_visible_posts() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let travel = fx.add_category("travel", true);
    let visible = fx.add_post(&ada, true, yesterday(), Some(&travel));
    fx.add_post(&ada, false, yesterday(), Some(&travel));
    fx.add_post(&ada, true, yesterday(), None);

    let page = fx.listing.list_by_category("travel", 1).await.unwrap();
    assert_eq!(page.category.id, travel.id);
    assert_eq!(page.posts.total_items, 1);
    assert_eq!(page.posts.items[0].post.id, visible.id);
}

#[tokio::test]
async fn listing_orders_by_pub_date_desc_and_paginates() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    for i in 0..15 {
        fx.add_post(&ada, true, yesterday() - TimeDelta::hours(i), None);
    }

    let first = fx.listing.list_public(1).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_items, 15);
    assert_eq!(first.total_pages, 2);
    let dates: Vec<_> = first.items.iter().map(|e| e.post.pub_date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);

    let second = fx.listing.list_public(2).await.unwrap();
    assert_eq!(second.items.len(), 5);
}

#[tokio::test]
async fn create_post_stamps_author_and_lands_on_profile() {
    let fx = fixture();
    let ada = fx.add_user("ada");

    let (post, dest) = fx
        .content
        .create_post(Viewer::User(ada.id), fields("hello", yesterday()))
        .await
        .unwrap();

    assert_eq!(post.author.id, ada.id);
    assert_eq!(dest, Destination::Profile("ada".to_owned()));
}

#[tokio::test]
async fn anonymous_cannot_create() {
    let fx = fixture();
    assert!(matches!(
        fx.content
            .create_post(Viewer::Anonymous, fields("hello", yesterday()))
            .await
            .unwrap_err(),
        DomainError::Unauthenticated
    ));
}

#[tokio::test]
async fn create_post_rejects_dangling_category_reference() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let mut f = fields("hello", yesterday());
    f.category_id = Some(Uuid::new_v4());

    match fx.content.create_post(Viewer::User(ada.id), f).await {
        Err(DomainError::Validation(errors)) => {
            assert_eq!(errors[0].field, "category_id");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn non_author_update_redirects_to_detail_and_changes_nothing() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let bob = fx.add_user("bob");
    let post = fx.add_post(&ada, true, yesterday(), None);

    let err = fx
        .content
        .update_post(Viewer::User(bob.id), post.id, fields("hijacked", yesterday()))
        .await
        .unwrap_err();
    match err {
        DomainError::Forbidden { fallback } => {
            assert_eq!(fallback, Destination::PostDetail(post.id));
        }
        other => panic!("expected Forbidden, got {other:?}"),
    }

    let unchanged = PostStore::find(&*fx.db, post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, post.title);
}

#[tokio::test]
async fn update_post_preserves_author_and_created_at() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let post = fx.add_post(&ada, true, yesterday(), None);

    let (updated, dest) = fx
        .content
        .update_post(Viewer::User(ada.id), post.id, fields("renamed", tomorrow()))
        .await
        .unwrap();

    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.author, post.author);
    assert_eq!(updated.created_at, post.created_at);
    assert_eq!(dest, Destination::PostDetail(post.id));
}

#[tokio::test]
async fn delete_post_cascades_to_comments() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let bob = fx.add_user("bob");
    let post = fx.add_post(&ada, true, yesterday(), None);
    let comment = fx.add_comment(&bob, &post);

    let dest = fx
        .content
        .delete_post(Viewer::User(ada.id), post.id)
        .await
        .unwrap();

    assert_eq!(dest, Destination::Profile("ada".to_owned()));
    assert!(PostStore::find(&*fx.db, post.id).await.unwrap().is_none());
    assert!(
        CommentStore::find(&*fx.db, comment.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn comment_ownership_is_per_comment_not_per_post() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let bob = fx.add_user("bob");
    let post = fx.add_post(&ada, true, yesterday(), None);
    let comment = fx.add_comment(&bob, &post);

    // The post's author does not own the comment.
    let err = fx
        .content
        .update_comment(
            Viewer::User(ada.id),
            post.id,
            comment.id,
            "edited".to_owned(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));

    // Its own author does.
    let (updated, _) = fx
        .content
        .update_comment(
            Viewer::User(bob.id),
            post.id,
            comment.id,
            "edited".to_owned(),
        )
        .await
        .unwrap();
    assert_eq!(updated.text, "edited");
}

#[tokio::test]
async fn comment_must_belong_to_the_addressed_post() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let post_a = fx.add_post(&ada, true, yesterday(), None);
    let post_b = fx.add_post(&ada, true, yesterday(), None);
    let comment = fx.add_comment(&ada, &post_a);

    assert!(matches!(
        fx.content
            .delete_comment(Viewer::User(ada.id), post_b.id, comment.id)
            .await
            .unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn lenient_commenting_ignores_target_visibility() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let bob = fx.add_user("bob");
    let hidden = fx.add_post(&ada, false, yesterday(), None);

    // Reference behavior: existence is enough.
    let (comment, dest) = fx
        .content
        .create_comment(Viewer::User(bob.id), hidden.id, "first".to_owned())
        .await
        .unwrap();
    assert_eq!(comment.post_id, hidden.id);
    assert_eq!(dest, Destination::PostDetail(hidden.id));
}

#[tokio::test]
async fn strict_commenting_applies_the_visibility_rule() {
    let fx = fixture_with(SiteConfig {
        strict_comment_visibility: true,
        ..SiteConfig::default()
    });
    let ada = fx.add_user("ada");
    let bob = fx.add_user("bob");
    let hidden = fx.add_post(&ada, false, yesterday(), None);

    assert!(matches!(
        fx.content
            .create_comment(Viewer::User(bob.id), hidden.id, "first".to_owned())
            .await
            .unwrap_err(),
        DomainError::NotFound { .. }
    ));

    // The author can still comment on their own hidden post.
    assert!(
        fx.content
            .create_comment(Viewer::User(ada.id), hidden.id, "note".to_owned())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn detail_carries_the_comment_thread_oldest_first() {
    let fx = fixture();
    let ada = fx.add_user("ada");
    let bob = fx.add_user("bob");
    let post = fx.add_post(&ada, true, yesterday(), None);
    let first = fx.add_comment(&bob, &post);
    let second = fx.add_comment(&ada, &post);

    let detail = fx
        .listing
        .post_detail(post.id, Viewer::Anonymous)
        .await
        .unwrap();
    assert_eq!(detail.comment_count, 2);
    assert_eq!(detail.comments[0].id, first.id);
    assert_eq!(detail.comments[1].id, second.id);
}

#[tokio::test]
async fn profile_update_is_self_only_and_lands_on_profile() {
    let fx = fixture();
    let ada = fx.add_user("ada");

    let (user, dest) = fx
        .content
        .update_profile(
            Viewer::User(ada.id),
            ProfileFields {
                email: "ada@new.example.com".to_owned(),
                first_name: "Ada".to_owned(),
                last_name: "L".to_owned(),
            },
        )
        .await
        .unwrap();

    assert_eq!(user.email, "ada@new.example.com");
    assert_eq!(dest, Destination::Profile("ada".to_owned()));

    assert!(matches!(
        fx.content
            .update_profile(Viewer::Anonymous, ProfileFields::default())
            .await
            .unwrap_err(),
        DomainError::Unauthenticated
    ));
}
