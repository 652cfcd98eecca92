//! Visibility and ownership policies.
//!
//! Both are plain predicates. Every read path goes through [`is_visible`]
//! and every mutation path through [`can_mutate`]; no endpoint restates the
//! rules on its own.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Post;

/// The identity (or absence of one) performing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::User(_))
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    /// True when this viewer is the given user.
    pub fn is(&self, user_id: Uuid) -> bool {
        self.user_id() == Some(user_id)
    }
}

/// The anonymous branch of the visibility rule: published, past-dated, and
/// not filed under an unpublished category. A missing category never hides
/// a post; a location never matters.
pub fn is_public(post: &Post, now: DateTime<Utc>) -> bool {
    post.is_published
        && post.pub_date <= now
        && post.category.as_ref().is_none_or(|c| c.is_published)
}

/// May `viewer` read `post`? Authors always see their own content,
/// published or not, past or future; everyone else gets [`is_public`].
pub fn is_visible(viewer: Viewer, post: &Post, now: DateTime<Utc>) -> bool {
    viewer.is(post.author.id) || is_public(post, now)
}

/// May `viewer` change or delete a record owned by `author_id`?
/// Only the authenticated author may. Visibility grants nothing here.
pub fn can_mutate(viewer: Viewer, author_id: Uuid) -> bool {
    viewer.is(author_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthorRef, CategoryRef, Post, PostFields};
    use chrono::TimeDelta;

    fn author() -> AuthorRef {
        AuthorRef {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
        }
    }

    fn post(
        author: AuthorRef,
        published: bool,
        pub_date: DateTime<Utc>,
        category: Option<CategoryRef>,
    ) -> Post {
        Post::new(
            author,
            PostFields {
                title: "t".to_owned(),
                text: "x".to_owned(),
                pub_date,
                is_published: published,
                category_id: category.as_ref().map(|c| c.id),
                location_id: None,
                image: None,
            },
            category,
            None,
        )
    }

    fn category(published: bool) -> CategoryRef {
        CategoryRef {
            id: Uuid::new_v4(),
            slug: "travel".to_owned(),
            title: "Travel".to_owned(),
            is_published: published,
        }
    }

    #[test]
    fn author_always_sees_own_post() {
        let a = author();
        let now = Utc::now();
        let future = now + TimeDelta::days(1);
        for p in [
            post(a.clone(), false, now, None),
            post(a.clone(), true, future, None),
            post(a.clone(), true, now, Some(category(false))),
        ] {
            assert!(is_visible(Viewer::User(a.id), &p, now));
        }
    }

    #[test]
    fn public_requires_published_and_past_dated() {
        let now = Utc::now();
        let yesterday = now - TimeDelta::days(1);
        let tomorrow = now + TimeDelta::days(1);

        assert!(is_public(&post(author(), true, yesterday, None), now));
        assert!(!is_public(&post(author(), false, yesterday, None), now));
        assert!(!is_public(&post(author(), true, tomorrow, None), now));
    }

    #[test]
    fn unpublished_category_hides_post_but_no_category_does_not() {
        let now = Utc::now();
        let yesterday = now - TimeDelta::days(1);

        assert!(is_public(
            &post(author(), true, yesterday, Some(category(true))),
            now
        ));
        assert!(!is_public(
            &post(author(), true, yesterday, Some(category(false))),
            now
        ));
        assert!(is_public(&post(author(), true, yesterday, None), now));
    }

    #[test]
    fn non_author_sees_exactly_the_public_set() {
        let now = Utc::now();
        let stranger = Viewer::User(Uuid::new_v4());
        let hidden = post(author(), false, now - TimeDelta::days(1), None);
        let open = post(author(), true, now - TimeDelta::days(1), None);

        assert!(!is_visible(stranger, &hidden, now));
        assert!(!is_visible(Viewer::Anonymous, &hidden, now));
        assert!(is_visible(stranger, &open, now));
        assert!(is_visible(Viewer::Anonymous, &open, now));
    }

    #[test]
    fn only_the_authenticated_author_may_mutate() {
        let a = author();
        assert!(can_mutate(Viewer::User(a.id), a.id));
        assert!(!can_mutate(Viewer::User(Uuid::new_v4()), a.id));
        assert!(!can_mutate(Viewer::Anonymous, a.id));
    }
}
