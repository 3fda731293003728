/// Ownership-based access checks
///
/// Pure predicates with no I/O: the caller fetches the resource, then asks
/// whether the (possibly anonymous) actor may act on it.
///
/// # Read/write asymmetry
///
/// Reads of an unpublished post by anyone but its author are denied as
/// [`AccessDenied::Hidden`] and surface as 404, so drafts do not leak their
/// existence. Writes by a non-owner are denied as
/// [`AccessDenied::Forbidden`] and surface as 403; write attempts always
/// reveal that the resource exists. This asymmetry is deliberate
/// information hiding; do not "fix" it.
///
/// # Example
///
/// ```
/// use quillpress_shared::auth::authorization::{check_post_access, AccessDenied, PostAction};
/// use quillpress_shared::models::post::Post;
/// # use chrono::Utc;
/// # use uuid::Uuid;
/// # fn draft_by(author_id: Uuid) -> Post {
/// #     Post {
/// #         id: Uuid::new_v4(), title: String::new(), slug: String::new(),
/// #         content: String::new(), author_id, category_id: None,
/// #         is_published: false, created_at: Utc::now(), updated_at: Utc::now(),
/// #     }
/// # }
/// let author = Uuid::new_v4();
/// let post = draft_by(author);
///
/// assert!(check_post_access(Some(author), &post, PostAction::Read).is_ok());
/// assert_eq!(
///     check_post_access(None, &post, PostAction::Read),
///     Err(AccessDenied::Hidden),
/// );
/// ```

use uuid::Uuid;

use crate::models::{comment::Comment, post::Post};

/// What the actor is trying to do to a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    /// Retrieve the post
    Read,

    /// Update or delete the post
    Modify,
}

/// Denied-access outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    /// Resource existence is concealed from this actor (surfaces as 404)
    #[error("Not found.")]
    Hidden,

    /// Actor is known to lack rights (surfaces as 403)
    #[error("You do not have permission to perform this action.")]
    Forbidden,
}

/// Decides whether an actor may read or modify a post
///
/// - Read: published posts are public; drafts are visible to their author
///   only, hidden from everyone else.
/// - Modify: owner only; everyone else is forbidden regardless of the
///   post's published state.
pub fn check_post_access(
    actor: Option<Uuid>,
    post: &Post,
    action: PostAction,
) -> Result<(), AccessDenied> {
    let is_owner = actor == Some(post.author_id);

    match action {
        PostAction::Read => {
            if post.is_published || is_owner {
                Ok(())
            } else {
                Err(AccessDenied::Hidden)
            }
        }
        PostAction::Modify => {
            if is_owner {
                Ok(())
            } else {
                Err(AccessDenied::Forbidden)
            }
        }
    }
}

/// Decides whether an actor may delete a comment
///
/// Only the comment's author may; the post's author gets no special rights
/// over other people's comments.
pub fn check_comment_owner(actor: Uuid, comment: &Comment) -> Result<(), AccessDenied> {
    if actor == comment.user_id {
        Ok(())
    } else {
        Err(AccessDenied::Forbidden)
    }
}
