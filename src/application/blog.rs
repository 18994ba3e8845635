//! Read-side service for published blog posts.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{PageRequest, PostListScope, PostsRepo, RepoError};
use crate::domain::content::{ContentBlock, parse_content};
use crate::domain::entities::PostRecord;
use crate::domain::types::{Locale, PostStatus};

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("post not found")]
    PostNotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<PostRecord>,
    pub total: u64,
}

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostsRepo>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    pub async fn list_published(&self, page: PageRequest) -> Result<PostPage, BlogError> {
        let posts = self.posts.list_posts(PostListScope::Public, page).await?;
        let total = self.posts.count_posts(PostListScope::Public).await?;
        Ok(PostPage { posts, total })
    }

    /// A published post by slug. Drafts are invisible on the public surface.
    pub async fn published_by_slug(&self, slug: &str) -> Result<PostRecord, BlogError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or(BlogError::PostNotFound)?;

        if post.status != PostStatus::Published {
            return Err(BlogError::PostNotFound);
        }

        Ok(post)
    }

    /// Parse a post body into render blocks for the requested locale.
    ///
    /// Computed at read time on every request; parsed blocks are never
    /// persisted, so edits take effect immediately.
    pub fn blocks(&self, post: &PostRecord, locale: Locale) -> Vec<ContentBlock> {
        parse_content(post.body(locale))
    }
}
