use super::{ArchiveService, non_empty};
use crate::document::Document;
use crate::errors::ArchiveError;
use crate::forms::{CommentForm, CommentForms, stamp_now};
use crate::keys::Kind;
use crate::store::EntityQuery;
use crate::telemetry;
use crate::types::User;
use bson::doc;

impl ArchiveService {
    /// Attach a comment by the caller to an article.
    ///
    /// # Errors
    /// `BadRequest` for empty text, `Unauthorized` without a user, `NotFound`
    /// for a bad article reference.
    pub fn create_comment(
        &self,
        user: Option<&User>,
        websafe_article_key: &str,
        form: &CommentForm,
    ) -> Result<CommentForm, ArchiveError> {
        let author = self.get_author_from_user(user)?;
        let Some(text) = non_empty(form.comment.as_deref()) else {
            return Err(ArchiveError::BadRequest("Comment 'comment' field required".into()));
        };
        let article_key = self.store.check_ref(websafe_article_key, Kind::Article)?;
        let key = self.store.allocate_id(Kind::Comment, Some(&article_key));
        let name = author.get_str("displayName").unwrap_or_default();

        let comment = Document::new(
            key,
            doc! {
                "comment": text,
                "authorKey": author.key.urlsafe(),
                "authorName": name,
                "authorID": author.get_str("authorID").unwrap_or_default(),
                "displayName": name,
                "dateCreated": stamp_now(),
            },
        );
        self.store.put(comment.clone())?;
        telemetry::log_audit("comment_create", &comment.key.to_string(), user.map(|u| u.user_id.as_str()));
        Ok(CommentForm::from_entity(&comment))
    }

    /// Comments on one article, oldest first.
    ///
    /// # Errors
    /// `NotFound` for a bad article reference.
    pub fn get_article_comments(&self, websafe_article_key: &str) -> Result<CommentForms, ArchiveError> {
        let article_key = self.store.check_ref(websafe_article_key, Kind::Article)?;
        let q = EntityQuery::kind(Kind::Comment).ancestor(&article_key);
        Ok(CommentForms { items: self.store.run_query(&q).map(|c| CommentForm::from_entity(&c)).collect() })
    }

    /// Comments across all articles, optionally only those by one author key.
    #[must_use]
    pub fn get_comments_by_author(&self, websafe_author_key: Option<&str>) -> CommentForms {
        let mut q = EntityQuery::kind(Kind::Comment);
        if let Some(k) = non_empty(websafe_author_key) {
            q = q.eq("authorKey", k);
        }
        CommentForms { items: self.store.run_query(&q).map(|c| CommentForm::from_entity(&c)).collect() }
    }
}
