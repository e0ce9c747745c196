use super::{ArchiveService, non_empty, require_user};
use crate::document::Document;
use crate::errors::ArchiveError;
use crate::forms::{ArticleForm, ArticleForms, ArticleUpdateForm, stamp_now};
use crate::keys::{Key, Kind};
use crate::query::{FilterTriple, SortSpec, compile_with_default_sort, parse_query_json};
use crate::store::EntityQuery;
use crate::telemetry;
use crate::types::User;
use bson::doc;

pub(crate) const ONLY_OWNER_UPDATES: &str = "Only the owner can update the Article.";

impl ArchiveService {
    /// New article under the caller's Author.
    ///
    /// # Errors
    /// `BadRequest` when `title` or `description` is empty, `Unauthorized`
    /// without a user.
    pub fn create_article(&self, user: Option<&User>, form: &ArticleUpdateForm) -> Result<ArticleForm, ArchiveError> {
        for (name, value) in [("title", &form.title), ("description", &form.description)] {
            if non_empty(value.as_deref()).is_none() {
                return Err(ArchiveError::BadRequest(format!("Article '{name}' field required")));
            }
        }
        let author = self.get_author_from_user(user)?;
        let key = self.store.allocate_id(Kind::Article, Some(&author.key));

        let mut article = Document::new(
            key,
            doc! {
                "authorName": author.get_str("displayName").unwrap_or_default(),
                "dateCreated": stamp_now(),
            },
        );
        apply_update(&mut article, form);
        if form.tags.is_empty() {
            article.set_string_list("tags", &[]);
        }
        self.store.put(article.clone())?;
        telemetry::log_audit("article_create", &article.key.to_string(), user.map(|u| u.user_id.as_str()));
        Ok(ArticleForm::from_entity(&article, Some(&author)))
    }

    /// Overwrite the non-empty fields of an article the caller owns.
    ///
    /// # Errors
    /// `NotFound` for a bad reference, `Forbidden` when the caller is not the
    /// owner.
    pub fn update_article(
        &self,
        user: Option<&User>,
        websafe_article_key: &str,
        form: &ArticleUpdateForm,
    ) -> Result<ArticleForm, ArchiveError> {
        let author = self.get_author_from_user(user)?;
        let key = self.store.check_ref(websafe_article_key, Kind::Article)?;
        if key.parent() != Some(&author.key) {
            return Err(ArchiveError::Forbidden(ONLY_OWNER_UPDATES.into()));
        }
        let saved = self.store.transact(&key, &mut |article: &mut Document| {
            apply_update(article, form);
            Ok(())
        })?;
        telemetry::log_audit("article_update", &saved.key.to_string(), user.map(|u| u.user_id.as_str()));
        Ok(ArticleForm::from_entity(&saved, Some(&author)))
    }

    /// # Errors
    /// `NotFound` when the reference is not an existing article.
    pub fn get_article_by_key(&self, websafe_article_key: &str) -> Result<ArticleForm, ArchiveError> {
        let key = self.store.check_ref(websafe_article_key, Kind::Article)?;
        let article = self
            .store
            .get(&key)
            .ok_or_else(|| ArchiveError::NotFound(format!("No Article found with key: {websafe_article_key}")))?;
        let author = key.parent().and_then(|p| self.store.get(p));
        Ok(ArticleForm::from_entity(&article, author.as_ref()))
    }

    /// Article by the short `authorID`/`articleID` pair used in published links.
    ///
    /// # Errors
    /// `Unauthorized` when either id does not resolve.
    pub fn get_article(&self, author_id: &str, article_id: &str) -> Result<ArticleForm, ArchiveError> {
        let author = self
            .find_author_by_author_id(author_id)
            .ok_or_else(|| ArchiveError::Unauthorized(format!("Invalid Author ID ({author_id})")))?;
        let invalid_article = || {
            ArchiveError::Unauthorized(format!(
                "Invalid Article ID ({article_id}) for {}",
                author.get_str("displayName").unwrap_or_default()
            ))
        };
        let id = article_id.trim().parse::<i64>().map_err(|_| invalid_article())?;
        let article = self
            .store
            .get(&Key::int(Kind::Article, id).with_parent(&author.key))
            .ok_or_else(invalid_article)?;
        Ok(ArticleForm::from_entity(&article, Some(&author)))
    }

    /// Articles written by the caller.
    ///
    /// # Errors
    /// `Unauthorized` without a user or when the user has never authored.
    pub fn get_my_articles(&self, user: Option<&User>) -> Result<ArticleForms, ArchiveError> {
        let user = require_user(user)?;
        let author = self.store.get(&Key::named(Kind::Author, user.user_id.clone())).ok_or_else(|| {
            ArchiveError::Unauthorized(format!("{} is not an author of any articles or comments", user.nickname))
        })?;
        let articles = self.store.run_query(&EntityQuery::kind(Kind::Article).ancestor(&author.key));
        Ok(ArticleForms { items: self.article_forms(articles, Some(&author)) })
    }

    /// Every article, newest first.
    #[must_use]
    pub fn get_all_articles(&self) -> ArticleForms {
        let q = EntityQuery::kind(Kind::Article).order(SortSpec::desc("dateCreated"));
        ArticleForms { items: self.article_forms(self.store.run_query(&q), None) }
    }

    /// # Errors
    /// `NotFound` when `id_or_key` names no author.
    pub fn get_articles_by_author(&self, id_or_key: &str) -> Result<ArticleForms, ArchiveError> {
        let author = self.resolve_author(id_or_key)?;
        let articles = self.store.run_query(&EntityQuery::kind(Kind::Article).ancestor(&author.key));
        Ok(ArticleForms { items: self.article_forms(articles, Some(&author)) })
    }

    /// Run client filters against the article set.
    ///
    /// # Errors
    /// `InvalidFilter` when the filters do not compile.
    pub fn query_articles(&self, filters: &[FilterTriple]) -> Result<ArticleForms, ArchiveError> {
        let compiled = compile_with_default_sort(filters, &self.config.default_sort_field)?;
        let q = EntityQuery::compiled(Kind::Article, compiled);
        Ok(ArticleForms { items: self.article_forms(self.store.run_query(&q), None) })
    }

    /// [`Self::query_articles`] over a JSON `{"filters": [...]}` body.
    ///
    /// # Errors
    /// `Json` for a malformed body, otherwise as `query_articles`.
    pub fn query_articles_json(&self, body: &str) -> Result<ArticleForms, ArchiveError> {
        self.query_articles(&parse_query_json(body)?.filters)
    }
}

fn apply_update(article: &mut Document, form: &ArticleUpdateForm) {
    for (field, value) in [("title", &form.title), ("embed", &form.embed), ("description", &form.description)] {
        if let Some(v) = non_empty(value.as_deref()) {
            article.set(field, v);
        }
    }
    if !form.tags.is_empty() {
        article.set_string_list("tags", &form.tags);
    }
}
