//! Request and response views.
//!
//! Each outbound form is filled from stored entities by an explicit mapping:
//! copied attributes, computed identifiers and date rendering are all spelled
//! out in the `from_entity` functions below.

use crate::document::Document;
use crate::keys::{Key, KeyId};
use crate::types::SerializableDateTime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

fn opt_str(doc: &Document, field: &str) -> Option<String> {
    doc.get_str(field).map(str::to_string)
}

fn id_text(key: &Key) -> String {
    match &key.id {
        KeyId::Int(i) => i.to_string(),
        KeyId::Name(s) => s.clone(),
    }
}

/// Render a stored timestamp attribute with `format`; unreadable values are dropped.
fn render_date(doc: &Document, field: &str, format: &str) -> Option<String> {
    let raw = doc.get_str(field)?;
    let dt: DateTime<Utc> = DateTime::parse_from_rfc3339(raw).ok()?.with_timezone(&Utc);
    Some(dt.format(format).to_string())
}

pub(crate) fn stamp_now() -> String {
    SerializableDateTime::now().to_sortable()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorForm {
    #[serde(rename = "authorID")]
    pub author_id: Option<String>,
    pub display_name: Option<String>,
    pub main_email: Option<String>,
    pub websafe_author_key: String,
    pub organizations: Vec<String>,
    pub favorite_articles: Vec<String>,
}

impl AuthorForm {
    #[must_use]
    pub fn from_entity(author: &Document) -> Self {
        Self {
            author_id: opt_str(author, "authorID"),
            display_name: opt_str(author, "displayName"),
            main_email: opt_str(author, "mainEmail"),
            websafe_author_key: author.key.urlsafe(),
            organizations: author.get_string_list("organizations"),
            favorite_articles: author.get_string_list("favoriteArticles"),
        }
    }
}

/// Profile fields an author may change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorMiniForm {
    pub display_name: Option<String>,
    pub organizations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleForm {
    pub title: Option<String>,
    pub embed: Option<String>,
    pub description: Option<String>,
    pub author_name: Option<String>,
    #[serde(rename = "authorID")]
    pub author_id: Option<String>,
    #[serde(rename = "articleID")]
    pub article_id: String,
    pub tags: Vec<String>,
    pub date_created: Option<String>,
    pub websafe_author_key: Option<String>,
    pub websafe_article_key: String,
    pub comments: Option<String>,
}

impl ArticleForm {
    /// `author` is the article's parent Author, already loaded by the caller.
    #[must_use]
    pub fn from_entity(article: &Document, author: Option<&Document>) -> Self {
        Self {
            title: opt_str(article, "title"),
            embed: opt_str(article, "embed"),
            description: opt_str(article, "description"),
            author_name: opt_str(article, "authorName"),
            author_id: author.and_then(|a| opt_str(a, "authorID")),
            article_id: id_text(&article.key),
            tags: article.get_string_list("tags"),
            date_created: render_date(article, "dateCreated", DATE_TIME_FORMAT),
            websafe_author_key: article.key.parent().map(Key::urlsafe),
            websafe_article_key: article.key.urlsafe(),
            comments: None,
        }
    }
}

/// Inbound article fields; empty ones are left untouched on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleUpdateForm {
    pub title: Option<String>,
    pub embed: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleForms {
    pub items: Vec<ArticleForm>,
}

/// Used both inbound (only `comment` is read) and outbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentForm {
    pub comment: Option<String>,
    pub author_name: Option<String>,
    #[serde(rename = "authorID")]
    pub author_id: Option<String>,
    #[serde(rename = "articleID")]
    pub article_id: Option<String>,
    #[serde(rename = "commentID")]
    pub comment_id: Option<String>,
    pub date_created: Option<String>,
    pub websafe_author_key: Option<String>,
    pub websafe_article_key: Option<String>,
    pub websafe_comment_key: Option<String>,
}

impl CommentForm {
    #[must_use]
    pub fn from_entity(comment: &Document) -> Self {
        let article = comment.key.parent();
        Self {
            comment: opt_str(comment, "comment"),
            author_name: opt_str(comment, "authorName"),
            author_id: opt_str(comment, "authorID"),
            article_id: article.map(id_text),
            comment_id: Some(id_text(&comment.key)),
            date_created: render_date(comment, "dateCreated", DATE_FORMAT),
            websafe_author_key: opt_str(comment, "authorKey"),
            websafe_article_key: article.map(Key::urlsafe),
            websafe_comment_key: Some(comment.key.urlsafe()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForms {
    pub items: Vec<CommentForm>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanMessage {
    pub data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Kind;
    use bson::doc;

    fn author() -> Document {
        Document::new(
            Key::named(Kind::Author, "user-1"),
            doc! {"authorID": "17", "displayName": "Dan", "mainEmail": "d@x.org", "organizations": ["ACA"]},
        )
    }

    #[test]
    fn article_form_computes_ids_and_keys() {
        let a = author();
        let key = Key::int(Kind::Article, 42).with_parent(&a.key);
        let art = Document::new(
            key.clone(),
            doc! {
                "title": "Stolen",
                "authorName": "Dan",
                "tags": ["theft"],
                "dateCreated": "2015-06-01T12:30:05.000250Z",
            },
        );
        let f = ArticleForm::from_entity(&art, Some(&a));
        assert_eq!(f.article_id, "42");
        assert_eq!(f.author_id.as_deref(), Some("17"));
        assert_eq!(f.websafe_article_key, key.urlsafe());
        assert_eq!(f.websafe_author_key, Some(a.key.urlsafe()));
        assert_eq!(f.date_created.as_deref(), Some("2015-06-01 12:30:05.000250"));
        assert_eq!(f.description, None);
    }

    #[test]
    fn comment_dates_render_as_day() {
        let article = Key::int(Kind::Article, 5).with_parent(&Key::named(Kind::Author, "u"));
        let c = Document::new(
            Key::int(Kind::Comment, 9).with_parent(&article),
            doc! {"comment": "nice", "dateCreated": "2016-02-03T04:05:06.000000Z"},
        );
        let f = CommentForm::from_entity(&c);
        assert_eq!(f.date_created.as_deref(), Some("2016-02-03"));
        assert_eq!(f.article_id.as_deref(), Some("5"));
        assert_eq!(f.comment_id.as_deref(), Some("9"));
        assert_eq!(f.websafe_article_key, Some(article.urlsafe()));
    }

    #[test]
    fn author_form_serializes_with_wire_names() {
        let f = AuthorForm::from_entity(&author());
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["authorID"], "17");
        assert_eq!(v["displayName"], "Dan");
        assert_eq!(v["organizations"][0], "ACA");
        assert!(v["favoriteArticles"].as_array().unwrap().is_empty());
    }

    #[test]
    fn update_form_accepts_partial_json() {
        let f: ArticleUpdateForm = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(f.title.as_deref(), Some("New"));
        assert!(f.tags.is_empty());
    }
}
