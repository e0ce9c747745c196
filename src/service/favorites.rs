use super::ArchiveService;
use crate::errors::ArchiveError;
use crate::favorites::FavoritesManager;
use crate::forms::{ArticleForms, BooleanMessage};
use crate::keys::Key;
use crate::types::User;

impl ArchiveService {
    fn favorites(&self) -> FavoritesManager<'_> {
        FavoritesManager::new(self.store.as_ref())
    }

    /// # Errors
    /// `Unauthorized` without a user, `NotFound` for a bad reference,
    /// `Conflict` if the article is already a favorite.
    pub fn add_article_to_favorites(
        &self,
        user: Option<&User>,
        websafe_article_key: &str,
    ) -> Result<BooleanMessage, ArchiveError> {
        let author = self.get_author_from_user(user)?;
        self.favorites().add_favorite(&author.key, websafe_article_key)?;
        Ok(BooleanMessage { data: true })
    }

    /// # Errors
    /// `Unauthorized` without a user, `NotFound` for a bad reference or an
    /// article that is not a favorite.
    pub fn remove_article_from_favorites(
        &self,
        user: Option<&User>,
        websafe_article_key: &str,
    ) -> Result<BooleanMessage, ArchiveError> {
        let author = self.get_author_from_user(user)?;
        self.favorites().remove_favorite(&author.key, websafe_article_key)?;
        Ok(BooleanMessage { data: true })
    }

    /// The caller's favorite articles in the order they were added.
    ///
    /// # Errors
    /// `Unauthorized` without a user.
    pub fn get_articles_in_favorites(&self, user: Option<&User>) -> Result<ArticleForms, ArchiveError> {
        let author = self.get_author_from_user(user)?;
        let refs = self.favorites().list_favorites(&author.key)?;
        let keys: Vec<Key> = refs
            .iter()
            .filter_map(|r| match Key::from_urlsafe(r) {
                Ok(key) => Some(key),
                Err(e) => {
                    log::warn!("favorite {r:?} of {} is not a key: {e}", author.key);
                    None
                }
            })
            .collect();
        let articles = self.store.get_multi(&keys).into_iter().zip(&keys).filter_map(|(doc, key)| {
            if doc.is_none() {
                log::warn!("favorite {key} of {} no longer exists", author.key);
            }
            doc
        });
        Ok(ArticleForms { items: self.article_forms(articles, None) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArchiveConfig;
    use crate::document::Document;
    use crate::forms::ArticleUpdateForm;
    use crate::keys::Kind;

    #[test]
    fn favorites_round_trip_through_the_service() {
        let svc = ArchiveService::in_memory(ArchiveConfig::default());
        let writer = User::new("w", "writer", "w@x.org");
        let reader = User::new("r", "reader", "r@x.org");
        let mut refs = Vec::new();
        for title in ["A", "B"] {
            let f = ArticleUpdateForm { title: Some(title.into()), description: Some("d".into()), ..Default::default() };
            refs.push(svc.create_article(Some(&writer), &f).unwrap().websafe_article_key);
        }

        assert!(svc.add_article_to_favorites(Some(&reader), &refs[1]).unwrap().data);
        assert!(svc.add_article_to_favorites(Some(&reader), &refs[0]).unwrap().data);
        let err = svc.add_article_to_favorites(Some(&reader), &refs[0]).unwrap_err();
        assert_eq!(err.status_code(), 409);

        let titles: Vec<_> = svc
            .get_articles_in_favorites(Some(&reader))
            .unwrap()
            .items
            .into_iter()
            .filter_map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);

        svc.remove_article_from_favorites(Some(&reader), &refs[1]).unwrap();
        let left = svc.get_articles_in_favorites(Some(&reader)).unwrap();
        assert_eq!(left.items.len(), 1);
        assert_eq!(left.items[0].author_id, svc.get_my_author_profile(Some(&writer)).unwrap().author_id);
    }

    #[test]
    fn vanished_favorites_are_skipped() {
        let svc = ArchiveService::in_memory(ArchiveConfig::default());
        let u = User::new("u", "u", "u@x.org");
        let f = ArticleUpdateForm { title: Some("T".into()), description: Some("d".into()), ..Default::default() };
        let art = svc.create_article(Some(&u), &f).unwrap().websafe_article_key;
        svc.add_article_to_favorites(Some(&u), &art).unwrap();
        svc.store().delete(&Key::from_urlsafe(&art).unwrap());
        assert!(svc.get_articles_in_favorites(Some(&u)).unwrap().items.is_empty());
    }

    #[test]
    fn undecodable_favorites_are_skipped() {
        let svc = ArchiveService::in_memory(ArchiveConfig::default());
        let u = User::new("u", "u", "u@x.org");
        let f = ArticleUpdateForm { title: Some("T".into()), description: Some("d".into()), ..Default::default() };
        let art = svc.create_article(Some(&u), &f).unwrap().websafe_article_key;
        let owner = Key::named(Kind::Author, "u");
        svc.store()
            .transact(&owner, &mut |d: &mut Document| {
                d.set_string_list("favoriteArticles", &["not-a-key".to_string(), art.clone()]);
                Ok(())
            })
            .unwrap();
        let items = svc.get_articles_in_favorites(Some(&u)).unwrap().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].websafe_article_key, art);
    }
}
