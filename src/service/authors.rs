use super::{ArchiveService, non_empty, require_user};
use crate::document::Document;
use crate::errors::ArchiveError;
use crate::forms::{AuthorForm, AuthorMiniForm};
use crate::keys::{Key, KeyId, Kind};
use crate::store::EntityQuery;
use crate::telemetry;
use crate::types::User;
use bson::{Bson, doc};

impl ArchiveService {
    /// The caller's Author, created on first use.
    ///
    /// # Errors
    /// `Unauthorized` without a user; store errors on create.
    pub fn get_author_from_user(&self, user: Option<&User>) -> Result<Document, ArchiveError> {
        let user = require_user(user)?;
        let key = Key::named(Kind::Author, user.user_id.clone());
        if let Some(author) = self.store.get(&key) {
            return Ok(author);
        }

        let author_id = match self.store.allocate_id(Kind::Author, None).id {
            KeyId::Int(i) => i.to_string(),
            KeyId::Name(s) => s,
        };
        let author = Document::new(
            key,
            doc! {
                "authorID": author_id,
                "displayName": user.nickname.as_str(),
                "mainEmail": user.email.as_str(),
                "organizations": Bson::Array(Vec::new()),
                "favoriteArticles": Bson::Array(Vec::new()),
            },
        );
        // A concurrent first call may have won; its entity is kept as is.
        let (author, created) = self.store.put_if_absent(author)?;
        if created {
            log::info!("created author {} for user {}", author.key, user.user_id);
            telemetry::log_audit("author_create", &author.key.to_string(), Some(&user.user_id));
        }
        Ok(author)
    }

    /// # Errors
    /// `Unauthorized` without a user.
    pub fn get_my_author_profile(&self, user: Option<&User>) -> Result<AuthorForm, ArchiveError> {
        Ok(AuthorForm::from_entity(&self.get_author_from_user(user)?))
    }

    /// Write the non-empty profile fields, then return the profile.
    ///
    /// # Errors
    /// `Unauthorized` without a user; store errors.
    pub fn save_my_author_profile(
        &self,
        user: Option<&User>,
        form: &AuthorMiniForm,
    ) -> Result<AuthorForm, ArchiveError> {
        let author = self.get_author_from_user(user)?;
        let name = non_empty(form.display_name.as_deref());
        if name.is_none() && form.organizations.is_empty() {
            return Ok(AuthorForm::from_entity(&author));
        }
        let saved = self.store.transact(&author.key, &mut |doc: &mut Document| {
            if let Some(name) = name {
                doc.set("displayName", name);
            }
            if !form.organizations.is_empty() {
                doc.set_string_list("organizations", &form.organizations);
            }
            Ok(())
        })?;
        telemetry::log_audit("author_update", &saved.key.to_string(), user.map(|u| u.user_id.as_str()));
        Ok(AuthorForm::from_entity(&saved))
    }

    /// Author with the given human-readable `authorID`.
    #[must_use]
    pub fn find_author_by_author_id(&self, author_id: &str) -> Option<Document> {
        let q = EntityQuery::kind(Kind::Author).eq("authorID", author_id).limit(1);
        self.store.run_query(&q).next()
    }

    /// Look an author up by `authorID`, falling back to a websafe Author key.
    ///
    /// # Errors
    /// `NotFound` when neither form names an existing author.
    pub fn resolve_author(&self, id_or_key: &str) -> Result<Document, ArchiveError> {
        if let Some(author) = self.find_author_by_author_id(id_or_key) {
            return Ok(author);
        }
        let key = self.store.check_ref(id_or_key, Kind::Author)?;
        self.store
            .get(&key)
            .ok_or_else(|| ArchiveError::NotFound(format!("No Author found with key: {id_or_key}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ArchiveConfig;
    use crate::errors::ArchiveError;
    use crate::forms::AuthorMiniForm;
    use crate::service::ArchiveService;
    use crate::types::User;

    fn dan() -> User {
        User::new("u-dan", "dan", "dan@example.org")
    }

    #[test]
    fn first_use_creates_the_author_once() {
        let svc = ArchiveService::in_memory(ArchiveConfig::default());
        let first = svc.get_my_author_profile(Some(&dan())).unwrap();
        let again = svc.get_my_author_profile(Some(&dan())).unwrap();
        assert_eq!(first.author_id, again.author_id);
        assert_eq!(first.display_name.as_deref(), Some("dan"));
        assert_eq!(first.main_email.as_deref(), Some("dan@example.org"));
    }

    #[test]
    fn anonymous_caller_is_unauthorized() {
        let svc = ArchiveService::in_memory(ArchiveConfig::default());
        let err = svc.get_my_author_profile(None).unwrap_err();
        assert!(matches!(err, ArchiveError::Unauthorized(ref m) if m == "Authorization required"));
    }

    #[test]
    fn save_profile_skips_empty_fields() {
        let svc = ArchiveService::in_memory(ArchiveConfig::default());
        let form = AuthorMiniForm { display_name: Some(String::new()), organizations: vec!["ACA".into()] };
        let out = svc.save_my_author_profile(Some(&dan()), &form).unwrap();
        assert_eq!(out.display_name.as_deref(), Some("dan"));
        assert_eq!(out.organizations, vec!["ACA".to_string()]);
    }

    #[test]
    fn resolve_author_by_id_or_key() {
        let svc = ArchiveService::in_memory(ArchiveConfig::default());
        let me = svc.get_my_author_profile(Some(&dan())).unwrap();
        let by_id = svc.resolve_author(me.author_id.as_deref().unwrap()).unwrap();
        let by_key = svc.resolve_author(&me.websafe_author_key).unwrap();
        assert_eq!(by_id.key, by_key.key);
        assert!(svc.resolve_author("nope").is_err());
    }
}
