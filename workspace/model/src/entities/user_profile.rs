use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// A person who can sign in. The email address is the login identifier;
/// the username is a unique display handle.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[sea_orm(default_value = "false")]
    pub is_admin: bool,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
    /// Path of the avatar image, relative to the media root.
    pub avatar: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.date_joined.is_not_set() {
            self.date_joined = Set(Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    /// First and last name separated by a space. Missing or blank parts are
    /// skipped, so a profile without names yields an empty string.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Lower-cases the domain part of an email address, leaving the local part
/// untouched. Addresses without an `@` are only trimmed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Looks a profile up by its login identifier.
pub async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<Model>, DbErr>
where
    C: ConnectionTrait,
{
    let email = normalize_email(email);
    tracing::trace!("Looking up profile by email: {}", email);

    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first_name: Option<&str>, last_name: Option<&str>) -> Model {
        Model {
            id: 1,
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            first_name: first_name.map(|s| s.to_string()),
            last_name: last_name.map(|s| s.to_string()),
            is_admin: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
            avatar: None,
        }
    }

    #[test]
    fn test_full_name_joins_both_parts() {
        assert_eq!(profile(Some("Ada"), Some("Lovelace")).full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_skips_missing_parts() {
        assert_eq!(profile(Some("Ada"), None).full_name(), "Ada");
        assert_eq!(profile(None, Some("Lovelace")).full_name(), "Lovelace");
        assert_eq!(profile(Some("  "), Some("Lovelace")).full_name(), "Lovelace");
        assert_eq!(profile(None, None).full_name(), "");
    }

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("Ada.Lovelace@Example.COM"), "Ada.Lovelace@example.com");
        assert_eq!(normalize_email("  ada@EXAMPLE.com "), "ada@example.com");
        assert_eq!(normalize_email("not-an-email"), "not-an-email");
    }
}
