//! Capability checks for user profiles.
//!
//! Identity lives in [`user_profile::Model`]; what a profile may do is decided
//! here from its flags alone, so callers never have to interpret `is_admin`
//! or `is_active` themselves.

use crate::entities::user_profile;

/// Something a profile may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Read inventory records.
    ViewInventory,
    /// Create, update and delete inventory records.
    EditInventory,
    /// Maintain languages, tags and types.
    ManageCatalog,
    /// Create, update and delete other profiles.
    ManageProfiles,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::ViewInventory,
        Capability::EditInventory,
        Capability::ManageCatalog,
        Capability::ManageProfiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewInventory => "view_inventory",
            Capability::EditInventory => "edit_inventory",
            Capability::ManageCatalog => "manage_catalog",
            Capability::ManageProfiles => "manage_profiles",
        }
    }
}

/// Whether `profile` holds `capability`.
pub fn has_capability(profile: &user_profile::Model, capability: Capability) -> bool {
    if !profile.is_active {
        return false;
    }

    match capability {
        Capability::ViewInventory | Capability::EditInventory => true,
        Capability::ManageCatalog | Capability::ManageProfiles => profile.is_admin,
    }
}

/// Every capability `profile` holds, in declaration order.
pub fn capabilities(profile: &user_profile::Model) -> Vec<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|capability| has_capability(profile, *capability))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(is_admin: bool, is_active: bool) -> user_profile::Model {
        user_profile::Model {
            id: 1,
            email: "grace@example.com".to_string(),
            username: "grace".to_string(),
            first_name: None,
            last_name: None,
            is_admin,
            is_active,
            date_joined: Utc::now(),
            last_login: None,
            avatar: None,
        }
    }

    #[test]
    fn test_regular_profile_works_with_inventory_only() {
        let regular = profile(false, true);

        assert!(has_capability(&regular, Capability::ViewInventory));
        assert!(has_capability(&regular, Capability::EditInventory));
        assert!(!has_capability(&regular, Capability::ManageCatalog));
        assert!(!has_capability(&regular, Capability::ManageProfiles));
    }

    #[test]
    fn test_admin_holds_everything() {
        assert_eq!(capabilities(&profile(true, true)), Capability::ALL.to_vec());
    }

    #[test]
    fn test_inactive_profile_holds_nothing() {
        assert!(capabilities(&profile(true, false)).is_empty());
        assert!(capabilities(&profile(false, false)).is_empty());
    }
}
