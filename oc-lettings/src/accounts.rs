//! Site accounts. Profiles hang off these rows.

use lettings_store::prelude::*;

use crate::admin::ModelAdmin;

#[derive(Model, FromRow, Clone, Debug, PartialEq)]
#[model(table = "auth_user", display = "{username}")]
pub struct User {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,

    #[field(unique = true, size = 150)]
    pub username: String,

    #[field(size = 150, blank = true)]
    pub first_name: String,

    #[field(size = 150, blank = true)]
    pub last_name: String,

    #[field(size = 254, blank = true)]
    pub email: String,

    #[field(default = false)]
    pub is_staff: Boolean,

    #[field(default = true)]
    pub is_active: Boolean,

    #[field(default = "now", editable = false)]
    pub date_joined: DateTime,
}

pub fn user_admin() -> ModelAdmin {
    ModelAdmin {
        list_display: &["username", "email", "first_name", "last_name", "is_staff"],
        list_filter: &["is_staff", "is_active"],
        search_fields: &["username", "first_name", "last_name", "email"],
        ..ModelAdmin::new("auth", "user", User::meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accounts_are_active() {
        let user = User {
            username: "alice".into(),
            ..Default::default()
        };
        assert_eq!(user.is_active, True);
        assert_eq!(user.is_staff, False);
        assert!(!user.date_joined.is_empty());
        assert_eq!(user.to_string(), "alice");
        assert!(user.clean_fields().is_ok());
    }
}
