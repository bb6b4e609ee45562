use lettings_store::prelude::*;

use super::models::Profile;
use crate::admin::ModelAdmin;

pub fn profile_admin() -> ModelAdmin {
    ModelAdmin {
        list_display: &["user", "favorite_city"],
        list_filter: &["favorite_city"],
        search_fields: &[
            "user__username",
            "user__first_name",
            "user__last_name",
            "favorite_city",
        ],
        display_via: Some("user"),
        ..ModelAdmin::new("profiles", "profile", Profile::meta)
    }
}
