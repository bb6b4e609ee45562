use lettings_store::prelude::*;

use super::models::{Address, Letting};
use crate::admin::ModelAdmin;

pub fn address_admin() -> ModelAdmin {
    ModelAdmin {
        verbose_name_plural: Some("addresses"),
        list_display: &[
            "number",
            "street",
            "city",
            "state",
            "zip_code",
            "country_iso_code",
        ],
        list_filter: &["state", "city", "country_iso_code"],
        search_fields: &["street", "city"],
        ..ModelAdmin::new("lettings", "address", Address::meta)
    }
}

pub fn letting_admin() -> ModelAdmin {
    ModelAdmin {
        list_display: &["title", "address"],
        search_fields: &["title", "address__street", "address__city"],
        ..ModelAdmin::new("lettings", "letting", Letting::meta)
    }
}
