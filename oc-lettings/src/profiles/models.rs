use lettings_store::prelude::*;

/// One per account at most; deleted together with the account.
#[derive(Model, FromRow, Clone, Debug, PartialEq)]
#[model(table = "profiles_profile")]
pub struct Profile {
    #[field(primary_key = true, auto = true)]
    pub id: Option<Integer>,

    #[field(unique = true, foreign_key = "auth_user.id", on_delete = "cascade")]
    pub user: Integer,

    #[field(size = 64, blank = true)]
    pub favorite_city: String,
}
