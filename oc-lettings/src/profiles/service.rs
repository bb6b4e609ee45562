use std::collections::HashMap;
use std::fmt;

use lettings_store::prelude::*;

use super::models::Profile;
use crate::accounts::User;

/// A profile together with the account it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    pub profile: Profile,
    pub user: User,
}

impl fmt::Display for ProfileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user.username)
    }
}

/// Every profile with its account, in profile order.
pub async fn list(conn: &Connection) -> Result<Vec<ProfileEntry>, Error> {
    let profiles = Profile::all(conn).await?;
    let users: Vec<User> = select!(User)
        .inner_join::<Profile>(kwargs!(auth_user.id == profiles_profile.user))
        .fetch_all(conn)
        .await?;
    let mut users: HashMap<Option<Integer>, User> =
        users.into_iter().map(|user| (user.id, user)).collect();

    Ok(profiles
        .into_iter()
        .filter_map(|profile| {
            let user = users.remove(&Some(profile.user))?;
            Some(ProfileEntry { profile, user })
        })
        .collect())
}

/// Looks the account up by exact username. `None` when the account is
/// unknown or has no profile.
pub async fn get(username: &str, conn: &Connection) -> Result<Option<ProfileEntry>, Error> {
    let Some(user) = User::get(kwargs!(username = username), conn).await? else {
        return Ok(None);
    };
    let profile = Profile::get(kwargs!(user = user.id), conn).await?;
    Ok(profile.map(|profile| ProfileEntry { profile, user }))
}
