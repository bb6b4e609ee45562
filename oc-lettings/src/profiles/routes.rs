use rocket::response::content::RawHtml;
use rocket::State;

use super::service;
use crate::error::AppError;
use crate::templates::{encode, escape, link_list, page};
use crate::AppState;

#[get("/profiles")]
pub async fn index(state: &State<AppState>) -> Result<RawHtml<String>, AppError> {
    let profiles = service::list(&state.conn).await?;
    let links = link_list(
        profiles.iter().map(|entry| {
            (
                format!("/profiles/{}/", encode(&entry.user.username)),
                entry.user.username.as_str(),
            )
        }),
        "No profiles are available.",
    );
    Ok(page("Profiles", &format!("<h1>Profiles</h1>\n{links}")))
}

#[get("/profiles/<username>")]
pub async fn detail(
    username: &str,
    state: &State<AppState>,
) -> Result<Option<RawHtml<String>>, AppError> {
    let Some(entry) = service::get(username, &state.conn).await? else {
        return Ok(None);
    };
    let user = &entry.user;
    let body = format!(
        "<h1>{username}</h1>\n\
         <p>First name: {first_name}</p>\n\
         <p>Last name: {last_name}</p>\n\
         <p>Email: {email}</p>\n\
         <p>Favorite city: {favorite_city}</p>\n\
         <a href=\"/profiles/\">Back</a>",
        username = escape(&user.username),
        first_name = escape(&user.first_name),
        last_name = escape(&user.last_name),
        email = escape(&user.email),
        favorite_city = escape(&entry.profile.favorite_city),
    );
    Ok(Some(page(&entry.to_string(), &body)))
}
