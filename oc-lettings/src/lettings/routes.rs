
use rocket::response::content::RawHtml;
use rocket::State;

use super::service;
use crate::error::AppError;
use crate::templates::{escape, link_list, page};
use crate::AppState;

#[get("/lettings")]
pub async fn index(state: &State<AppState>) -> Result<RawHtml<String>, AppError> {
    let lettings = service::list(&state.conn).await?;
    let links = link_list(
        lettings.iter().filter_map(|letting| {
            let id = letting.id?;
            Some((format!("/lettings/{id}/"), letting.title.as_str()))
        }),
        "No lettings are available.",
    );
    Ok(page("Lettings", &format!("<h1>Lettings</h1>\n{links}")))
}

/// A non numeric id is answered like an unknown one.
#[get("/lettings/<letting_id>")]
pub async fn detail(
    letting_id: Result<i64, &str>,
    state: &State<AppState>,
) -> Result<Option<RawHtml<String>>, AppError> {
    let Ok(letting_id) = letting_id else {
        return Ok(None);
    };
    let Some((letting, address)) = service::get(letting_id, &state.conn).await? else {
        return Ok(None);
    };
    let body = format!(
        "<h1>{title}</h1>\n\
         <p>{address}</p>\n\
         <p>{city}, {state} {zip_code}</p>\n\
         <p>{country}</p>\n\
         <a href=\"/lettings/\">Back</a>",
        title = escape(&letting.title),
        address = escape(&address.to_string()),
        city = escape(&address.city),
        state = escape(&address.state),
        zip_code = address.zip_code,
        country = escape(&address.country_iso_code),
    );
    Ok(Some(page(&letting.title, &body)))
}
