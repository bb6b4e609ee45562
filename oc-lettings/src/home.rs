use rocket::response::content::RawHtml;

use crate::error::AppError;
use crate::templates::page;

#[get("/")]
pub fn index() -> RawHtml<String> {
    page(
        "Holiday Homes",
        "<h1>Welcome to Holiday Homes</h1>\n\
         <ul>\n\
         <li><a href=\"/profiles/\">Profiles</a></li>\n\
         <li><a href=\"/lettings/\">Lettings</a></li>\n\
         </ul>",
    )
}

/// Fails on purpose so error reporting can be checked on a deployment.
#[get("/sentry-debug")]
pub fn trigger_error() -> Result<RawHtml<String>, AppError> {
    let divisor = std::hint::black_box(0_i64);
    let quotient = 1_i64
        .checked_div(divisor)
        .ok_or_else(|| AppError::Internal("division by zero".to_string()))?;
    Ok(page("Unreachable", &quotient.to_string()))
}
