//! HTML shell shared by every page.

use rocket::http::RawStr;
use rocket::response::content::RawHtml;

pub fn escape(text: &str) -> String {
    RawStr::new(text).html_escape().into_owned()
}

/// Percent-encodes a query string component.
pub fn encode(text: &str) -> String {
    RawStr::new(text).percent_encode().as_str().to_string()
}

/// Wraps `body` in the site layout. `title` is escaped, `body` is not.
pub fn page(title: &str, body: &str) -> RawHtml<String> {
    RawHtml(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <nav><a href=\"/\">Home</a> <a href=\"/lettings/\">Lettings</a> <a href=\"/profiles/\">Profiles</a></nav>\n\
         <main>\n{body}\n</main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
    ))
}

/// `<ul>` of links, or a placeholder paragraph when `items` is empty.
pub fn link_list<'a>(items: impl IntoIterator<Item = (String, &'a str)>, empty: &str) -> String {
    let items: Vec<String> = items
        .into_iter()
        .map(|(href, label)| format!("<li><a href=\"{href}\">{}</a></li>", escape(label)))
        .collect();
    if items.is_empty() {
        format!("<p>{}</p>", escape(empty))
    } else {
        format!("<ul>\n{}\n</ul>", items.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        let escaped = escape("<b>Tom & Jerry</b>");
        assert!(escaped.starts_with("&lt;b&gt;Tom &amp; Jerry&lt;"));
        assert!(!escaped.contains('<'));
    }

    #[test]
    fn empty_lists_render_a_placeholder() {
        assert_eq!(
            link_list(Vec::new(), "No lettings are available."),
            "<p>No lettings are available.</p>"
        );
        let html = link_list(vec![("/lettings/1/".to_string(), "Loft")], "none");
        assert!(html.contains("<li><a href=\"/lettings/1/\">Loft</a></li>"));
    }
}
