use askama::Template;
use strava_core::flow::View;
use url::Url;

const TITLE: &str = "Strava Analysis Tool";

/// The single page: title, login link, then whatever the pass produced.
#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    auth_url: &'a Url,
    view: &'a View,
}

pub fn render(auth_url: &Url, view: &View) -> askama::Result<String> {
    PageTemplate {
        title: TITLE,
        auth_url,
        view,
    }
    .render()
}
