//! Server-rendered HTML pages.
//!
//! Every page goes through [`layout`], which adds the navigation bar, the
//! search box for the current section and any flashed messages. All text
//! coming from the database or the request is passed through [`escape`].

pub mod errors;
pub mod forms;
pub mod pages;

/// Which search box the navigation bar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Venues,
    Artists,
    Shows,
}

impl Section {
    fn search_action(self) -> &'static str {
        match self {
            Section::Artists => "/artists/search",
            _ => "/venues/search",
        }
    }

    fn search_placeholder(self) -> &'static str {
        match self {
            Section::Artists => "Find an artist",
            _ => "Find a venue",
        }
    }
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn layout(title: &str, section: Section, flashes: &[String], body: &str) -> String {
    let flash_html: String = flashes
        .iter()
        .map(|message| format!(r#"<div class="flash">{}</div>"#, escape(message)))
        .collect();

    let nav_link = |href: &str, label: &str, active: bool| {
        let class = if active { " class=\"active\"" } else { "" };
        format!(r#"<li{class}><a href="{href}">{label}</a></li>"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Showbook</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
    <header>
        <a class="brand" href="/">🔥 Showbook</a>
        <ul class="nav">
            {venues}
            {artists}
            {shows}
        </ul>
        <form class="search" method="post" action="{search_action}">
            <input type="search" name="search_term" placeholder="{search_placeholder}" aria-label="Search">
        </form>
    </header>
    <main>
        {flash_html}
        {body}
    </main>
    <footer>
        <a href="/venues/create">Post a venue</a>
        <a href="/artists/create">Post an artist</a>
        <a href="/shows/create">Post a show</a>
    </footer>
</body>
</html>
"#,
        title = escape(title),
        venues = nav_link("/venues", "Venues", section == Section::Venues),
        artists = nav_link("/artists", "Artists", section == Section::Artists),
        shows = nav_link("/shows", "Shows", section == Section::Shows),
        search_action = section.search_action(),
        search_placeholder = section.search_placeholder(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("R&B's")</script>"#),
            "&lt;script&gt;alert(&quot;R&amp;B&#39;s&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_layout_shows_flashes_and_search_box() {
        let html = layout(
            "Artists",
            Section::Artists,
            &["Artist <b>X</b> was successfully listed!".to_string()],
            "<p>body</p>",
        );

        assert!(html.contains("Artist &lt;b&gt;X&lt;/b&gt; was successfully listed!"));
        assert!(html.contains(r#"action="/artists/search""#));
        assert!(html.contains(r#"<li class="active"><a href="/artists">"#));
        assert!(html.contains("<p>body</p>"));
    }
}
