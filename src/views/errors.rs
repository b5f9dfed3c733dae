use crate::views::{Section, layout};

pub fn not_found() -> String {
    layout(
        "Not Found",
        Section::Home,
        &[],
        r#"<section class="error"><h1>404</h1><p>Not Found</p><p><a href="/">Back home</a></p></section>"#,
    )
}

/// `message` is the user-facing description of the failed write, when there is one
pub fn server_error(message: Option<&str>) -> String {
    let flashes: Vec<String> = message.map(str::to_string).into_iter().collect();
    layout(
        "Server Error",
        Section::Home,
        &flashes,
        r#"<section class="error"><h1>500</h1><p>Something went wrong.</p><p><a href="/">Back home</a></p></section>"#,
    )
}
