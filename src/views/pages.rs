use crate::formatting::{DateStyle, format_datetime};
use crate::services::SearchResults;
use crate::services::artist::{ArtistDetail, ArtistShow, ArtistSummary};
use crate::services::show::ShowListing;
use crate::services::venue::{Area, VenueDetail, VenueShow};
use crate::views::{Section, escape, layout};

const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";

fn image(link: Option<&str>, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}">"#,
        escape(link.unwrap_or(PLACEHOLDER_IMAGE)),
        escape(alt)
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn optional_link(label: &str, link: Option<&str>) -> String {
    match link {
        Some(link) => format!(
            r#"<p><a href="{href}" target="_blank" rel="noopener">{label}</a></p>"#,
            href = escape(link),
            label = escape(label)
        ),
        None => String::new(),
    }
}

fn genre_tags(genres: &[String]) -> String {
    genres
        .iter()
        .map(|g| format!(r#"<span class="genre">{}</span>"#, escape(g)))
        .collect()
}

fn seeking(flag: bool, what: &str, description: Option<&str>) -> String {
    if flag {
        format!(
            r#"<div class="seeking"><strong>Currently seeking {what}</strong><p>{}</p></div>"#,
            escape(description.unwrap_or(""))
        )
    } else {
        format!(r#"<p class="not-seeking">Not currently seeking {what}</p>"#)
    }
}

pub fn home(flashes: &[String]) -> String {
    let body = r#"<section class="hero">
    <h1>Showbook</h1>
    <p>Find venues, discover artists and book shows.</p>
    <p>
        <a class="button" href="/venues">Browse venues</a>
        <a class="button" href="/artists">Browse artists</a>
        <a class="button" href="/shows">Upcoming shows</a>
    </p>
</section>"#;

    layout("Home", Section::Home, flashes, body)
}

pub fn venues(areas: &[Area], flashes: &[String]) -> String {
    let mut body = String::from("<h1>Venues</h1>");
    if areas.is_empty() {
        body.push_str(r#"<p class="empty">No venues yet. <a href="/venues/create">List one</a>.</p>"#);
    }

    for area in areas {
        body.push_str(&format!(
            "<h3>{}, {}</h3><ul class=\"items\">",
            escape(&area.city),
            escape(&area.state)
        ));
        for venue in &area.venues {
            body.push_str(&format!(
                r#"<li><a href="/venues/{id}"><div class="item"><h5>{name}</h5><small>{shows}</small></div></a></li>"#,
                id = venue.id,
                name = escape(&venue.name),
                shows = plural(venue.num_upcoming_shows, "upcoming show"),
            ));
        }
        body.push_str("</ul>");
    }

    layout("Venues", Section::Venues, flashes, &body)
}

pub fn artists(artists: &[ArtistSummary], flashes: &[String]) -> String {
    let mut body = String::from("<h1>Artists</h1><ul class=\"items\">");
    for artist in artists {
        body.push_str(&format!(
            r#"<li><a href="/artists/{}"><div class="item"><h5>{}</h5></div></a></li>"#,
            artist.id,
            escape(&artist.name)
        ));
    }
    body.push_str("</ul>");
    if artists.is_empty() {
        body.push_str(r#"<p class="empty">No artists yet. <a href="/artists/create">List one</a>.</p>"#);
    }

    layout("Artists", Section::Artists, flashes, &body)
}

/// Search results for either venues or artists; `base` is `/venues` or `/artists`
pub fn search_results(
    section: Section,
    base: &str,
    search_term: &str,
    results: &SearchResults,
    flashes: &[String],
) -> String {
    let mut body = format!(
        "<h3>Number of search results for \"{}\": {}</h3><ul class=\"items\">",
        escape(search_term),
        results.count
    );
    for hit in &results.data {
        body.push_str(&format!(
            r#"<li><a href="{base}/{id}"><div class="item"><h5>{name}</h5><small>{shows}</small></div></a></li>"#,
            id = hit.id,
            name = escape(&hit.name),
            shows = plural(hit.num_upcoming_shows, "upcoming show"),
        ));
    }
    body.push_str("</ul>");

    layout("Search", section, flashes, &body)
}

fn venue_show_cards(shows: &[VenueShow]) -> String {
    shows
        .iter()
        .map(|show| {
            format!(
                r#"<div class="show-card">{img}<h5><a href="/artists/{id}">{name}</a></h5><h6>{time}</h6></div>"#,
                img = image(show.artist_image_link.as_deref(), &show.artist_name),
                id = show.artist_id,
                name = escape(&show.artist_name),
                time = escape(&show.start_time),
            )
        })
        .collect()
}

fn artist_show_cards(shows: &[ArtistShow]) -> String {
    shows
        .iter()
        .map(|show| {
            format!(
                r#"<div class="show-card">{img}<h5><a href="/venues/{id}">{name}</a></h5><h6>{time}</h6></div>"#,
                img = image(show.venue_image_link.as_deref(), &show.venue_name),
                id = show.venue_id,
                name = escape(&show.venue_name),
                time = escape(&show.start_time),
            )
        })
        .collect()
}

fn show_sections(upcoming_count: usize, upcoming: String, past_count: usize, past: String) -> String {
    format!(
        r#"<section class="shows">
    <h2>{upcoming_title}</h2>
    <div class="show-cards">{upcoming}</div>
</section>
<section class="shows">
    <h2>{past_title}</h2>
    <div class="show-cards">{past}</div>
</section>"#,
        upcoming_title = plural(upcoming_count, "Upcoming Show"),
        past_title = plural(past_count, "Past Show"),
    )
}

pub fn venue_detail(venue: &VenueDetail, flashes: &[String]) -> String {
    let body = format!(
        r#"<div class="detail">
    <div class="detail-info">
        <h1>{name}</h1>
        <p class="subtitle">ID: {id}</p>
        <div class="genres">{genres}</div>
        <p>{address}</p>
        <p>{city}, {state}</p>
        <p>{phone}</p>
        {website}
        {facebook}
        {seeking}
    </div>
    <div class="detail-image">{image}</div>
</div>
{shows}
<div class="actions">
    <a class="button" href="/venues/{id}/edit">Edit</a>
    <form method="post" action="/venues/{id}/delete" class="inline">
        <button type="submit" class="danger">Delete</button>
    </form>
</div>"#,
        id = venue.id,
        name = escape(&venue.name),
        genres = genre_tags(&venue.genres),
        address = escape(&venue.address),
        city = escape(&venue.city),
        state = escape(&venue.state),
        phone = escape(&venue.phone),
        website = optional_link("Website", venue.website_link.as_deref()),
        facebook = optional_link("Facebook", venue.facebook_link.as_deref()),
        seeking = seeking(
            venue.seeking_talent,
            "talent",
            venue.seeking_description.as_deref()
        ),
        image = image(venue.image_link.as_deref(), &venue.name),
        shows = show_sections(
            venue.upcoming_shows_count,
            venue_show_cards(&venue.upcoming_shows),
            venue.past_shows_count,
            venue_show_cards(&venue.past_shows),
        ),
    );

    layout(&venue.name, Section::Venues, flashes, &body)
}

pub fn artist_detail(artist: &ArtistDetail, flashes: &[String]) -> String {
    let body = format!(
        r#"<div class="detail">
    <div class="detail-info">
        <h1>{name}</h1>
        <p class="subtitle">ID: {id}</p>
        <div class="genres">{genres}</div>
        <p>{city}, {state}</p>
        <p>{phone}</p>
        {website}
        {facebook}
        {seeking}
    </div>
    <div class="detail-image">{image}</div>
</div>
{shows}
<div class="actions">
    <a class="button" href="/artists/{id}/edit">Edit</a>
    <form method="post" action="/artists/{id}/delete" class="inline">
        <button type="submit" class="danger">Delete</button>
    </form>
</div>"#,
        id = artist.id,
        name = escape(&artist.name),
        genres = genre_tags(&artist.genres),
        city = escape(&artist.city),
        state = escape(&artist.state),
        phone = escape(&artist.phone),
        website = optional_link("Website", artist.website_link.as_deref()),
        facebook = optional_link("Facebook", artist.facebook_link.as_deref()),
        seeking = seeking(
            artist.seeking_venue,
            "performance venues",
            artist.seeking_description.as_deref()
        ),
        image = image(artist.image_link.as_deref(), &artist.name),
        shows = show_sections(
            artist.upcoming_shows_count,
            artist_show_cards(&artist.upcoming_shows),
            artist.past_shows_count,
            artist_show_cards(&artist.past_shows),
        ),
    );

    layout(&artist.name, Section::Artists, flashes, &body)
}

pub fn shows(shows: &[ShowListing], flashes: &[String]) -> String {
    let mut body = String::from("<h1>Shows</h1><div class=\"show-cards\">");
    for show in shows {
        body.push_str(&format!(
            r#"<div class="show-card">{img}<h4><time datetime="{time}">{full_time}</time></h4><h5><a href="/artists/{artist_id}">{artist}</a></h5><p>playing at</p><h5><a href="/venues/{venue_id}">{venue}</a></h5></div>"#,
            img = image(show.artist_image_link.as_deref(), &show.artist_name),
            time = escape(&show.start_time),
            full_time = format_datetime(&show.starts_at, DateStyle::Full),
            artist_id = show.artist_id,
            artist = escape(&show.artist_name),
            venue_id = show.venue_id,
            venue = escape(&show.venue_name),
        ));
    }
    body.push_str("</div>");

    layout("Shows", Section::Shows, flashes, &body)
}
