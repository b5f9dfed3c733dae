use crate::forms::choices::{GENRES, STATES};
use crate::forms::{ArtistForm, ShowForm, VenueForm};
use crate::services::show::ShowChoices;
use crate::views::{Section, escape, layout};

fn text_input(name: &str, label: &str, value: &str, placeholder: &str) -> String {
    format!(
        r#"<div class="field"><label for="{name}">{label}</label><input type="text" id="{name}" name="{name}" value="{value}" placeholder="{placeholder}"></div>"#,
        value = escape(value),
    )
}

fn state_select(selected: &str) -> String {
    let options: String = STATES
        .iter()
        .map(|state| {
            let attr = if *state == selected { " selected" } else { "" };
            format!(r#"<option value="{state}"{attr}>{state}</option>"#)
        })
        .collect();
    format!(
        r#"<div class="field"><label for="state">State</label><select id="state" name="state">{options}</select></div>"#
    )
}

fn genre_select(selected: &[String]) -> String {
    let options: String = GENRES
        .iter()
        .map(|genre| {
            let attr = if selected.iter().any(|g| g == genre) {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{value}"{attr}>{value}</option>"#,
                value = escape(genre)
            )
        })
        .collect();
    format!(
        r#"<div class="field"><label for="genres">Genres</label><small>Ctrl+Click to select multiple</small><select id="genres" name="genres" multiple>{options}</select></div>"#
    )
}

fn yes_no_select(name: &str, label: &str, value: &str) -> String {
    let yes = value.eq_ignore_ascii_case("yes");
    format!(
        r#"<div class="field"><label for="{name}">{label}</label><select id="{name}" name="{name}"><option value="Yes"{yes_attr}>Yes</option><option value="No"{no_attr}>No</option></select></div>"#,
        yes_attr = if yes { " selected" } else { "" },
        no_attr = if yes { "" } else { " selected" },
    )
}

fn form_page(
    title: &str,
    heading: &str,
    action: &str,
    section: Section,
    fields: &str,
    flashes: &[String],
) -> String {
    let body = format!(
        r#"<div class="form-wrapper">
    <form method="post" action="{action}" class="form">
        <h3>{heading}</h3>
        {fields}
        <input type="submit" value="{submit}" class="button">
    </form>
</div>"#,
        heading = escape(heading),
        submit = escape(title),
    );
    layout(title, section, flashes, &body)
}

fn venue_fields(form: &VenueForm) -> String {
    [
        text_input("name", "Name", &form.name, "The Musical Hop"),
        text_input("city", "City", &form.city, "San Francisco"),
        state_select(&form.state),
        text_input("address", "Address", &form.address, "1015 Folsom Street"),
        text_input("phone", "Phone", &form.phone, "xxx-xxx-xxxx"),
        genre_select(&form.genres),
        text_input("image_link", "Image link", &form.image_link, "https://"),
        text_input("facebook_link", "Facebook link", &form.facebook_link, "https://www.facebook.com/"),
        text_input("website_link", "Website link", &form.website_link, "https://"),
        yes_no_select("seeking_talent", "Looking for talent", &form.seeking_talent),
        text_input(
            "seeking_description",
            "Seeking description",
            &form.seeking_description,
            "",
        ),
    ]
    .concat()
}

fn artist_fields(form: &ArtistForm) -> String {
    [
        text_input("name", "Name", &form.name, "Guns N Petals"),
        text_input("city", "City", &form.city, "San Francisco"),
        state_select(&form.state),
        text_input("phone", "Phone", &form.phone, "xxx-xxx-xxxx"),
        genre_select(&form.genres),
        text_input("image_link", "Image link", &form.image_link, "https://"),
        text_input("facebook_link", "Facebook link", &form.facebook_link, "https://www.facebook.com/"),
        text_input("website_link", "Website link", &form.website_link, "https://"),
        yes_no_select("seeking_venue", "Looking for venues", &form.seeking_venue),
        text_input(
            "seeking_description",
            "Seeking description",
            &form.seeking_description,
            "",
        ),
    ]
    .concat()
}

pub fn new_venue(flashes: &[String]) -> String {
    let form = VenueForm {
        seeking_talent: "No".into(),
        ..Default::default()
    };
    form_page(
        "Create Venue",
        "List a new venue",
        "/venues/create",
        Section::Venues,
        &venue_fields(&form),
        flashes,
    )
}

pub fn edit_venue(venue_id: i64, venue_name: &str, form: &VenueForm, flashes: &[String]) -> String {
    form_page(
        "Edit Venue",
        &format!("Edit venue {venue_name}"),
        &format!("/venues/{venue_id}/edit"),
        Section::Venues,
        &venue_fields(form),
        flashes,
    )
}

pub fn new_artist(flashes: &[String]) -> String {
    let form = ArtistForm {
        seeking_venue: "No".into(),
        ..Default::default()
    };
    form_page(
        "Create Artist",
        "List a new artist",
        "/artists/create",
        Section::Artists,
        &artist_fields(&form),
        flashes,
    )
}

pub fn edit_artist(
    artist_id: i64,
    artist_name: &str,
    form: &ArtistForm,
    flashes: &[String],
) -> String {
    form_page(
        "Edit Artist",
        &format!("Edit artist {artist_name}"),
        &format!("/artists/{artist_id}/edit"),
        Section::Artists,
        &artist_fields(form),
        flashes,
    )
}

fn id_select(name: &str, label: &str, options: &[(i64, String)], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|(id, option_label)| {
            let attr = if id.to_string() == selected { " selected" } else { "" };
            format!(
                r#"<option value="{id}"{attr}>{label} (ID {id})</option>"#,
                label = escape(option_label)
            )
        })
        .collect();
    format!(
        r#"<div class="field"><label for="{name}">{label}</label><select id="{name}" name="{name}">{options}</select></div>"#
    )
}

pub fn new_show(choices: &ShowChoices, form: &ShowForm, flashes: &[String]) -> String {
    let fields = [
        id_select("artist_id", "Artist", &choices.artists, &form.artist_id),
        id_select("venue_id", "Venue", &choices.venues, &form.venue_id),
        text_input(
            "start_time",
            "Start time",
            &form.start_time,
            "2030-01-31 20:00:00",
        ),
    ]
    .concat();

    form_page(
        "Create Show",
        "List a new show",
        "/shows/create",
        Section::Shows,
        &fields,
        flashes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_venue_prefills_values() {
        let form = VenueForm {
            name: "The Musical Hop".into(),
            state: "CA".into(),
            genres: vec!["Jazz".into(), "Swing".into()],
            seeking_talent: "Yes".into(),
            ..Default::default()
        };

        let html = edit_venue(1, "The Musical Hop", &form, &[]);

        assert!(html.contains(r#"action="/venues/1/edit""#));
        assert!(html.contains(r#"name="name" value="The Musical Hop""#));
        assert!(html.contains(r#"<option value="CA" selected>"#));
        assert!(html.contains(r#"<option value="Jazz" selected>"#));
        assert!(html.contains(r#"<option value="Yes" selected>"#));
    }

    #[test]
    fn test_new_show_lists_choices() {
        let choices = ShowChoices {
            artists: vec![(4, "Guns N Petals".into())],
            venues: vec![(1, "The Musical Hop".into())],
        };

        let html = new_show(&choices, &ShowForm::default(), &[]);

        assert!(html.contains(r#"<option value="4">Guns N Petals (ID 4)</option>"#));
        assert!(html.contains(r#"<option value="1">The Musical Hop (ID 1)</option>"#));
        assert!(html.contains(r#"name="start_time""#));
    }
}
