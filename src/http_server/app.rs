use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    database::Database,
    http_server::{
        http_routes::{artists, home, shows, venues},
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub database: Database,
    pub static_dir: PathBuf,
}

pub fn router(app_state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(home::index))
        .route("/venues", get(venues::list))
        .route("/venues/search", post(venues::search))
        .route(
            "/venues/create",
            get(venues::create_form).post(venues::create),
        )
        .route(
            "/venues/{venue_id}",
            get(venues::detail).delete(venues::delete),
        )
        .route(
            "/venues/{venue_id}/edit",
            get(venues::edit_form).post(venues::update),
        )
        // Plain HTML forms can't send DELETE
        .route("/venues/{venue_id}/delete", post(venues::delete))
        .route("/artists", get(artists::list))
        .route("/artists/search", post(artists::search))
        .route(
            "/artists/create",
            get(artists::create_form).post(artists::create),
        )
        .route(
            "/artists/{artist_id}",
            get(artists::detail).delete(artists::delete),
        )
        .route(
            "/artists/{artist_id}/edit",
            get(artists::edit_form).post(artists::update),
        )
        .route("/artists/{artist_id}/delete", post(artists::delete))
        .route("/shows", get(shows::list))
        .route("/shows/create", get(shows::create_form).post(shows::create))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(home::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState {
        db: Arc::new(config.database),
    });

    log::debug!("Serving static files from: {}", config.static_dir.display());
    let app = router(app_state, &config.static_dir);

    let address = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}", address))?;

    log::info!("Listening on http://{}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    log::info!("Shutting down HTTP server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities;
    use crate::test_utils::{insert_artist, insert_show, insert_venue, test_db};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::{TimeZone, Utc};
    use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
    use tower::ServiceExt;

    async fn test_app() -> (Router, Arc<Database>) {
        let db = test_db().await;
        let state = Arc::new(AppState { db: db.clone() });
        let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");
        (router(state, &static_dir), db)
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    /// The `name=value` part of the flash Set-Cookie header, ready to send back
    fn flash_cookie(response: &axum::response::Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("flash="));
        set_cookie.split(';').next().unwrap().to_string()
    }

    /// Messages carried by a `flash=...` cookie, decoded the way `CookieJar` reads them back
    fn flashed_messages(cookie: &str) -> Vec<String> {
        let jar = axum_extra::extract::cookie::CookieJar::new().add(
            axum_extra::extract::cookie::Cookie::parse_encoded(cookie.to_string()).unwrap(),
        );
        crate::http_server::flash::take(jar).1
    }

    const VALID_VENUE: &str = "name=The+Musical+Hop&city=San+Francisco&state=CA&address=1015+Folsom+Street&phone=123-123-1234&genres=Jazz&genres=Reggae&facebook_link=https%3A%2F%2Fwww.facebook.com%2FTheMusicalHop&seeking_talent=Yes&seeking_description=Looking+for+local+artists";

    #[tokio::test]
    async fn test_home_page() {
        let (app, _) = test_app().await;

        let response = app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Showbook"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (app, _) = test_app().await;

        let response = app.oneshot(get("/no/such/page")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("404"));
    }

    #[tokio::test]
    async fn test_unknown_venue_is_not_found() {
        let (app, _) = test_app().await;

        let response = app.oneshot(get("/venues/999")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_files_are_served() {
        let (app, _) = test_app().await;

        let response = app.oneshot(get("/static/css/main.css")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_venue_flashes_and_redirects_home() {
        let (app, db) = test_app().await;

        let response = app
            .clone()
            .oneshot(form_post("/venues/create", VALID_VENUE))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        let cookie = flash_cookie(&response);

        let venues = entities::venue::Entity::find().all(&db.conn).await.unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].phone, "1231231234");
        assert!(venues[0].seeking_talent);

        // The flash shows once on the next page and is then cleared
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            response
                .headers()
                .get(header::SET_COOKIE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("flash=;")
        );
        assert!(
            body_text(response)
                .await
                .contains("Venue The Musical Hop was successfully listed!")
        );
    }

    #[tokio::test]
    async fn test_invalid_venue_redirects_back_to_form() {
        let (app, db) = test_app().await;
        let body = VALID_VENUE.replace("phone=123-123-1234", "phone=12345");

        let response = app
            .oneshot(form_post("/venues/create", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/venues/create");
        let cookie = flash_cookie(&response);
        assert_eq!(entities::venue::Entity::find().count(&db.conn).await.unwrap(), 0);

        let messages = flashed_messages(&cookie);
        assert_eq!(
            messages,
            vec!["Invalid phone number. Use the format 123-456-7890.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_venue_detail_and_edit() {
        let (app, db) = test_app().await;
        let venue = insert_venue(&db, "Park Square", "San Francisco", "CA").await;

        let response = app
            .clone()
            .oneshot(get(&format!("/venues/{}", venue.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("123-123-1234"));

        let response = app
            .clone()
            .oneshot(get(&format!("/venues/{}/edit", venue.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(r#"value="Park Square""#));

        let body = VALID_VENUE.replace("The+Musical+Hop", "Park+Square+Live");
        let response = app
            .oneshot(form_post(&format!("/venues/{}/edit", venue.id), &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/venues/{}", venue.id));

        let updated = entities::venue::Entity::find_by_id(venue.id)
            .one(&db.conn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Park Square Live");
    }

    #[tokio::test]
    async fn test_delete_venue() {
        let (app, db) = test_app().await;
        let venue = insert_venue(&db, "Park Square", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;
        insert_show(&db, venue.id, artist.id, Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap()).await;

        let delete = || {
            Request::builder()
                .method("DELETE")
                .uri(format!("/venues/{}", venue.id))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(delete()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(entities::venue::Entity::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(entities::show::Entity::find().count(&db.conn).await.unwrap(), 0);

        let response = app.oneshot(delete()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_artist_search() {
        let (app, db) = test_app().await;
        insert_artist(&db, "Guns N Petals").await;
        insert_artist(&db, "Matt Quevedo").await;
        insert_artist(&db, "The Wild Sax Band").await;

        let response = app
            .oneshot(form_post("/artists/search", "search_term=A"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Number of search results for \"A\": 3"));
    }

    #[tokio::test]
    async fn test_create_artist_then_list() {
        let (app, _) = test_app().await;
        let response = app
            .clone()
            .oneshot(form_post("/artists/create", VALID_ARTIST))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app.oneshot(get("/artists")).await.unwrap();
        assert!(body_text(response).await.contains("Guns N Petals"));
    }

    #[tokio::test]
    async fn test_create_show() {
        let (app, db) = test_app().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;
        let artist = insert_artist(&db, "Guns N Petals").await;

        let body = format!(
            "artist_id={}&venue_id={}&start_time=2035-04-01+20%3A00%3A00",
            artist.id, venue.id
        );
        let response = app
            .clone()
            .oneshot(form_post("/shows/create", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app.oneshot(get("/shows")).await.unwrap();
        let body = body_text(response).await;
        assert!(body.contains("Guns N Petals"));
        assert!(body.contains("2035-04-01 20:00:00"));
    }

    #[tokio::test]
    async fn test_create_show_with_unknown_artist() {
        let (app, db) = test_app().await;
        let venue = insert_venue(&db, "The Musical Hop", "San Francisco", "CA").await;

        let body = format!(
            "artist_id=99&venue_id={}&start_time=2035-04-01+20%3A00%3A00",
            venue.id
        );
        let response = app
            .oneshot(form_post("/shows/create", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/shows/create");
        assert_eq!(entities::show::Entity::find().count(&db.conn).await.unwrap(), 0);
    }
    const VALID_ARTIST: &str = "name=Guns+N+Petals&city=San+Francisco&state=CA&phone=326-123-5000&genres=Rock+n+Roll&seeking_venue=No";

    #[tokio::test]
    async fn test_failed_write_rolls_back_and_shows_message() {
        let (app, db) = test_app().await;
        // Genre linking is the second statement of the create transaction
        db.conn
            .execute_unprepared("DROP TABLE venue_genres")
            .await
            .unwrap();

        let response = app
            .oneshot(form_post("/venues/create", VALID_VENUE))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body_text(response)
                .await
                .contains("An error occurred. Venue The Musical Hop could not be listed.")
        );
        assert_eq!(entities::venue::Entity::find().count(&db.conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_artist_redirects_back_to_artist_form() {
        let (app, db) = test_app().await;
        let body = VALID_ARTIST.replace("state=CA", "state=ZZ");

        let response = app
            .oneshot(form_post("/artists/create", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/artists/create");
        assert_eq!(
            flashed_messages(&flash_cookie(&response)),
            vec!["State must be a two-letter US state code.".to_string()]
        );
        assert_eq!(entities::artist::Entity::find().count(&db.conn).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(form_post("/venues/999/edit", VALID_VENUE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(form_post("/artists/999/edit", VALID_ARTIST))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_artist_from_html_form() {
        let (app, db) = test_app().await;
        let artist = insert_artist(&db, "Matt Quevedo").await;

        let response = app
            .oneshot(form_post(&format!("/artists/{}/delete", artist.id), ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert_eq!(
            flashed_messages(&flash_cookie(&response)),
            vec!["Artist Matt Quevedo was successfully deleted.".to_string()]
        );
        assert_eq!(entities::artist::Entity::find().count(&db.conn).await.unwrap(), 0);
    }
}
