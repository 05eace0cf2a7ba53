//! Single binary web server: bracket page from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! GROUPS_CSV points at a `group,team` CSV to replace the built-in draw.
//! SESSION_KEY (64+ bytes) keeps session cookies valid across restarts.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::time::Duration;
use uuid::Uuid;
use world_cup_bracket_web::{
    evaluate, ordinal, record_winner, GroupConfiguration, GroupId, MatchId, SessionState,
    SessionView,
};

/// Per-browser entry: inputs so far, undo snapshots, and activity times (for auto-cleanup).
struct SessionEntry {
    state: SessionState,
    history: VecDeque<SessionState>,
    started_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl SessionEntry {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            state: SessionState::new(),
            history: VecDeque::with_capacity(MAX_UNDO),
            started_at: now,
            last_activity: now,
        }
    }

    fn checkpoint(&mut self, snapshot: SessionState) {
        if self.history.len() == MAX_UNDO {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
    }
}

/// In-memory state: one isolated entry per browser session id.
type AppState = Data<RwLock<HashMap<Uuid, SessionEntry>>>;

/// Inactivity threshold: sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT_HOURS: i64 = 12;

/// Undo depth kept per session.
const MAX_UNDO: usize = 50;

/// Cookie field holding the session id.
const SESSION_ID_KEY: &str = "bracket_session";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct GroupInfo<'a> {
    group: GroupId,
    teams: &'a [String],
}

#[derive(Serialize)]
struct GroupsResponse<'a> {
    groups: Vec<GroupInfo<'a>>,
    /// "1st place" .. "4th place", for the standing selectors.
    position_labels: Vec<String>,
}

#[derive(Serialize)]
struct SessionResponse<'a> {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    can_undo: bool,
    inputs: &'a SessionState,
    view: SessionView,
}

#[derive(Deserialize)]
struct StandingBody {
    choices: Vec<String>,
}

#[derive(Deserialize)]
struct ThirdsBody {
    groups: Vec<GroupId>,
}

#[derive(Deserialize)]
struct SetWinnerBody {
    match_id: MatchId,
    team: String,
}

/// Path segment: group letter (e.g. /api/standings/{group})
#[derive(Deserialize)]
struct GroupPath {
    group: GroupId,
}

/// Path segment: match id (e.g. /api/winners/{match_id})
#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

/// Session id from the cookie, or a fresh one stored into it.
fn session_id(session: &Session) -> Result<Uuid, actix_web::Error> {
    if let Some(id) = session.get::<Uuid>(SESSION_ID_KEY)? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    session.insert(SESSION_ID_KEY, id)?;
    Ok(id)
}

fn session_json(id: Uuid, entry: &SessionEntry, config: &GroupConfiguration) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        session_id: id,
        started_at: entry.started_at,
        can_undo: !entry.history.is_empty(),
        inputs: &entry.state,
        view: evaluate(config, &entry.state),
    })
}

/// Apply `change` to the caller's session and reply with the recomputed view.
/// A change that alters the inputs is checkpointed for undo; a rejected change leaves them
/// untouched.
fn update_session<F>(
    state: &AppState,
    config: &GroupConfiguration,
    session: &Session,
    change: F,
) -> HttpResponse
where
    F: FnOnce(&mut SessionEntry, &GroupConfiguration) -> Result<(), String>,
{
    let id = match session_id(session) {
        Ok(id) => id,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert_with(SessionEntry::new);
    entry.last_activity = Utc::now();

    let before = entry.state.clone();
    if let Err(e) = change(entry, config) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e }));
    }
    if entry.state != before {
        entry.checkpoint(before);
    }
    session_json(id, entry, config)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "world-cup-bracket-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Group configuration and position labels for the standings form.
#[get("/api/groups")]
async fn api_groups(config: Data<GroupConfiguration>) -> HttpResponse {
    let groups = GroupId::ALL
        .iter()
        .map(|&group| GroupInfo {
            group,
            teams: config.teams(group),
        })
        .collect();
    let position_labels = (1..=4).map(|n| format!("{} place", ordinal(n))).collect();
    HttpResponse::Ok().json(GroupsResponse {
        groups,
        position_labels,
    })
}

/// Current inputs and the view recomputed from them (creates the session on first visit).
#[get("/api/session")]
async fn api_get_session(
    state: AppState,
    config: Data<GroupConfiguration>,
    session: Session,
) -> HttpResponse {
    update_session(&state, &config, &session, |_, _| Ok(()))
}

/// Replace one group's 1st..4th choices ("-" for an empty slot).
#[put("/api/standings/{group}")]
async fn api_set_standing(
    state: AppState,
    config: Data<GroupConfiguration>,
    session: Session,
    path: Path<GroupPath>,
    body: Json<StandingBody>,
) -> HttpResponse {
    let body = body.into_inner();
    update_session(&state, &config, &session, |entry, _| {
        entry.state.set_standing(path.group, body.choices);
        Ok(())
    })
}

/// Replace the set of groups whose third-placed team qualifies.
#[put("/api/thirds")]
async fn api_set_thirds(
    state: AppState,
    config: Data<GroupConfiguration>,
    session: Session,
    body: Json<ThirdsBody>,
) -> HttpResponse {
    let body = body.into_inner();
    update_session(&state, &config, &session, |entry, _| {
        entry.state.set_qualified_thirds(body.groups);
        Ok(())
    })
}

/// Record the winner of one match (must be one of its two current teams).
#[put("/api/winners")]
async fn api_set_winner(
    state: AppState,
    config: Data<GroupConfiguration>,
    session: Session,
    body: Json<SetWinnerBody>,
) -> HttpResponse {
    update_session(&state, &config, &session, |entry, config| {
        record_winner(&mut entry.state, config, body.match_id, body.team.trim())
            .map_err(|e| e.to_string())
    })
}

/// Clear the recorded winner of one match.
#[delete("/api/winners/{match_id}")]
async fn api_clear_winner(
    state: AppState,
    config: Data<GroupConfiguration>,
    session: Session,
    path: Path<MatchPath>,
) -> HttpResponse {
    update_session(&state, &config, &session, |entry, _| {
        entry.state.clear_winner(path.match_id);
        Ok(())
    })
}

/// Restore the inputs as they were before the last change.
#[post("/api/undo")]
async fn api_undo(
    state: AppState,
    config: Data<GroupConfiguration>,
    session: Session,
) -> HttpResponse {
    let id = match session_id(&session) {
        Ok(id) => id,
        Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert_with(SessionEntry::new);
    entry.last_activity = Utc::now();
    match entry.history.pop_back() {
        Some(previous) => {
            entry.state = previous;
            session_json(id, entry, &config)
        }
        None => HttpResponse::BadRequest().json(serde_json::json!({ "error": "Nothing to undo" })),
    }
}

/// Start over with empty inputs (undoable).
#[post("/api/reset")]
async fn api_reset(
    state: AppState,
    config: Data<GroupConfiguration>,
    session: Session,
) -> HttpResponse {
    update_session(&state, &config, &session, |entry, _| {
        entry.state = SessionState::new();
        Ok(())
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn load_groups() -> std::io::Result<GroupConfiguration> {
    match std::env::var("GROUPS_CSV") {
        Ok(path) => {
            let config = GroupConfiguration::from_csv_path(&path).map_err(|e| {
                log::error!("Could not load groups from {}: {}", path, e);
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
            })?;
            log::info!("Loaded groups from {}", path);
            Ok(config)
        }
        Err(_) => Ok(GroupConfiguration::world_cup_2026()),
    }
}

fn session_key() -> Key {
    match std::env::var("SESSION_KEY") {
        Ok(secret) => match Key::try_from(secret.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("SESSION_KEY unusable ({}); using a random key", e);
                Key::generate()
            }
        },
        Err(_) => Key::generate(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);

    let config = Data::new(load_groups()?);
    let key = session_key();
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<Uuid, SessionEntry>::new()));

    // Background task: every 30 minutes, remove sessions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let cutoff = Utc::now() - chrono::Duration::hours(INACTIVITY_TIMEOUT_HOURS);
            let before = g.len();
            g.retain(|_, entry| entry.last_activity > cutoff);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(state.clone())
            .app_data(config.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_groups)
            .service(api_get_session)
            .service(api_set_standing)
            .service(api_set_thirds)
            .service(api_set_winner)
            .service(api_clear_winner)
            .service(api_undo)
            .service(api_reset)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
