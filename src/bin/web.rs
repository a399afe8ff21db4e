//! Single binary web server: JSON REST API for the court rotation session.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8000 by default (the frontend is a separate app).
//! Override with env: HOST, PORT, COURTS (number of courts), DB_PATH.

use actix_web::{
    get, patch, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::RwLock;
use volley_rotation_web::{
    adjust_score, end_match_manual, register_win, start_match, store, substitute, CourtId, Player,
    PlayerPatch, RotationError, Session, StatusPatch,
};

/// In-memory session state: the queue and the courts. One mutating operation
/// at a time; every handler that changes it holds the write guard throughout.
type AppState = Data<RwLock<Session>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct QueueBody {
    player_id: String,
}

#[derive(Deserialize)]
struct ScoreBody {
    team: String,
    delta: i32,
}

#[derive(Deserialize)]
struct WinBody {
    winner: String,
    score_a: Option<u32>,
    score_b: Option<u32>,
}

#[derive(Deserialize)]
struct SubstituteBody {
    leaving_id: String,
    entering_id: String,
}

#[derive(Deserialize)]
struct CreatePlayerBody {
    name: String,
    whatsapp: Option<String>,
    sex: String,
    avatar: Option<String>,
}

#[derive(Deserialize)]
struct SettingBody {
    key: String,
    value: i64,
}

/// Path segment: court id (e.g. /api/courts/{court_id}/start)
#[derive(Deserialize)]
struct CourtPath {
    court_id: CourtId,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: String,
}

fn rotation_error(e: &RotationError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        RotationError::ArchiveWrite(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn store_error(e: &anyhow::Error) -> HttpResponse {
    log::error!("Store error: {:#}", e);
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": "database error" }))
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "Online",
        "app": "volley-rotation-web",
    }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "volley-rotation-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Current session snapshot: queue order plus every court's match (or null).
#[get("/api/state")]
async fn api_get_state(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(&*g)
}

/// Join the waiting queue. Joining twice is a no-op.
#[post("/api/queue/join")]
async fn api_queue_join(state: AppState, body: Json<QueueBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.queue.enqueue(body.player_id.clone()) {
        log::info!("Player {} joined the queue", body.player_id);
    }
    HttpResponse::Ok().json(&*g)
}

/// Leave the waiting queue. Leaving while not queued is a no-op.
#[post("/api/queue/leave")]
async fn api_queue_leave(state: AppState, body: Json<QueueBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.queue.dequeue(&body.player_id) {
        log::info!("Player {} left the queue", body.player_id);
    }
    HttpResponse::Ok().json(&*g)
}

/// Send a queued player to the back of the queue.
#[post("/api/queue/requeue")]
async fn api_queue_requeue(state: AppState, body: Json<QueueBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.queue.requeue_to_tail(&body.player_id);
    HttpResponse::Ok().json(&*g)
}

/// Shuffle the whole waiting queue.
#[post("/api/queue/shuffle")]
async fn api_queue_shuffle(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.queue.shuffle(&mut rand::thread_rng());
    HttpResponse::Ok().json(&*g)
}

/// Start a match on an empty court with the next players in the queue.
#[post("/api/courts/{court_id}/start")]
async fn api_court_start(state: AppState, db: Data<store::Store>, path: Path<CourtPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match start_match(
        &mut *g,
        db.get_ref(),
        db.get_ref(),
        &mut rand::thread_rng(),
        path.court_id,
    ) {
        Ok(_) => {
            log::info!("Match started on court {}", path.court_id);
            HttpResponse::Ok().json(&*g)
        }
        Err(e) => rotation_error(&e),
    }
}

/// Adjust one team's score (clamped at zero).
#[post("/api/courts/{court_id}/score")]
async fn api_court_score(
    state: AppState,
    path: Path<CourtPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match adjust_score(&mut *g, path.court_id, &body.team, body.delta) {
        Ok(()) => HttpResponse::Ok().json(&*g),
        Err(e) => rotation_error(&e),
    }
}

/// Register the winner and rotate the court.
#[post("/api/courts/{court_id}/win")]
async fn api_court_win(
    state: AppState,
    db: Data<store::Store>,
    path: Path<CourtPath>,
    body: Json<WinBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let final_score = match (body.score_a, body.score_b) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => None,
    };
    match register_win(
        &mut *g,
        db.get_ref(),
        db.get_ref(),
        &mut rand::thread_rng(),
        path.court_id,
        &body.winner,
        final_score,
    ) {
        Ok(outcome) => {
            let message = outcome.message();
            log::info!("Court {}: team {} won - {}", path.court_id, body.winner, message);
            HttpResponse::Ok().json(serde_json::json!({
                "outcome": message,
                "queue": &g.queue,
                "courts": &g.courts,
            }))
        }
        Err(e) => rotation_error(&e),
    }
}

/// End the match without a winner; everyone goes back to the queue.
#[post("/api/courts/{court_id}/cancel")]
async fn api_court_cancel(
    state: AppState,
    db: Data<store::Store>,
    path: Path<CourtPath>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match end_match_manual(&mut *g, db.get_ref(), &mut rand::thread_rng(), path.court_id) {
        Ok(()) => {
            log::info!("Match on court {} cancelled", path.court_id);
            HttpResponse::Ok().json(&*g)
        }
        Err(e) => rotation_error(&e),
    }
}

/// Swap one player on court for one player in the queue.
#[post("/api/courts/{court_id}/substitute")]
async fn api_court_substitute(
    state: AppState,
    path: Path<CourtPath>,
    body: Json<SubstituteBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match substitute(&mut *g, path.court_id, &body.leaving_id, &body.entering_id) {
        Ok(()) => HttpResponse::Ok().json(&*g),
        Err(e) => rotation_error(&e),
    }
}

/// Register a new player.
#[post("/api/players")]
async fn api_create_player(db: Data<store::Store>, body: Json<CreatePlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    let player = Player::new(body.name.trim(), body.whatsapp, body.sex, body.avatar);
    let conn = match db.conn() {
        Ok(conn) => conn,
        Err(e) => return store_error(&e),
    };
    match store::insert_player(&conn, &player) {
        Ok(()) => HttpResponse::Ok().json(player),
        Err(e) => store_error(&e),
    }
}

/// All active players.
#[get("/api/players")]
async fn api_list_players(db: Data<store::Store>) -> HttpResponse {
    let conn = match db.conn() {
        Ok(conn) => conn,
        Err(e) => return store_error(&e),
    };
    match store::list_active(&conn) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => store_error(&e),
    }
}

/// Update a player's profile (only the provided fields).
#[put("/api/players/{id}")]
async fn api_update_player(
    db: Data<store::Store>,
    path: Path<PlayerPath>,
    body: Json<PlayerPatch>,
) -> HttpResponse {
    let conn = match db.conn() {
        Ok(conn) => conn,
        Err(e) => return store_error(&e),
    };
    match store::update_player(&conn, &path.id, &body) {
        Ok(Some(player)) => HttpResponse::Ok().json(player),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No such player" })),
        Err(e) => store_error(&e),
    }
}

/// Toggle a player's activation/presence flags.
#[patch("/api/players/{id}/status")]
async fn api_set_player_status(
    db: Data<store::Store>,
    path: Path<PlayerPath>,
    body: Json<StatusPatch>,
) -> HttpResponse {
    let conn = match db.conn() {
        Ok(conn) => conn,
        Err(e) => return store_error(&e),
    };
    match store::set_status(&conn, &path.id, &body) {
        Ok(Some(player)) => HttpResponse::Ok().json(player),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No such player" })),
        Err(e) => store_error(&e),
    }
}

/// All configuration rows.
#[get("/api/config")]
async fn api_list_config(db: Data<store::Store>) -> HttpResponse {
    let conn = match db.conn() {
        Ok(conn) => conn,
        Err(e) => return store_error(&e),
    };
    match store::list_settings(&conn) {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(e) => store_error(&e),
    }
}

/// Create or overwrite one configuration row.
#[post("/api/config")]
async fn api_upsert_config(db: Data<store::Store>, body: Json<SettingBody>) -> HttpResponse {
    let conn = match db.conn() {
        Ok(conn) => conn,
        Err(e) => return store_error(&e),
    };
    match store::upsert_setting(&conn, &body.key, body.value) {
        Ok(setting) => HttpResponse::Ok().json(setting),
        Err(e) => store_error(&e),
    }
}

/// Archived matches, newest first, with their participation rows.
#[get("/api/matches")]
async fn api_list_matches(db: Data<store::Store>) -> HttpResponse {
    let conn = match db.conn() {
        Ok(conn) => conn,
        Err(e) => return store_error(&e),
    };
    match store::list_matches(&conn) {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => store_error(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_court_count() -> u32 {
    2
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let courts: u32 = std::env::var("COURTS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(default_court_count);
    let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| "rotation.db".to_string());

    let db = store::Store::open(&db_path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("{:#}", e)))?;
    let db = Data::new(db);
    let state = Data::new(RwLock::new(Session::new(courts)));

    let bind = (host.as_str(), port);
    log::info!(
        "Starting server at http://{}:{} with {} courts (db: {})",
        bind.0,
        bind.1,
        courts,
        db_path
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(db.clone())
            .service(index)
            .service(api_health)
            .service(favicon)
            .service(api_get_state)
            .service(api_queue_join)
            .service(api_queue_leave)
            .service(api_queue_requeue)
            .service(api_queue_shuffle)
            .service(api_court_start)
            .service(api_court_score)
            .service(api_court_win)
            .service(api_court_cancel)
            .service(api_court_substitute)
            .service(api_create_player)
            .service(api_list_players)
            .service(api_update_player)
            .service(api_set_player_status)
            .service(api_list_config)
            .service(api_upsert_config)
            .service(api_list_matches)
    })
    .bind(bind)?
    .run()
    .await
}
