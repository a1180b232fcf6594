// HTTP handler bindings for Battlesnake API endpoints
//
// Thin wrappers: Rocket deserializes the request, the handler pulls the Bot out
// of managed state and delegates. Snapshots the bot rejects come back as 400.

use log::warn;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use lookahead_snake::bot::Bot;
use lookahead_snake::types::GameState;

/// GET / endpoint
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameState>) -> Status {
    bot.start(
        &start_req.game,
        &start_req.turn,
        &start_req.board,
        &start_req.you,
    );

    Status::Ok
}

/// POST /move endpoint
/// Called each turn to compute and return the next move
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<GameState>,
) -> Result<Json<Value>, Status> {
    bot.get_move(
        &move_req.game,
        &move_req.turn,
        &move_req.board,
        &move_req.you,
    )
    .await
    .map(Json)
    .map_err(|e| {
        warn!("Rejected move request for game {}: {}", move_req.game.id, e);
        Status::BadRequest
    })
}

/// POST /end endpoint
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameState>) -> Status {
    bot.end(&end_req.game, &end_req.turn, &end_req.board, &end_req.you);

    Status::Ok
}
