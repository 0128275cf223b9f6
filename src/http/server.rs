use log::info;
use rouille::{Request, Response};
use std::sync::{Arc, Mutex};

use crate::{
    config::HttpConfig,
    game::GameMode,
    http::error::ApiError,
    storage::leaderboard::{Filter, Leaderboard},
};

/// Read-only HTTP view of the leaderboard
pub struct HttpServer {
    leaderboard: Arc<Mutex<Leaderboard>>,
    genres: Vec<String>,
    pub config: HttpConfig,
}

impl HttpServer {
    pub fn new(leaderboard: Leaderboard, genres: Vec<String>, config: HttpConfig) -> Self {
        Self {
            leaderboard: Arc::new(Mutex::new(leaderboard)),
            genres,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = rouille::router!(request,
            (GET) (/leaderboard) => {
                self.handle_leaderboard(request)
            },
            (GET) (/genres) => {
                Response::json(&self.genres)
            },
            _ => Response::empty_404()
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    fn handle_leaderboard(&self, request: &Request) -> Response {
        match self.leaderboard(request) {
            Ok(r) => r,
            Err(e) => e.into_response(),
        }
    }

    fn leaderboard(&self, request: &Request) -> Result<Response, ApiError> {
        let filter = Self::parse_filter(request)?;

        let board = self
            .leaderboard
            .lock()
            .map_err(|e| ApiError::Internal(format!("leaderboard lock poisoned: {e}")))?;
        let rows = board.top(&filter)?;

        Ok(Response::json(&rows))
    }

    fn parse_filter(request: &Request) -> Result<Filter, ApiError> {
        let mode = request
            .get_param("mode")
            .filter(|m| !m.is_empty())
            .map(|m| m.parse::<GameMode>())
            .transpose()
            .map_err(ApiError::BadRequest)?;

        let limit = request
            .get_param("limit")
            .filter(|l| !l.is_empty())
            .map(|l| {
                l.parse::<usize>()
                    .map_err(|_| ApiError::BadRequest(format!("invalid limit '{l}'")))
            })
            .transpose()?;

        let genre = request.get_param("genre").filter(|g| !g.is_empty());

        Ok(Filter { genre, mode, limit })
    }
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::ScoreEntry,
        storage::{leaderboard::LeaderboardRow, schema},
    };

    use rouille::Request;
    use rusqlite::Connection;

    fn entry(player: &str, points: u32, mode: GameMode, genre: &str) -> ScoreEntry {
        ScoreEntry {
            player: player.to_string(),
            points,
            mode,
            genre: genre.to_string(),
            tracks_played: 4,
            correct_titles: 2,
            correct_artists: 2,
            hints_used: 0,
        }
    }

    fn create_server() -> anyhow::Result<HttpServer> {
        let conn = Connection::open_in_memory()?;
        schema::init(&conn)?;
        let mut board = Leaderboard::from_existing_conn(conn);

        board.insert(&entry("alice", 9, GameMode::Solo, "rock"))?;
        board.insert(&entry("bob", 4, GameMode::Duel, "rock"))?;
        board.insert(&entry("carol", 6, GameMode::Duel, "pop"))?;

        Ok(HttpServer::new(
            board,
            vec!["pop".to_string(), "rock".to_string()],
            HttpConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
        ))
    }

    fn get(server: &HttpServer, url: &str) -> Response {
        let request = Request::fake_http("GET", url, vec![], vec![]);
        server.handle_request(&request)
    }

    // --------------------------------------------------
    // ✅ SUCCESS
    // --------------------------------------------------

    #[test]
    fn test_http_leaderboard_all() -> anyhow::Result<()> {
        let server = create_server()?;

        let response = get(&server, "/leaderboard");
        assert_eq!(response.status_code, 200);

        let rows: Vec<LeaderboardRow> = parse_json_response(response)?;
        let names = rows.iter().map(|r| r.entry.player.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["alice", "carol", "bob"]);

        Ok(())
    }

    #[test]
    fn test_http_leaderboard_filtered() -> anyhow::Result<()> {
        let server = create_server()?;

        let response = get(&server, "/leaderboard?genre=rock&mode=duel&limit=5");
        assert_eq!(response.status_code, 200);

        let rows: Vec<LeaderboardRow> = parse_json_response(response)?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.player, "bob");
        assert_eq!(rows[0].rank, 1);

        Ok(())
    }

    #[test]
    fn test_http_leaderboard_limit() -> anyhow::Result<()> {
        let server = create_server()?;

        let rows: Vec<LeaderboardRow> = parse_json_response(get(&server, "/leaderboard?limit=1"))?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.player, "alice");

        Ok(())
    }

    #[test]
    fn test_http_genres() -> anyhow::Result<()> {
        let server = create_server()?;

        let response = get(&server, "/genres");
        assert_eq!(response.status_code, 200);

        let genres: Vec<String> = parse_json_response(response)?;
        assert_eq!(genres, vec!["pop", "rock"]);

        Ok(())
    }

    // --------------------------------------------------
    // ❌ BAD FILTERS
    // --------------------------------------------------

    #[test]
    fn test_http_leaderboard_unknown_mode() -> anyhow::Result<()> {
        let server = create_server()?;
        assert_eq!(get(&server, "/leaderboard?mode=team").status_code, 400);
        Ok(())
    }

    #[test]
    fn test_http_leaderboard_bad_limit() -> anyhow::Result<()> {
        let server = create_server()?;
        assert_eq!(get(&server, "/leaderboard?limit=ten").status_code, 400);
        Ok(())
    }

    #[test]
    fn test_http_unknown_route() -> anyhow::Result<()> {
        let server = create_server()?;
        assert_eq!(get(&server, "/tracks/1").status_code, 404);
        Ok(())
    }
}
