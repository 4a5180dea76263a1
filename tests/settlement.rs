//! Settlement against an in-process game server.

#![expect(clippy::unwrap_used, reason = "tests")]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use clubjack::client::Error;
use clubjack::{
    BetError, Card, ClientConfig, ClubhouseClient, GameOptions, NoticeLevel, Outcome, Session,
    Suit, Table,
};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

#[derive(Clone)]
struct MockServer {
    cash: Arc<Mutex<i64>>,
    settlements: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    fail: bool,
    delay: Duration,
}

impl MockServer {
    fn new(cash: i64) -> Self {
        Self {
            cash: Arc::new(Mutex::new(cash)),
            settlements: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            delay: Duration::ZERO,
        }
    }

    fn failing(cash: i64) -> Self {
        Self {
            fail: true,
            ..Self::new(cash)
        }
    }

    fn slow(cash: i64, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(cash)
        }
    }
}

async fn game_status(State(server): State<MockServer>) -> Json<Value> {
    let cash = *server.cash.lock().unwrap();
    Json(json!({
        "playerName": "Test Pilot",
        "cash": format!("{cash}.00"),
        "day": 12,
        "homeBase": "EFHK",
        "status": "ACTIVE",
    }))
}

async fn clubhouse(
    State(server): State<MockServer>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    tokio::time::sleep(server.delay).await;
    if server.fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "virhe": "Tallennus epäonnistui" })),
        );
    }

    let bet = body["bet"].as_i64().unwrap_or(0);
    let net = match body["result"].as_str() {
        Some("blackjack") => bet * 3 / 2,
        Some("win") => bet,
        Some("push") => 0,
        _ => -bet,
    };
    let key = headers
        .get("idempotency-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    server.settlements.lock().unwrap().push((key, body));

    let mut cash = server.cash.lock().unwrap();
    *cash += net;
    (StatusCode::OK, Json(json!({ "cash": *cash })))
}

async fn spawn_server(server: MockServer) -> (String, JoinHandle<()>) {
    let router = Router::new()
        .route("/api/game", get(game_status))
        .route("/api/clubhouse", post(clubhouse))
        .with_state(server);

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let actual_addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{actual_addr}"), handle)
}

const fn card(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank)
}

fn table_with_draws(
    base_url: &str,
    draws: &[Card],
) -> (Table, tokio::sync::mpsc::UnboundedReceiver<clubjack::Notice>) {
    let config = ClientConfig::new(base_url).unwrap();
    let client = ClubhouseClient::new(&config).unwrap();
    let mut session = Session::new(GameOptions::default(), 1);
    session.shoe_mut().stack(draws);
    Table::new(session, client, 7)
}

#[tokio::test]
async fn stand_settles_and_updates_balance() {
    let server = MockServer::new(1000);
    let (base_url, handle) = spawn_server(server.clone()).await;
    let (mut table, mut notices) = table_with_draws(
        &base_url,
        &[
            card(Suit::Clubs, 10),
            card(Suit::Diamonds, 9),
            card(Suit::Spades, 7),
            card(Suit::Hearts, 6),
            card(Suit::Diamonds, 5),
        ],
    );

    assert_eq!(table.refresh_balance().await.unwrap(), 1000);
    assert!(table.start_round(100).unwrap().is_none());

    let settlement = table.stand().unwrap();
    assert_eq!(settlement.round_id(), 1);
    assert_eq!(settlement.wait().await.unwrap(), 1100);
    assert_eq!(table.balance().get(), Some(1100));
    assert_eq!(table.balance().snapshot().revision, 2);

    let settlements = server.settlements.lock().unwrap().clone();
    assert_eq!(settlements.len(), 1);
    assert_eq!(settlements[0].0.as_deref(), Some("7-1"));
    assert_eq!(
        settlements[0].1,
        json!({
            "game": "blackjack",
            "bet": 100,
            "result": "win",
            "player_value": 19,
            "dealer_value": 18,
        })
    );

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(notice.message.contains("1100"), "{}", notice.message);

    handle.abort();
}

#[tokio::test]
async fn natural_blackjack_settles_on_deal() {
    let server = MockServer::new(1000);
    let (base_url, handle) = spawn_server(server.clone()).await;
    let (mut table, _notices) = table_with_draws(
        &base_url,
        &[
            card(Suit::Spades, 1),
            card(Suit::Hearts, 13),
            card(Suit::Clubs, 9),
            card(Suit::Diamonds, 8),
        ],
    );

    table.refresh_balance().await.unwrap();
    let settlement = table.start_round(100).unwrap().unwrap();
    assert_eq!(settlement.wait().await.unwrap(), 1150);

    let settlements = server.settlements.lock().unwrap().clone();
    assert_eq!(settlements[0].1["result"], "blackjack");
    assert_eq!(settlements[0].1["player_value"], 21);

    handle.abort();
}

#[tokio::test]
async fn bets_are_checked_against_fetched_balance() {
    let server = MockServer::new(1000);
    let (base_url, handle) = spawn_server(server).await;
    let (mut table, _notices) = table_with_draws(&base_url, &[]);

    assert!(matches!(
        table.start_round(100).unwrap_err(),
        Error::Bet(BetError::BalanceUnknown)
    ));

    table.refresh_balance().await.unwrap();
    assert!(matches!(
        table.start_round(5000).unwrap_err(),
        Error::Bet(BetError::InsufficientFunds)
    ));
    assert!(table.round().is_none());

    handle.abort();
}

#[tokio::test]
async fn failed_settlement_keeps_result_and_notifies() {
    let server = MockServer::failing(1000);
    let (base_url, handle) = spawn_server(server).await;
    let (mut table, mut notices) = table_with_draws(
        &base_url,
        &[
            card(Suit::Clubs, 10),
            card(Suit::Diamonds, 6),
            card(Suit::Spades, 9),
            card(Suit::Hearts, 8),
            card(Suit::Hearts, 13),
        ],
    );

    table.refresh_balance().await.unwrap();
    table.start_round(200).unwrap();
    let (drawn, settlement) = table.hit().unwrap();
    assert_eq!(drawn, card(Suit::Hearts, 13));

    let err = settlement.unwrap().wait().await.unwrap_err();
    match err {
        Error::FailedWithBody { status, body } => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "Tallennus epäonnistui");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(table.round().unwrap().outcome(), Some(Outcome::Bust));
    assert_eq!(table.balance().get(), Some(1000));
    assert_eq!(table.balance().snapshot().revision, 1);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);

    table.clear_round().unwrap();
    assert!(table.round().is_none());

    handle.abort();
}

#[tokio::test]
async fn round_is_submitted_once() {
    let server = MockServer::new(1000);
    let (base_url, handle) = spawn_server(server.clone()).await;
    let (mut table, _notices) = table_with_draws(
        &base_url,
        &[
            card(Suit::Clubs, 10),
            card(Suit::Diamonds, 8),
            card(Suit::Spades, 10),
            card(Suit::Hearts, 9),
        ],
    );

    table.refresh_balance().await.unwrap();
    table.start_round(100).unwrap();
    table.stand().unwrap().wait().await.unwrap();

    assert!(matches!(table.stand().unwrap_err(), Error::Action(_)));
    assert!(matches!(table.hit().unwrap_err(), Error::Action(_)));
    assert_eq!(server.settlements.lock().unwrap().len(), 1);
    assert_eq!(table.balance().get(), Some(900));

    handle.abort();
}

#[tokio::test]
async fn late_settlement_still_updates_balance() {
    let server = MockServer::slow(1000, Duration::from_millis(200));
    let (base_url, handle) = spawn_server(server.clone()).await;
    let (mut table, mut notices) = table_with_draws(
        &base_url,
        &[
            card(Suit::Clubs, 10),
            card(Suit::Diamonds, 9),
            card(Suit::Spades, 7),
            card(Suit::Hearts, 6),
            card(Suit::Diamonds, 5),
            card(Suit::Clubs, 10),
            card(Suit::Hearts, 7),
            card(Suit::Spades, 10),
            card(Suit::Diamonds, 8),
        ],
    );

    table.refresh_balance().await.unwrap();
    assert!(table.start_round(100).unwrap().is_none());
    let settlement = table.stand().unwrap();
    table.clear_round().unwrap();

    // The next round is dealt against the stale balance.
    assert!(table.start_round(50).unwrap().is_none());
    assert_eq!(table.round().unwrap().id(), 2);
    assert_eq!(table.balance().get(), Some(1000));
    assert_eq!(table.balance().snapshot().revision, 1);

    assert_eq!(settlement.wait().await.unwrap(), 1100);
    assert_eq!(table.balance().get(), Some(1100));
    assert_eq!(table.balance().snapshot().revision, 2);
    assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Info);

    let second = table.stand().unwrap();
    assert_eq!(second.round_id(), 2);
    assert_eq!(second.wait().await.unwrap(), 1050);
    assert_eq!(table.balance().get(), Some(1050));
    assert_eq!(table.balance().snapshot().revision, 3);

    let keys: Vec<_> = server
        .settlements
        .lock()
        .unwrap()
        .iter()
        .map(|(key, _)| key.clone().unwrap())
        .collect();
    assert_eq!(keys, ["7-1", "7-2"]);

    handle.abort();
}

#[test]
fn config_keeps_base_path() {
    let config = ClientConfig::new("http://localhost:5001/airline").unwrap();
    assert_eq!(config.base_url.as_str(), "http://localhost:5001/airline/");
    assert_eq!(
        config.base_url.join("api/game").unwrap().as_str(),
        "http://localhost:5001/airline/api/game"
    );

    let config = ClientConfig::new("http://localhost:5001").unwrap();
    assert_eq!(config.base_url.as_str(), "http://localhost:5001/");
}

#[test]
fn config_rejects_non_http_urls() {
    assert!(matches!(
        ClientConfig::new("ftp://example.com").unwrap_err(),
        Error::InvalidScheme(scheme) if scheme == "ftp"
    ));
    assert!(matches!(
        ClientConfig::new("not a url").unwrap_err(),
        Error::Url(_)
    ));
    assert_eq!(
        ClientConfig::new("http://localhost:5001").unwrap().timeout,
        ClientConfig::DEFAULT_TIMEOUT
    );
}
