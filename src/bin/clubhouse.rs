//! Terminal blackjack table for the clubhouse.

use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use clubjack::{
    BalanceCell, Card, ClientConfig, ClubhouseClient, DealerHand, GameOptions, Hand, NoticeLevel,
    Round, Session, SettlementHandle, Suit, Table, parse_bet,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "clubhouse", about = "Play blackjack in the clubhouse")]
struct Args {
    /// Game server URL (defaults to CLUBHOUSE_BASE_URL or http://localhost:5001).
    #[arg(long)]
    base_url: Option<String>,
    /// Shoe seed (defaults to the current time).
    #[arg(long)]
    seed: Option<u64>,
    /// Number of decks in the shoe.
    #[arg(long, default_value_t = 6)]
    decks: u8,
    /// Dealer hits soft 17.
    #[arg(long)]
    hit_soft_17: bool,
    /// Dealer checks for blackjack right after the deal.
    #[arg(long)]
    dealer_peek: bool,
    /// Play without a server, starting with this much cash.
    #[arg(long, value_name = "CASH")]
    offline: Option<i64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_options(args: &Args) -> GameOptions {
    GameOptions::default()
        .with_decks(args.decks)
        .with_stand_on_soft_17(!args.hit_soft_17)
        .with_dealer_peek(args.dealer_peek)
}

fn build_config(args: &Args) -> Result<ClientConfig> {
    let config = match &args.base_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    });
    let session = Session::new(build_options(&args), seed);

    println!("Clubhouse blackjack (type 'q' to quit)");

    match args.offline {
        Some(cash) => {
            play_offline(session, cash);
            Ok(())
        }
        None => play_online(session, &args, seed).await,
    }
}

fn play_offline(mut session: Session, cash: i64) {
    let balance = BalanceCell::with_balance(cash);

    loop {
        let cash = balance.get().unwrap_or(0);
        if cash <= 0 {
            println!("You are out of money. Game over.");
            break;
        }

        let Some(bet) = prompt_bet(cash) else {
            break;
        };
        if let Err(err) = session.start_round(bet, cash) {
            println!("Bet rejected: {err}");
            continue;
        }

        while session.round().is_some_and(|round| !round.is_over()) {
            print_round(&session);
            let result = match prompt_line("[h]it [s]tand: ").as_str() {
                "h" | "hit" => session.hit().map(|_| ()),
                "s" | "stand" => session.stand().map(|_| ()),
                "q" | "quit" => return,
                _ => {
                    println!("Unknown action.");
                    continue;
                }
            };
            if let Err(err) = result {
                println!("Action error: {err}");
            }
        }

        print_round(&session);
        if let Some(result) = session.result() {
            println!("{result}");
            balance.set(cash + result.net);
        }
        if let Err(err) = session.clear_round() {
            println!("Could not clear the table: {err}");
        }
    }
}

async fn play_online(session: Session, args: &Args, session_id: u64) -> Result<()> {
    let config = build_config(args)?;
    let client = ClubhouseClient::new(&config)?;
    let (mut table, mut notices) = Table::new(session, client, session_id);

    table
        .refresh_balance()
        .await
        .with_context(|| format!("failed to fetch balance from {}", config.base_url))?;

    let mut pending: Option<SettlementHandle> = None;

    loop {
        if let Some(handle) = pending.take() {
            // The result is reported through the notice channel.
            let _ = handle.wait().await;
        }
        drain_notices(&mut notices);

        let cash = table.balance().get().unwrap_or(0);
        if cash <= 0 {
            println!("You are out of money. Game over.");
            break;
        }

        let Some(bet) = prompt_bet(cash) else {
            break;
        };
        match table.start_round(bet) {
            Ok(settlement) => pending = settlement,
            Err(err) => {
                println!("Bet rejected: {err}");
                continue;
            }
        }

        while table.round().is_some_and(|round| !round.is_over()) {
            print_round(table.session());
            match prompt_line("[h]it [s]tand: ").as_str() {
                "h" | "hit" => match table.hit() {
                    Ok((card, settlement)) => {
                        println!("You draw {}", format_card(&card));
                        pending = settlement;
                    }
                    Err(err) => println!("Action error: {err}"),
                },
                "s" | "stand" => match table.stand() {
                    Ok(settlement) => pending = Some(settlement),
                    Err(err) => println!("Action error: {err}"),
                },
                "q" | "quit" => return Ok(()),
                _ => println!("Unknown action."),
            }
        }

        print_round(table.session());
        if let Some(result) = table.session().result() {
            println!("{result}");
        }
        table.clear_round()?;
    }

    if let Some(handle) = pending.take() {
        let _ = handle.wait().await;
    }
    drain_notices(&mut notices);
    Ok(())
}

fn drain_notices(notices: &mut UnboundedReceiver<clubjack::Notice>) {
    while let Ok(notice) = notices.try_recv() {
        match notice.level {
            NoticeLevel::Info => println!("{}", colorize(&notice.message, "32")),
            NoticeLevel::Error => println!("{}", colorize(&notice.message, "31")),
        }
    }
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

fn prompt_bet(cash: i64) -> Option<u64> {
    loop {
        let input = prompt_line(&format!("Cash {cash}. Bet amount: "));
        if input.is_empty() || input == "q" || input == "quit" {
            return None;
        }
        match parse_bet(&input) {
            Ok(bet) => return Some(bet),
            Err(err) => println!("Invalid bet: {err}"),
        }
    }
}

fn print_round(session: &Session) {
    let Some(round) = session.round() else {
        return;
    };
    println!("\nShoe: {} cards remaining", session.cards_remaining());
    print_hands(round);
}

fn print_hands(round: &Round) {
    let dealer = round.dealer();
    println!(
        "Dealer: {} (value {})",
        format_dealer(dealer),
        dealer.visible_value()
    );
    let player = round.player();
    println!(
        "You:    {} (value {}) | bet {}",
        format_hand(player),
        player.value(),
        round.bet()
    );
    println!();
}

fn colorize(text: &str, code: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

fn format_dealer(dealer: &DealerHand) -> String {
    if dealer.is_empty() {
        return "(no cards)".to_string();
    }

    if dealer.is_hole_revealed() {
        format_cards(dealer.cards())
    } else {
        let mut parts = Vec::new();
        if let Some(card) = dealer.up_card() {
            parts.push(format_card(card));
        }
        if dealer.len() > 1 {
            parts.push("??".to_string());
        }
        parts.join(" ")
    }
}

fn format_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return "(empty)".to_string();
    }
    format_cards(hand.cards())
}

fn format_cards(cards: &[Card]) -> String {
    cards.iter().map(format_card).collect::<Vec<_>>().join(" ")
}

fn format_card(card: &Card) -> String {
    let color_code = match card.suit {
        suit if suit.is_red() => "31",
        Suit::Clubs => "32",
        _ => "34",
    };
    colorize(&card.to_string(), color_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_house_rule_flags() {
        let args = Args::parse_from([
            "clubhouse",
            "--decks",
            "2",
            "--hit-soft-17",
            "--dealer-peek",
            "--offline",
            "500",
        ]);
        let options = build_options(&args);
        assert_eq!(options.decks, 2);
        assert!(!options.stand_on_soft_17);
        assert!(options.dealer_peek);
        assert_eq!(args.offline, Some(500));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let args = Args::parse_from(["clubhouse", "--base-url", "ftp://example.com"]);
        let err = build_config(&args).unwrap_err();
        assert!(
            err.to_string().contains("invalid URL scheme"),
            "unexpected error: {err}"
        );
    }
}
