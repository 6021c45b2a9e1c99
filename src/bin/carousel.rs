//! Terminal carousel: loads both collections from a running gateway and lets
//! you page through them from stdin (`n`/`p`, arrow key names, swipes, tabs).

use std::sync::Arc;
use std::time::Duration;

use feed_carousel::ingest::types::ItemImage;
use feed_carousel::ingest::DEFAULT_SOCIAL_LIMIT;
use feed_carousel::navigator::input::{InputEvent, Key, NavButton, SwipeDirection};
use feed_carousel::navigator::loader::spawn_loads;
use feed_carousel::navigator::session::{Delivery, Session};
use feed_carousel::navigator::{Availability, CurrentItem, Navigator};
use feed_carousel::{GatewayClient, SourceId};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: n | p | → | ← | ArrowRight | ArrowLeft | swipe-left | swipe-right | news | social | q";

enum Command {
    Input(InputEvent),
    Quit,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Some(key) = Key::from_name(line) {
        return Command::Input(InputEvent::Key(key));
    }
    match line {
        "n" | "next" | "→" => Command::Input(InputEvent::Click(NavButton::Next)),
        "p" | "prev" | "←" => Command::Input(InputEvent::Click(NavButton::Previous)),
        "swipe-left" => Command::Input(InputEvent::Swipe(SwipeDirection::Left)),
        "swipe-right" => Command::Input(InputEvent::Swipe(SwipeDirection::Right)),
        "news" => Command::Input(InputEvent::SelectTab(SourceId::News)),
        "social" => Command::Input(InputEvent::SelectTab(SourceId::Social)),
        "q" | "quit" => Command::Quit,
        _ => Command::Unknown,
    }
}

fn render(nav: &Navigator) {
    let active = nav.state().active_source();
    let tabs = SourceId::ALL
        .iter()
        .map(|s| if *s == active { format!("[{s}]") } else { s.to_string() })
        .collect::<Vec<_>>()
        .join(" ");
    println!("\n{tabs}");

    match nav.current_item() {
        CurrentItem::Ready { item, index, len } => {
            println!("{}", item.title);
            println!("{}", item.author_or_source);
            if let Some(ts) = item.published_at {
                println!("{}", ts.format("%B %-d, %Y"));
            }
            match item.image() {
                ItemImage::Available(url) => println!("image: {url}"),
                ItemImage::NoImage => println!("No image available"),
            }
            if let Some(m) = item.metrics {
                println!("score: {}  comments: {}", m.score, m.comments);
            }
            if !item.body.is_empty() {
                println!("{}", item.body);
            }
            println!("{}", item.source_url);
            let dots = (0..len)
                .map(|i| if i == index { "●" } else { "○" })
                .collect::<String>();
            println!("{dots}");
        }
        CurrentItem::NotReady => match nav.availability(active) {
            Availability::Unavailable(reason) => println!("Unavailable: {reason}"),
            Availability::Ready(0) => println!("Nothing to show"),
            _ => println!("Loading..."),
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    feed_carousel::init_tracing_stderr();

    let base = std::env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());
    let client = GatewayClient::new(base, Duration::from_secs(10))?;

    let mut session = Session::new();
    let mut loads = spawn_loads(Arc::new(client), &mut session, DEFAULT_SOCIAL_LIMIT);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    render(session.navigator());

    loop {
        tokio::select! {
            Some(outcome) = loads.recv() => {
                let active = session.navigator().state().active_source();
                let source = outcome.ticket.source();
                if session.deliver(outcome.ticket, outcome.result) == Delivery::Applied && source == active {
                    render(session.navigator());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Input(ev) => {
                        session.navigator_mut().dispatch(ev);
                        render(session.navigator());
                    }
                    Command::Unknown => println!("{HELP}"),
                }
            }
        }
    }

    session.close();
    Ok(())
}
