#[cfg(test)]
#[macro_use]
extern crate rstest;

pub mod rate_limit;
pub mod session;
pub mod test_utils;
pub mod users;
pub mod view;
#[cfg(test)]
mod mock;
use std::error::Error;

use tokio::io::{AsyncBufReadExt, BufReader};

pub use session::{
    SessionConfig, SessionConfigBuilder, TriggerError, TriggerOutcome, UserSession,
};
pub type GenericResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Runs the terminal client: every line on stdin is a click on the
/// "get random user" button, `q` or end of input quits.
pub async fn run_app(config: SessionConfig) -> GenericResult<()> {
    let session = UserSession::with_http(config);
    let renderer = spawn_renderer(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" | "quit" => break,
            _ => handle_click(&session),
        }
    }

    session.shutdown();
    renderer.abort();
    Ok(())
}

fn handle_click(session: &UserSession) {
    match session.trigger() {
        Ok(outcome) => log::debug!("click: {:?}", outcome),
        Err(e) => log::warn!("click ignored: {}", e),
    }
}

fn spawn_renderer(session: &UserSession) -> tokio::task::JoinHandle<()> {
    let mut view_rx = session.subscribe();
    tokio::spawn(async move {
        println!("{}", view::render(&view_rx.borrow_and_update()));
        while view_rx.changed().await.is_ok() {
            let frame = view::render(&view_rx.borrow_and_update());
            println!("{}", frame);
        }
    })
}
