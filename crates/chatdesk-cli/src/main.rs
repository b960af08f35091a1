//! Chatdesk - terminal chat client
//!
//! Reads lines from stdin: slash commands manage sessions, anything else is
//! sent to the backend as a question.

mod command;
mod terminal;

use std::sync::Arc;

use chatdesk_core::{Client, Config, CoreError, SessionError, Submission};

use command::Command;
use terminal::{Input, TerminalSurface};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatdesk_core::init_logging();

    let config = Config::load()?;
    let input = Input::stdin();
    let surface = Arc::new(TerminalSurface);

    let mut client = Client::new(config, surface, Arc::new(input.clone()))?;

    if let Err(e) = client.initialize().await {
        eprintln!("Could not load sessions: {e}");
    }

    while let Some(line) = input.next_line("> ").await? {
        let Some(command) = Command::parse(&line) else {
            if let Submission::Failed(e) = client.send(&line).await {
                tracing::debug!(error = %e, "Query failed");
            }
            continue;
        };

        let result = match command {
            Command::Quit => break,
            Command::New(name) => client.create_session(&name).await,
            Command::Switch(name) => client.switch_session(&name).await,
            Command::Rename { old, new } => match old.or_else(|| client.sessions().active_session()) {
                Some(old) => client.rename_session(&old, &new).await,
                None => {
                    eprintln!("No open session to rename");
                    Ok(())
                }
            },
            Command::Delete(name) => match name.or_else(|| client.sessions().active_session()) {
                Some(name) => client.delete_session(&name).await.map(|_| ()),
                None => {
                    eprintln!("No open session to delete");
                    Ok(())
                }
            },
            Command::List => {
                let active = client.sessions().active_session();
                for session in client.sessions().sessions() {
                    let marker = if Some(&session) == active.as_ref() { '*' } else { ' ' };
                    println!(" {marker} {session}");
                }
                Ok(())
            }
            Command::Mode(None) => {
                println!("mode: {}", client.mode());
                Ok(())
            }
            Command::Mode(Some(mode)) => client.set_mode(mode),
            Command::Usage(usage) => {
                eprintln!("usage: {usage}");
                Ok(())
            }
        };

        match result {
            // Already shown to the user as an alert
            Err(CoreError::Session(SessionError::InvalidName(_))) => {}
            Err(e) => eprintln!("error: {e}"),
            Ok(()) => {}
        }
    }

    Ok(())
}
