// Demo binary: logs in with credentials from the environment, prints the
// current match and conversation lists, then tails live updates until
// interrupted. Useful as an end-to-end smoke check against a backend.

use std::env;
use std::sync::Arc;

use tokio::signal;

use dateconnect_client::api::client::ApiClient;
use dateconnect_client::api::matches::MatchApi;
use dateconnect_client::config::ClientConfig;
use dateconnect_client::services::session::Session;
use dateconnect_client::websocket::{LiveUpdates, RefreshHint};

#[tokio::main]
async fn main() {
    // Initialize the logger for logging messages
    env_logger::init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return;
        }
    };

    let email = match env::var("DATECONNECT_EMAIL") {
        Ok(email) => email,
        Err(_) => {
            eprintln!("DATECONNECT_EMAIL is not set");
            return;
        }
    };
    let password = match env::var("DATECONNECT_PASSWORD") {
        Ok(password) => password,
        Err(_) => {
            eprintln!("DATECONNECT_PASSWORD is not set");
            return;
        }
    };

    let api = Arc::new(ApiClient::new(&config));
    let session = Session::new(api.clone());

    let user = match session.login(&email, &password).await {
        Ok(user) => {
            println!("Logged in as {} ({})", user.first_name, user.email);
            user
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            return;
        }
    };

    match MatchApi::list(&api).await {
        Ok(matches) => {
            println!("{} match(es)", matches.len());
            for profile in &matches {
                println!("  - {} ({})", profile.first_name, profile.age);
            }
        }
        Err(e) => eprintln!("Could not fetch matches: {}", e),
    }

    match MatchApi::conversations(&api).await {
        Ok(conversations) => {
            println!("{} conversation(s)", conversations.len());
            for conversation in &conversations {
                let preview = conversation
                    .last_message
                    .as_deref()
                    .unwrap_or("(not started)");
                println!(
                    "  - {} [{}]: {}",
                    conversation.other_user.first_name, conversation.match_id, preview
                );
            }
        }
        Err(e) => eprintln!("Could not fetch conversations: {}", e),
    }

    let token = match api.token() {
        Some(token) => token,
        None => {
            eprintln!("No access token after login");
            return;
        }
    };

    let mut updates = match LiveUpdates::connect(&config.ws_url(user.id, &token)).await {
        Ok(updates) => updates,
        Err(e) => {
            eprintln!("Live updates unavailable: {}", e);
            return;
        }
    };

    println!("Listening for live updates (Ctrl+C to quit)");
    loop {
        tokio::select! {
            hint = updates.next() => match hint {
                Some(RefreshHint::Conversation(match_id)) => {
                    println!("New activity in match {}", match_id);
                }
                Some(RefreshHint::ConversationList) => {
                    println!("New activity, refresh the conversation list");
                }
                None => {
                    println!("Live-update channel closed");
                    break;
                }
            },
            _ = signal::ctrl_c() => {
                println!("Signal received, shutting down");
                break;
            }
        }
    }
}
