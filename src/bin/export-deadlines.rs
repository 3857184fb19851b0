//! Fetch the deadlines of a user, and save them as an iCal file
//!
//! Usage: `export-deadlines <user-id> [output-dir]`
//!
//! The bearer token is read from `COLLEGE_READY_TOKEN`, and `COLLEGE_READY_API` may override the server URL.

use std::path::PathBuf;

use chrono::Utc;

use college_ready::client::Client;
use college_ready::config::{self, API_BASE_URL};
use college_ready::session::{Session, User};
use college_ready::DeadlineCalendar;

const TOKEN_VAR: &str = "COLLEGE_READY_TOKEN";
const API_VAR: &str = "COLLEGE_READY_API";


#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let user_id = match args.next() {
        Some(user_id) => user_id,
        None => {
            eprintln!("Usage: export-deadlines <user-id> [output-dir]");
            std::process::exit(2);
        }
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    if let Ok(url) = std::env::var(API_VAR) {
        config::set(&API_BASE_URL, url);
    }
    let mut user = User::new(&user_id);
    match std::env::var(TOKEN_VAR) {
        Ok(token) => user = user.with_id_token(token),
        Err(_) => log::warn!("{} is not set, requests will not be authenticated", TOKEN_VAR),
    }

    let client = match Client::from_config(Session::signed_in(user)) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Invalid server URL: {}", err);
            std::process::exit(1);
        }
    };

    let mut calendar = DeadlineCalendar::new();
    if let Err(err) = calendar.refresh(&client, &user_id).await {
        log::error!("Unable to fetch deadlines: {}", err.user_message());
        std::process::exit(1);
    }

    println!("---- deadlines of {} -----", user_id);
    college_ready::utils::print_deadline_list(calendar.all());

    match calendar.export(&Utc::now()).save_to_folder(&output_dir) {
        Ok(path) => println!("Saved {}", path.display()),
        Err(err) => {
            log::error!("Unable to save the export: {}", err);
            std::process::exit(1);
        }
    }
}
