//! Mint a bootstrap token for an actor id.
//!
//! Usage: `issue-token <actor-id> [ttl-hours]`
//!
//! Signs with `SESSION_SECRET`, which must match the running server.

use chrono::Duration;

use server::config::{env_var, load_config};
use server::identity::IdentityProvider;

fn main() {
    let _ = dotenvy::dotenv();

    let mut args = std::env::args().skip(1);
    let Some(actor_id) = args.next() else {
        eprintln!("usage: issue-token <actor-id> [ttl-hours]");
        std::process::exit(2);
    };
    let ttl_hours: i64 = args.next().and_then(|v| v.parse().ok()).unwrap_or(1);

    if env_var("SESSION_SECRET").is_none() {
        eprintln!("SESSION_SECRET must be set so the server accepts this token");
        std::process::exit(2);
    }

    let config = load_config();
    let identity = IdentityProvider::from_env(config.app.session_ttl_hours);
    match identity.issue_bootstrap(&actor_id, Duration::hours(ttl_hours.max(1))) {
        Ok(token) => println!("{token}"),
        Err(e) => {
            eprintln!("{}", e.message);
            std::process::exit(1);
        }
    }
}
