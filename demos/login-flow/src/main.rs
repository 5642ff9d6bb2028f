//! Walks the full session lifecycle on a manual clock: login, an
//! active check, a transparent refresh after the access token dies, a
//! rejected check after the refresh token dies, and logout.
//!
//! Run with logging to watch the core narrate itself:
//!
//! ```sh
//! RUST_LOG=info cargo run -p login-flow
//! ```

use std::sync::Arc;

use lectern::{AuthGateway, FixedCredentials, SessionCheck};
use lectern_session::SessionConfig;
use lectern_token::ManualClock;

const THIRTY_MIN: u64 = 30 * 60 * 1_000;
const TWENTY_EIGHT_DAYS: u64 = 28 * 24 * 60 * 60 * 1_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // A manual clock so 28 days pass in microseconds.
    let clock = ManualClock::new(1_700_000_000_000);
    let mut gateway = AuthGateway::with_clock(
        FixedCredentials::default(),
        SessionConfig::default(),
        Arc::new(clock.clone()),
    );

    // -- Login --------------------------------------------------------

    let grant = match gateway.login("teacher1@teacher.com", "Password!") {
        Ok(grant) => grant,
        Err(e) => {
            tracing::error!(status = e.status_code(), "login failed: {e}");
            return;
        }
    };
    println!("login response:");
    print_json(&grant.to_response());
    println!("cookies set:");
    for cookie in &grant.cookies {
        println!("  Set-Cookie: {}", cookie.header_value());
    }

    let access = grant.session.access_token.clone();
    let refresh = grant.session.refresh_token.clone();

    // -- Check while active -------------------------------------------

    clock.advance(5 * 60 * 1_000); // five minutes later
    if let SessionCheck::Active { response } =
        gateway.check_session(&access, &refresh)
    {
        println!("\ncheck after 5 minutes (active):");
        print_json(&response);
    }

    // -- Check after access expiry: transparent refresh ----------------

    clock.advance(THIRTY_MIN);
    let access = match gateway.check_session(&access, &refresh) {
        SessionCheck::Refreshed { response, cookies } => {
            println!("\ncheck after 35 minutes (refreshed):");
            print_json(&response);
            for cookie in &cookies {
                println!("  Set-Cookie: {}", cookie.header_value());
            }
            cookies[0].value.clone()
        }
        other => {
            tracing::error!("expected a refresh, got {other:?}");
            return;
        }
    };

    // -- Check after refresh expiry: rejected --------------------------

    clock.advance(TWENTY_EIGHT_DAYS);
    if let SessionCheck::Unauthenticated { state } =
        gateway.check_session(&access, &refresh)
    {
        println!("\ncheck after 28 days: unauthenticated ({state:?})");
    }
    let swept = gateway.sweep_stale();
    println!("swept {swept} stale session(s)");

    // -- Fresh login, then logout --------------------------------------

    let grant = gateway
        .login("teacher1@teacher.com", "Password!")
        .expect("prototype credentials");
    let removed = gateway.logout(&grant.session.access_token);
    println!("\nlogout removed a session: {removed}");
    println!("cookies cleared:");
    for cookie in lectern::clear_cookies() {
        println!("  Set-Cookie: {}", cookie.header_value());
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!("serialization failed: {e}"),
    }
}
