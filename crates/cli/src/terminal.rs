//! Terminal stand-ins for the host collaborators.

use api::{AuthOutcome, Authenticator, DeletionConfirmer};
use log::{debug, warn};
use std::env;
use std::io::{self, BufRead, Write};

/// Overrides the authentication prompt: `allow` or `deny`.
pub const AUTH_ENV: &str = "MINDMAP_AUTH";

/// Authenticates by asking on the terminal, unless `MINDMAP_AUTH` decides.
pub struct TerminalAuth {
    pub subject: String,
}

impl Authenticator for TerminalAuth {
    async fn authenticate(&self) -> AuthOutcome {
        match env::var(AUTH_ENV).ok().as_deref().map(str::trim) {
            Some("allow") => return AuthOutcome::Granted,
            Some("deny") => return AuthOutcome::Denied,
            Some(other) => warn!("ignoring {AUTH_ENV}={other:?}; expected allow or deny"),
            None => {}
        }

        if ask(&format!("Authenticate to access {:?}?", self.subject)) {
            AuthOutcome::Granted
        } else {
            AuthOutcome::Denied
        }
    }
}

/// Asks before a whole map is deleted.
pub struct TerminalConfirm;

impl DeletionConfirmer for TerminalConfirm {
    async fn confirm_deletion(&self, key: &str) -> bool {
        ask(&format!("Delete {key:?} and its preview? This can't be undone."))
    }
}

/// Prints a y/N question and reads the answer. Anything but yes is no.
fn ask(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(e) => {
            debug!("failed to read answer: {e}");
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
