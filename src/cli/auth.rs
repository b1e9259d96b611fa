//! Session CLI commands
//!
//! Login is the two-step code exchange: request a code, then trade it for a
//! token that is stored for later invocations.

use crate::backend::{Backend, LocalBackend};
use crate::error::{FinError, FinResult};
use crate::session::Session;

/// Request a code for `email` (unless one was given) and sign in with it
pub fn handle_login(
    backend: &dyn Backend,
    session: &mut Session,
    email: &str,
    code: Option<String>,
) -> FinResult<()> {
    let code = match code {
        Some(code) => code,
        None => {
            let message = Session::request_code(backend, email)?;
            println!("{}", message);
            rpassword::prompt_password("Enter the 6-digit code: ")
                .map_err(|e| FinError::Io(format!("Failed to read code: {}", e)))?
        }
    };

    let user = session.login(backend, email, &code)?;
    println!("Signed in as {}", user);
    Ok(())
}

pub fn handle_logout(backend: &dyn Backend, session: &mut Session) -> FinResult<()> {
    if !session.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    session.logout(backend)?;
    println!("Signed out.");
    Ok(())
}

pub fn handle_whoami(backend: &dyn Backend, session: &mut Session) -> FinResult<()> {
    let user = session.refresh_user(backend)?;
    println!("{}", user);
    println!("  ID: {}", user.id);
    Ok(())
}

/// Print the most recent audit entries of the signed-in user
pub fn handle_history(backend: &LocalBackend, session: &mut Session, count: usize) -> FinResult<()> {
    let user = session.refresh_user(backend)?;
    let entries = backend.storage().audit().read_recent(user.id, count)?;

    if entries.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
