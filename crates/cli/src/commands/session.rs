//! Inspect and remove the persisted session snapshot.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use golive_harness::{HarnessConfig, SessionStore};

fn resolve_store(auth_file: Option<PathBuf>) -> SessionStore {
    let path = auth_file.unwrap_or_else(|| HarnessConfig::from_env().auth_file);
    SessionStore::new(path)
}

pub fn show(auth_file: Option<PathBuf>) -> Result<()> {
    let store = resolve_store(auth_file);
    println!("session file: {}", store.path().display());

    match store.load() {
        Some(snapshot) => {
            let age = store
                .age()
                .map(|a| format!("{}m", a.as_secs() / 60))
                .unwrap_or_else(|| "unknown".to_string());
            let status = if store.usable() {
                "usable".green()
            } else {
                "stale or empty".yellow()
            };
            println!("  cookies: {}", snapshot.cookies.len());
            println!("  origins: {}", snapshot.origins.len());
            println!("  age:     {age}");
            println!("  status:  {status}");
        }
        None => println!("  {}", "no snapshot (missing or unreadable)".yellow()),
    }
    Ok(())
}

pub fn clear(auth_file: Option<PathBuf>) -> Result<()> {
    let store = resolve_store(auth_file);
    if store.clear()? {
        println!("removed {}", store.path().display());
    } else {
        println!("nothing to remove at {}", store.path().display());
    }
    Ok(())
}
