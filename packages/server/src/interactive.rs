//! Interactive mode for the server.
//!
//! Prompts for bind address, port, and an optional CSV mirror before
//! starting the server.

use std::sync::Arc;

use dialoguer::{Confirm, Input};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Sets `BIND_ADDR`, `PORT`, and (when given) `DATA_URL` from the answers,
/// then delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset definition is invalid
/// or the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("CENIPA Occurrence Map Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default("8080".to_string())
        .interact_text()
        .unwrap_or_else(|_| "8080".to_string());

    let data_url: String = Input::new()
        .with_prompt("CSV URL override (blank for the CENIPA default)")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();

    // SAFETY: No other thread reads the environment while these are set.
    // The server reads them once, after this block, during startup.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
        if !data_url.trim().is_empty() {
            std::env::set_var("DATA_URL", data_url.trim());
        }
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port_str}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    let cache = super::default_cache().map_err(std::io::Error::other)?;
    super::run_server(Arc::new(cache)).await
}
