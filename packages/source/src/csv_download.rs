//! CSV file downloader.
//!
//! Downloads the occurrence CSV in a single request and rejects responses
//! that are clearly not CSV (HTML error pages, empty bodies).

use crate::LoadError;

/// Downloads the CSV at `url` and returns its body as text.
///
/// # Errors
///
/// Returns [`LoadError::Http`] if the request fails or the server returns a
/// non-success status, and [`LoadError::Fetch`] if the body does not look
/// like CSV.
pub async fn download_csv(client: &reqwest::Client, url: &str) -> Result<String, LoadError> {
    let response = client.get(url).send().await?.error_for_status()?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase);

    let text = response.text().await?;

    log::debug!("Downloaded {} bytes from {url}", text.len());

    check_csv_body(&text, content_type.as_deref())?;

    Ok(text)
}

/// Rejects bodies that cannot be CSV.
fn check_csv_body(text: &str, content_type: Option<&str>) -> Result<(), LoadError> {
    if content_type.is_some_and(|ct| ct.contains("text/html")) {
        return Err(LoadError::Fetch {
            message: "server returned HTML instead of CSV".to_owned(),
        });
    }

    let first_line = text.lines().next().unwrap_or("").trim_start_matches('\u{feff}');
    if first_line.trim().is_empty() {
        return Err(LoadError::Fetch {
            message: "CSV body is empty".to_owned(),
        });
    }
    if first_line.trim_start().starts_with('<') {
        return Err(LoadError::Fetch {
            message: "response body looks like markup, not CSV".to_owned(),
        });
    }

    Ok(())
}
