//! Where to send a user once they have logged in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

const API_PREFIX: &str = "/api";

/// Keep only the path and query of `raw_url` if it points back into this app.
///
/// Absolute URLs, protocol relative URLs and the log-in page itself are rejected.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let target = uri.path_and_query()?;

    let is_local = target.as_str().starts_with('/') && !target.as_str().starts_with("//");
    (is_local && target.path() != endpoints::LOG_IN_VIEW).then(|| target.as_str().to_owned())
}

/// The log-in page URL carrying the page `request` should return to.
///
/// Page requests return to themselves. Requests under `/api` come from htmx,
/// so they return to the page named in the `HX-Current-URL` header. The
/// wallets page is used when neither gives a safe target.
pub fn log_in_url_for(request: &Request) -> String {
    let path = request.uri().path();
    let target = if path.starts_with(API_PREFIX) {
        htmx_current_page(request)
    } else {
        request.uri().path_and_query().and_then(|target| normalize_redirect_url(target.as_str()))
    };

    let target = target.unwrap_or_else(|| {
        tracing::warn!("No page to return to after logging in from {path}, using the wallets page");
        endpoints::WALLETS_VIEW.to_owned()
    });

    match serde_urlencoded::to_string([("redirect_url", &target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

fn htmx_current_page(request: &Request) -> Option<String> {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    if !header("hx-request").is_some_and(|value| value.eq_ignore_ascii_case("true")) {
        return None;
    }

    // htmx sends the full URL of the page, so only the host is dropped here.
    let current_url = header("hx-current-url")?.parse::<Uri>().ok()?;
    local_path_and_query(&current_url)
}
