use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, name: &str) -> String {
    match response.headers().get(name).map(|value| value.to_str()) {
        Some(Ok(value)) => value.to_owned(),
        Some(Err(error)) => panic!("header {name} is not text: {error}"),
        None => panic!("response has no {name} header, got {:?}", response.headers()),
    }
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

/// The redirect htmx follows after a form is saved.
#[track_caller]
pub(crate) fn assert_see_other_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "for {endpoint}");
    assert_hx_redirect(response, endpoint);
}
