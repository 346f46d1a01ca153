#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use db::{create_test_user, get_test_connection};
pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, assert_optional_form_input, get_select_options, get_selected_option,
    must_get_form,
};
pub(crate) use html::{
    assert_alert_message, assert_valid_html, parse_html_document, parse_html_fragment,
    select_text,
};
pub(crate) use http::{assert_hx_redirect, assert_see_other_hx_redirect};
