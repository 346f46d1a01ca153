//! Shared styles, layouts and formatting helpers for the HTML views.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_RADIO_GROUP_STYLE: &str = "flex flex-col gap-2";
pub const FORM_RADIO_INPUT_STYLE: &str = "peer h-4 w-4 shrink-0 cursor-pointer \
    text-blue-600 border-gray-300 dark:border-gray-600 focus-visible:ring-2 \
    focus-visible:ring-blue-500 focus-visible:ring-offset-2 \
    focus-visible:ring-offset-white focus-visible:dark:ring-offset-gray-900";
pub const FORM_RADIO_LABEL_STYLE: &str = "flex-1 rounded border border-gray-300 \
    dark:border-gray-600 bg-white dark:bg-gray-700 px-3 py-2 text-sm font-medium \
    text-gray-700 dark:text-white cursor-pointer transition \
    hover:border-gray-400 hover:bg-gray-50 hover:text-gray-900 \
    hover:dark:border-gray-500 hover:dark:bg-gray-600 active:scale-[0.99] \
    peer-checked:border-blue-600 peer-checked:bg-blue-50 peer-checked:text-blue-700 \
    peer-checked:shadow-sm peer-checked:dark:border-blue-500 \
    peer-checked:dark:bg-blue-600/20 peer-checked:dark:text-blue-200";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Badge style
pub const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

pub const FORM_ERROR_STYLE: &str = "text-red-500 text-base";

const HTMX_SCRIPT: (&str, &str) = (
    "/static/htmx-2.0.8-min.js",
    "sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz",
);
const HTMX_RESPONSE_TARGETS_SCRIPT: (&str, &str) = (
    "/static/htmx-ext-response-targets-2.0.4.js",
    "sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg",
);

const SHARED_CSS: &str = "
#indicator.htmx-indicator { display: none; }
#indicator.htmx-request .htmx-indicator,
#indicator.htmx-request.htmx-indicator { display: inline; }
/* Chart tooltips sit under the bottom nav but over the page. */
.echarts-tooltip { z-index: 30 !important; }
";

/// Extra elements a page adds to `<head>`.
pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
    Style(PreEscaped<String>),
}

fn head(title: &str, head_elements: &[HeadElement]) -> Markup {
    html! {
        head {
            meta charset="UTF-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            title { (title) " - Pocketbook" }
            @for size in ["32x32", "128x128"] {
                link rel="icon" type="image/png" sizes=(size) href={ "/static/favicon-" (size) ".png" };
            }
            link rel="stylesheet" href="/static/main.css";
            @for (src, integrity) in [HTMX_SCRIPT, HTMX_RESPONSE_TARGETS_SCRIPT] {
                script src=(src) integrity=(integrity) {}
            }
            style { (PreEscaped(SHARED_CSS)) }

            @for element in head_elements {
                @match element {
                    HeadElement::ScriptSource(text) => script { (text) }
                    HeadElement::ScriptLink(path) => script src=(path) {}
                    HeadElement::Style(text) => style { (text) }
                }
            }

            script src="/static/app.js" defer {}
        }
    }
}

/// Wrap `content` in a full HTML document titled "`title` - Pocketbook".
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head(title, head_elements))

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900 pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0"
            {
                (content)

                // Target for out-of-band alert swaps.
                div
                    id="alert-container"
                    class="hidden fixed bottom-4 left-1/2 -translate-x-1/2 z-[9999] w-full max-w-md px-4"
                {}
            }
        }
    }
}

/// A full page for an HTTP error, e.g. `code` "404".
pub fn error_view(title: &str, code: &str, description: &str, fix: &str) -> Markup {
    let content = html! {
        main class="mx-auto max-w-screen-sm px-4 py-16 text-center text-gray-900 dark:text-white" {
            h1 class="mb-4 text-7xl lg:text-9xl font-extrabold text-blue-600 dark:text-blue-500" {
                (code)
            }
            p class="mb-4 text-3xl md:text-4xl font-bold" { (description) }
            p class="mb-8 text-xl md:text-2xl" { (fix) }
            a href="/" class="inline-block rounded px-5 py-2.5 text-sm font-medium text-white bg-blue-600 hover:bg-blue-800" {
                "Back to Homepage"
            }
        }
    };

    base(title, &[], &content)
}

/// The centred card holding the log-in, registration and password help pages.
pub fn auth_card(heading: &str, body: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto text-gray-900 dark:text-white" {
            p class="flex items-center mb-6 text-2xl font-semibold" {
                img class="w-8 h-8 mr-2" src="/static/favicon-128x128.png" alt="logo";
                "Pocketbook"
            }

            div class="w-full sm:max-w-md p-6 sm:p-8 space-y-4 md:space-y-6 rounded-lg shadow bg-white dark:bg-gray-800 dark:border dark:border-gray-700" {
                h1 class="text-xl md:text-2xl font-bold tracking-tight" { (heading) }
                (body)
            }
        }
    }
}

/// A labelled input on the account forms.
#[derive(Default)]
pub struct AuthField<'a> {
    pub label: &'a str,
    pub name: &'a str,
    pub type_: &'a str,
    pub value: &'a str,
    pub placeholder: Option<&'a str>,
    pub min_length: Option<u8>,
    /// Shown under the input, which then takes focus.
    pub error: Option<&'a str>,
}

pub fn auth_field(field: AuthField<'_>) -> Markup {
    html! {
        div {
            label for=(field.name) class=(FORM_LABEL_STYLE) { (field.label) }

            input
                type=(field.type_)
                name=(field.name)
                id=(field.name)
                class=(FORM_TEXT_INPUT_STYLE)
                placeholder=[field.placeholder]
                minlength=[field.min_length]
                value=(field.value)
                required
                autofocus[field.error.is_some()];

            @if let Some(error) = field.error {
                p class=(FORM_ERROR_STYLE) { (error) }
            }
        }
    }
}

/// The full width submit button that shows a spinner while htmx waits on a reply.
pub fn submit_button(label: &str) -> Markup {
    html! {
        button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE) {
            span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
            (label)
        }
    }
}

/// A line of small print ending in a link, e.g. "No account? Register here".
pub fn auth_footer_link(prompt: &str, href: &str, text: &str) -> Markup {
    html! {
        p class="text-sm font-light text-gray-500 dark:text-gray-400" {
            (prompt) " "
            a href=(href) class=(LINK_STYLE) { (text) }
        }
    }
}

pub fn loading_spinner() -> Markup {
    html! {
        span
            role="status"
            aria-hidden="true"
            class="inline-block w-4 h-4 me-2 align-middle rounded-full border-2 border-white border-t-transparent animate-spin"
        {}
    }
}

/// Returns the CSS styles for adding a dollar sign prefix to number inputs.
/// Used for currency input fields across multiple forms.
pub fn dollar_input_styles() -> HeadElement {
    HeadElement::Style(PreEscaped(
        r#"
        .input-wrapper {
            position: relative;
            display: inline-block;
        }
        .input-wrapper input[type="number"] {
            padding-left: 1.4rem;
        }
        .input-wrapper::before {
            content: '$';
            position: absolute;
            left: 0.6rem;
            top: 50%;
            transform: translateY(-50%);
            pointer-events: none;
        }
        "#
        .to_owned(),
    ))
}

fn currency_formatter(symbol: &str, decimals: u8) -> Formatter {
    Formatter::currency(symbol)
        .map(|formatter| formatter.precision(Precision::Decimals(decimals)))
        .unwrap_or_else(|error| {
            tracing::error!("could not create currency formatter for {symbol:?}: {error:?}");
            Formatter::new()
        })
}

/// Format `number` as dollars and cents, e.g. "$1,234.50" or "-$3.00".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let mut formatted_string = if number < 0.0 {
        NEGATIVE_FMT
            .get_or_init(|| currency_formatter("-$", 2))
            .fmt_string(number.abs())
    } else if number > 0.0 {
        POSITIVE_FMT
            .get_or_init(|| currency_formatter("$", 2))
            .fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    let bytes = formatted_string.as_bytes();
    if bytes.len() >= 3 && bytes[bytes.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// An edit link and a delete button for a row in a table or a card.
///
/// The delete button asks for confirmation with `confirm_message`, sends a
/// DELETE request to `delete_url` and swaps `hx_target` with `hx_swap` on
/// success.
pub fn edit_delete_action_links(
    edit_url: &str,
    delete_url: &str,
    confirm_message: &str,
    hx_target: &str,
    hx_swap: &str,
) -> Markup {
    html! {
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

        button
            type="button"
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-target=(hx_target)
            hx-target-error="#alert-container"
            hx-swap=(hx_swap)
            class=(BUTTON_DELETE_STYLE)
        {
            "Delete"
        }
    }
}

const DATE_ATTRIBUTE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

/// Format `date` for the `datetime` attribute of a `<time>` element.
pub fn date_datetime_attr(date: Date) -> String {
    date.format(DATE_ATTRIBUTE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Shorten `text` to at most `max_graphemes` user-perceived characters,
/// appending an ellipsis when anything was cut.
pub fn truncate_text(text: &str, max_graphemes: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max_graphemes).collect();

    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
