//! Category editing page and endpoint.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error, UserID,
    app_state::DbState,
    category::{Category, CategoryName, create::CategoryForm, get_category, rename_category},
    database_id::CategoryId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base,
    },
    navigation::NavBar,
};

/// Render the page for renaming one of the user's categories.
///
/// System categories and other users' categories respond with a 404 page.
pub async fn get_edit_category_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category(category_id, &connection)?;
    if category.user_id != Some(user_id) {
        return Err(Error::NotFound);
    }

    Ok(edit_category_view(&category).into_response())
}

/// Handle the category rename form submission.
pub async fn rename_category_endpoint(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Response {
    let name = match CategoryName::new(&form.name) {
        Ok(name) => name,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match rename_category(category_id, name, user_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!("Could not rename category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_category_view(category: &Category) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_CATEGORY_VIEW).into_html();
    let put_url = format_endpoint(endpoints::PUT_CATEGORY, category.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Category" }

            form
                hx-put=(put_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label
                        for="name"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Category Name"
                    }

                    input
                        id="name"
                        type="text"
                        name="name"
                        value=(category.name)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }

            a href=(endpoints::CATEGORIES_VIEW) class={"mt-4 " (LINK_STYLE)} { "Cancel" }
        }
    };

    base("Edit Category", &[], &content)
}
