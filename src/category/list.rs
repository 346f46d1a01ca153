//! Categories listing page.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, UserID,
    app_state::DbState,
    category::{
        Category, count_transactions_per_category, get_system_categories, get_user_categories,
    },
    endpoints,
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// A category with its URLs and usage for template rendering.
#[derive(Debug, Clone)]
struct CategoryRow {
    category: Category,
    edit_url: String,
    delete_url: String,
    transaction_count: u32,
}

impl CategoryRow {
    fn confirm_message(&self) -> String {
        format!(
            "Are you sure you want to delete '{}'? Goals tracking it will track all categories.",
            self.category.name
        )
    }
}

/// Render the user's categories with their transaction counts, followed by
/// the system categories.
pub async fn get_categories_page(
    State(state): State<DbState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_user_categories(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;
    let system_categories = get_system_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve system categories: {error}"))?;
    let transactions_per_category = count_transactions_per_category(user_id, &connection)
        .inspect_err(|error| {
            tracing::error!("Could not count transactions per category: {error}")
        })?;

    let rows = categories
        .into_iter()
        .map(|category| CategoryRow {
            edit_url: endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id),
            delete_url: endpoints::format_endpoint(endpoints::DELETE_CATEGORY, category.id),
            transaction_count: *transactions_per_category.get(&category.id).unwrap_or(&0),
            category,
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&rows, &system_categories).into_response())
}

fn categories_view(rows: &[CategoryRow], system_categories: &[Category]) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let table_row = |row: &CategoryRow| {
        html!(
            tr class=(TABLE_ROW_STYLE) data-category-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(BADGE_STYLE) { (row.category.name) }
                }

                td class=(TABLE_CELL_STYLE) data-transaction-count="true"
                {
                    (row.transaction_count)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &row.edit_url,
                            &row.delete_url,
                            &row.confirm_message(),
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Create Category"
                    }
                }

                (category_cards_view(rows, new_category_route))

                section class="hidden lg:block dark:bg-gray-800 lg:w-full"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories created yet. "
                                        a href=(new_category_route) class=(LINK_STYLE)
                                        {
                                            "Create your first category"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                section class="space-y-2"
                {
                    h2 class="text-lg font-semibold" { "System categories" }

                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "These are shared by everyone and cannot be changed."
                    }

                    ul id="system-categories" class="flex flex-wrap gap-2"
                    {
                        @for category in system_categories {
                            li class=(BADGE_STYLE) { (category.name) }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &[], &content)
}

fn category_cards_view(rows: &[CategoryRow], new_category_route: &str) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for row in rows {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-category-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        span class=(BADGE_STYLE) { (row.category.name) }
                        span class="text-sm tabular-nums text-gray-900 dark:text-white"
                        { (row.transaction_count) }
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (edit_delete_action_links(
                            &row.edit_url,
                            &row.delete_url,
                            &row.confirm_message(),
                            "closest [data-category-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if rows.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No categories created yet. "
                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Create your first category"
                    }
                }
            }
        }
    )
}
