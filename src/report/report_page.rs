//! The monthly report page: wallet totals, a monthly summary and expenses by category.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    Error, UserID,
    app_state::DbTimezoneState,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    navigation::NavBar,
    report::core::{
        CategoryExpense, MonthlySummary, ReportPeriod, get_consolidated_wallet_balance,
        get_expenses_by_category, get_monthly_summary,
    },
    timezone::get_local_date,
};

const EXPENSES_CHART_ID: &str = "expenses-chart";

/// The optional month and year to report on.
///
/// Kept as text so that malformed values fall back to the current month
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

/// Work out the reported month, falling back to `today`'s month and year for
/// missing or invalid values.
fn resolve_period(query: &ReportQuery, today: Date) -> ReportPeriod {
    let month = query
        .month
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u8>().ok())
        .and_then(|number| Month::try_from(number).ok())
        .unwrap_or(today.month());

    let year = query
        .year
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i32>().ok())
        .filter(|year| (1..=9999).contains(year))
        .unwrap_or(today.year());

    ReportPeriod { month, year }
}

/// Render the report for the month in the query string, the current month by default.
pub async fn get_report_page(
    State(state): State<DbTimezoneState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let period = resolve_period(&query, today);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let total_balance = get_consolidated_wallet_balance(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get wallet total: {error}"))?;
    let summary = get_monthly_summary(user_id, period, &connection)
        .inspect_err(|error| tracing::error!("could not get monthly summary: {error}"))?;
    let expenses = get_expenses_by_category(user_id, period, &connection)
        .inspect_err(|error| tracing::error!("could not get expenses by category: {error}"))?;

    Ok(report_view(period, total_balance, &summary, &expenses).into_response())
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn expenses_chart(period: ReportPeriod, expenses: &[CategoryExpense]) -> Chart {
    let data = expenses
        .iter()
        .map(|expense| (expense.total, expense.category.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses by category")
                .subtext(format!("{} {}", period.month, period.year)),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// The script that draws the chart once the page has loaded.
fn chart_script(chart_id: &str, options: &str) -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chart = echarts.init(document.getElementById("{chart_id}"));
            chart.setOption({options});
            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#
    )))
}

fn period_form(period: ReportPeriod) -> Markup {
    let months = (1..=12u8).filter_map(|number| Month::try_from(number).ok());

    html! {
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select id="month" name="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for month in months {
                        option value=(u8::from(month)) selected[month == period.month]
                        {
                            (month)
                        }
                    }
                }
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                input
                    id="year"
                    type="number"
                    name="year"
                    min="1"
                    max="9999"
                    value=(period.year)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
            }
        }
    }
}

fn summary_card(label: &str, amount: f64, data_attribute: &str) -> Markup {
    html! {
        div class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            p class="text-lg font-semibold" data-summary=(data_attribute)
            {
                (format_currency(amount))
            }
        }
    }
}

fn expenses_table(expenses: &[CategoryExpense]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Total" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE) data-expense-row="true"
                        {
                            td class=(TABLE_CELL_STYLE) { (expense.category) }
                            td class={(TABLE_CELL_STYLE) " text-right"}
                            {
                                (format_currency(expense.total))
                            }
                        }
                    }

                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="2" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No expenses this month."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn report_view(
    period: ReportPeriod,
    total_balance: f64,
    summary: &MonthlySummary,
    expenses: &[CategoryExpense],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Reports" }

                    (period_form(period))
                }

                div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4"
                {
                    (summary_card("Across active wallets", total_balance, "total"))
                    (summary_card("Income", summary.income, "income"))
                    (summary_card("Expenses", summary.expense, "expense"))
                    (summary_card("Balance for the month", summary.balance, "balance"))
                }

                @if !expenses.is_empty() {
                    div
                        id=(EXPENSES_CHART_ID)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }

                (expenses_table(expenses))
            }
        }
    );

    let head_elements = if expenses.is_empty() {
        Vec::new()
    } else {
        let options = expenses_chart(period, expenses).to_string();

        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            chart_script(EXPENSES_CHART_ID, &options),
        ]
    };

    base("Reports", &head_elements, &content)
}

#[cfg(test)]
mod resolve_period_tests {
    use time::{Month, macros::date};

    use crate::report::core::ReportPeriod;

    use super::{ReportQuery, resolve_period};

    fn query(month: Option<&str>, year: Option<&str>) -> ReportQuery {
        ReportQuery {
            month: month.map(str::to_owned),
            year: year.map(str::to_owned),
        }
    }

    #[test]
    fn defaults_to_current_month() {
        let got = resolve_period(&ReportQuery::default(), date!(2025 - 07 - 14));

        assert_eq!(
            got,
            ReportPeriod {
                month: Month::July,
                year: 2025
            }
        );
    }

    #[test]
    fn uses_valid_query_values() {
        let got = resolve_period(&query(Some("2"), Some("2023")), date!(2025 - 07 - 14));

        assert_eq!(
            got,
            ReportPeriod {
                month: Month::February,
                year: 2023
            }
        );
    }

    #[test]
    fn invalid_values_fall_back() {
        for (month, year) in [("13", "abc"), ("0", ""), ("March", "-4")] {
            let got = resolve_period(&query(Some(month), Some(year)), date!(2025 - 07 - 14));

            assert_eq!(
                got,
                ReportPeriod {
                    month: Month::July,
                    year: 2025
                },
                "month {month:?} and year {year:?} should fall back"
            );
        }
    }
}
