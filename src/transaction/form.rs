use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    category::Category,
    database_id::CategoryId,
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE,
    },
    transaction::core::TransactionType,
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Whether the transaction is an income or an expense.
    pub type_: TransactionType,
    /// The unsigned amount in dollars.
    pub amount: f64,
    /// The date the transaction happened.
    pub date: Date,
    /// A free text note.
    #[serde(default)]
    pub description: String,
    /// The category to file the transaction under.
    pub category_id: CategoryId,
}

/// The values the transaction form starts with.
pub struct TransactionFormDefaults<'a> {
    /// The checked transaction type.
    pub transaction_type: TransactionType,
    /// The amount, empty for a new transaction.
    pub amount: Option<f64>,
    /// The date the picker opens on.
    pub date: Date,
    /// The note, empty for a new transaction.
    pub description: Option<&'a str>,
    /// The selected category, if any.
    pub category_id: Option<CategoryId>,
    /// The latest date the picker allows, today in the local timezone.
    pub max_date: Date,
}

/// The inputs shared by the new and edit transaction forms.
///
/// Only `available_categories` are offered in the category select.
pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    available_categories: &[Category],
) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-expense"
                        type="radio"
                        value=(TransactionType::Expense.as_str())
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-income"
                        type="radio"
                        value=(TransactionType::Income.as_str())
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.01"
                    min="0.01"
                    required
                    autofocus
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for category in available_categories {
                    @if Some(category.id) == defaults.category_id {
                        option value=(category.id) selected { (category.name) }
                    } @else {
                        option value=(category.id) { (category.name) }
                    }
                }
            }

            @if available_categories.is_empty() {
                p class="mt-2 text-sm text-gray-500 dark:text-gray-400"
                {
                    "You have no categories yet. "
                    a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE) { "Create a category" }
                    " first."
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::{TransactionFormDefaults, transaction_form_fields};
    use crate::{
        UserID,
        category::{Category, CategoryName},
        test_utils::{get_select_options, get_selected_option, must_get_form},
        transaction::core::TransactionType,
    };

    fn render_fields(
        transaction_type: TransactionType,
        category_id: Option<i64>,
        categories: &[Category],
    ) -> Html {
        let today = date!(2025 - 05 - 05);
        let fields = transaction_form_fields(
            &TransactionFormDefaults {
                transaction_type,
                amount: Some(12.5),
                date: today,
                description: None,
                category_id,
                max_date: today,
            },
            categories,
        );
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }

    #[test]
    fn transaction_form_fields_checks_selected_type() {
        let cases = [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ];

        for (transaction_type, expected) in cases {
            let html = render_fields(transaction_type, None, &[]);
            let selector = Selector::parse("input[type=radio][name=type_]").unwrap();
            let checked = html
                .select(&selector)
                .find(|input| input.value().attr("checked").is_some())
                .and_then(|input| input.value().attr("value"));

            assert_eq!(checked, Some(expected));
        }
    }

    #[test]
    fn amount_is_formatted_with_cents() {
        let html = render_fields(TransactionType::Expense, None, &[]);
        let selector = Selector::parse("input[name=amount]").unwrap();
        let amount = html
            .select(&selector)
            .next()
            .and_then(|input| input.value().attr("value"));

        assert_eq!(amount, Some("12.50"));
    }

    #[test]
    fn category_select_lists_categories_and_marks_default() {
        let categories = [
            Category {
                id: 3,
                name: CategoryName::new_unchecked("Food"),
                user_id: Some(UserID::new(1)),
            },
            Category {
                id: 4,
                name: CategoryName::new_unchecked("Rent"),
                user_id: Some(UserID::new(1)),
            },
        ];

        let html = render_fields(TransactionType::Expense, Some(4), &categories);
        let form = must_get_form(&html);

        assert_eq!(
            get_select_options(&form, "category_id"),
            vec![
                ("".to_owned(), "Select a category".to_owned()),
                ("3".to_owned(), "Food".to_owned()),
                ("4".to_owned(), "Rent".to_owned()),
            ]
        );
        assert_eq!(
            get_selected_option(&form, "category_id"),
            Some("4".to_owned())
        );
    }
}
