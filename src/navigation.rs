//! The navigation bar: a top bar on desktop and a bottom bar on mobile.

use maud::{Markup, html};

use crate::endpoints;

/// The sections of the app in the order they appear in the navigation bar.
const SECTIONS: [(&str, &str); 6] = [
    (endpoints::WALLETS_VIEW, "Wallets"),
    (endpoints::TRANSACTIONS_VIEW, "Transactions"),
    (endpoints::CATEGORIES_VIEW, "Categories"),
    (endpoints::GOALS_VIEW, "Goals"),
    (endpoints::OBJECTIVES_VIEW, "Objectives"),
    (endpoints::REPORTS_VIEW, "Reports"),
];

/// Sections shown directly in the mobile bar. The rest sit under "More".
const MOBILE_SECTIONS: [&str; 3] = [
    endpoints::WALLETS_VIEW,
    endpoints::TRANSACTIONS_VIEW,
    endpoints::REPORTS_VIEW,
];

const DESKTOP_LINK: &str = "block py-2 px-3 lg:p-0 rounded-sm";
const DESKTOP_LINK_CURRENT: &str = "text-white bg-blue-700 lg:bg-transparent \
    lg:text-blue-700 dark:text-white lg:dark:text-blue-500";
const DESKTOP_LINK_OTHER: &str = "text-gray-900 hover:bg-gray-100 lg:hover:bg-transparent \
    lg:hover:text-blue-700 dark:text-white dark:hover:bg-gray-700 \
    lg:dark:hover:text-blue-500 lg:dark:hover:bg-transparent";

const MOBILE_TAB: &str = "flex w-full min-w-0 items-center justify-center rounded-lg \
    px-2.5 py-2 sm:px-4 text-xs sm:text-sm font-semibold leading-tight cursor-pointer";
const MOBILE_MENU_ITEM: &str = "block rounded-lg px-3 py-2";
const MOBILE_CURRENT: &str = "bg-blue-50 text-blue-700 shadow-sm \
    dark:bg-blue-900/30 dark:text-blue-200";
const MOBILE_OTHER: &str = "text-gray-600 hover:bg-blue-50/70 hover:text-blue-700 \
    dark:text-gray-300 dark:hover:bg-blue-900/20 dark:hover:text-blue-200";

#[derive(Clone, Copy)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn is_on_mobile_bar(&self) -> bool {
        MOBILE_SECTIONS.iter().any(|url| *url == self.url)
    }

    fn aria_current(&self) -> Option<&'static str> {
        self.is_current.then_some("page")
    }
}

fn classes(base: &str, is_current: bool, current: &str, other: &str) -> String {
    format!("{base} {}", if is_current { current } else { other })
}

/// The first path segment, e.g. "/goals" for "/goals/{goal_id}/edit".
fn section_of(endpoint: &str) -> &str {
    let rest = endpoint.strip_prefix('/').unwrap_or(endpoint);
    let length = rest.find('/').map_or(endpoint.len(), |index| index + 1);

    &endpoint[..length]
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// The navigation bar for a page served from `endpoint`.
    ///
    /// The section `endpoint` belongs to is highlighted, so the edit and
    /// create pages of a section light up their list page's link.
    pub fn new(endpoint: &str) -> NavBar<'static> {
        let section = section_of(endpoint);

        let mut links: Vec<Link<'static>> = SECTIONS
            .into_iter()
            .map(|(url, title)| Link {
                url,
                title,
                is_current: url == section,
            })
            .collect();
        links.push(Link {
            url: endpoints::LOG_OUT,
            title: "Log out",
            is_current: false,
        });

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html! {
            (self.desktop_bar())
            (self.mobile_bar())
        }
    }

    fn desktop_bar(&self) -> Markup {
        html! {
            nav class="bg-white border-gray-200 dark:bg-gray-900" {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4" {
                    a href=(endpoints::ROOT) class="flex items-center gap-3" {
                        img src="/static/favicon-128x128.png" alt="Pocketbook Logo" class="h-8";
                        span class="text-2xl font-semibold whitespace-nowrap dark:text-white" {
                            "Pocketbook"
                        }
                    }

                    ul class="hidden lg:flex flex-row gap-8 font-medium" {
                        @for link in &self.links {
                            li {
                                a
                                    href=(link.url)
                                    class=(classes(DESKTOP_LINK, link.is_current, DESKTOP_LINK_CURRENT, DESKTOP_LINK_OTHER))
                                    aria-current=[link.aria_current()]
                                { (link.title) }
                            }
                        }
                    }
                }
            }
        }
    }

    fn mobile_bar(&self) -> Markup {
        let (tabs, menu): (Vec<Link<'_>>, Vec<Link<'_>>) =
            self.links.iter().copied().partition(|link| link.is_on_mobile_bar());
        let menu_is_current = menu.iter().any(|link| link.is_current);

        html! {
            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden" {
                ul
                    aria-label="Primary"
                    class="mx-4 mb-4 grid grid-cols-4 gap-2 px-4 py-3 rounded-xl border border-gray-200 \
                        bg-white/95 shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                {
                    @for link in &tabs {
                        li class="min-w-0" {
                            a
                                href=(link.url)
                                class=(classes(MOBILE_TAB, link.is_current, MOBILE_CURRENT, MOBILE_OTHER))
                                aria-current=[link.aria_current()]
                            {
                                span class="truncate" { (link.title) }
                            }
                        }
                    }

                    li class="min-w-0" {
                        details class="relative" {
                            summary
                                class={ "list-none " (classes(MOBILE_TAB, menu_is_current, MOBILE_CURRENT, MOBILE_OTHER)) }
                                aria-current=[menu_is_current.then_some("page")]
                            {
                                span class="truncate" { "More" }
                            }

                            ul class="absolute bottom-full right-0 mb-3 w-40 p-2 flex flex-col gap-1 \
                                rounded-xl border border-gray-200 bg-white/95 shadow-xl text-sm \
                                dark:border-gray-700 dark:bg-gray-900/95"
                            {
                                @for link in &menu {
                                    li {
                                        a
                                            href=(link.url)
                                            class=(classes(MOBILE_MENU_ITEM, link.is_current, MOBILE_CURRENT, MOBILE_OTHER))
                                            aria-current=[link.aria_current()]
                                        { (link.title) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
