//! Authenticated page chrome: header, role-based sidebar, and route guard.
//!
//! DESIGN
//! ======
//! Every protected page renders inside `AppShell`, so the redirect rules and
//! the navigation entries live in one place. Content is only rendered while
//! the session satisfies the page's access level.

#[cfg(test)]
#[path = "app_shell_test.rs"]
mod app_shell_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::auth::Session;
use crate::util::auth::{Access, install_route_guard, may_render, sign_out};

/// One sidebar link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavEntry {
    pub href: &'static str,
    pub label: &'static str,
}

const ANALYSIS: NavEntry = NavEntry { href: "/dashboard", label: "Análisis" };
const RESULTS: NavEntry = NavEntry { href: "/resultados", label: "Resultados" };
const FEEDBACKS: NavEntry = NavEntry { href: "/feedbacks", label: "Resultados por Radiólogo" };
const USERS: NavEntry = NavEntry { href: "/usuarios", label: "Usuarios" };

/// Sidebar entries for the signed-in role.
#[must_use]
pub fn nav_entries(session: &Session) -> Vec<NavEntry> {
    if session.is_admin() {
        vec![ANALYSIS, FEEDBACKS, USERS]
    } else {
        vec![ANALYSIS, RESULTS]
    }
}

#[component]
pub fn AppShell(access: Access, #[prop(into)] title: String, children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    install_route_guard(session, access, use_navigate());

    let pathname = use_location().pathname;
    let allowed = move || may_render(&session.get(), access);
    let on_logout = move |_| sign_out(session);

    view! {
        <Show
            when=allowed
            fallback=|| view! { <div class="shell shell--waiting"><p>"Cargando..."</p></div> }
        >
            <div class="shell">
                <header class="shell__header">
                    <span class="shell__brand">"ToraxVIEW"</span>
                    <span class="shell__spacer"></span>
                    <span class="shell__role">{move || session.get().role_label()}</span>
                    <button class="btn shell__logout" on:click=on_logout>
                        "Cerrar sesión"
                    </button>
                </header>
                <div class="shell__body">
                    <nav class="shell__sidebar">
                        {move || {
                            let path = pathname.get();
                            nav_entries(&session.get())
                                .into_iter()
                                .map(|entry| {
                                    view! {
                                        <a
                                            class="shell__link"
                                            class:shell__link--active=path == entry.href
                                            href=entry.href
                                        >
                                            {entry.label}
                                        </a>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </nav>
                    <main class="shell__content">
                        <h1 class="shell__title">{title.clone()}</h1>
                        {children()}
                    </main>
                </div>
            </div>
        </Show>
    }
}
