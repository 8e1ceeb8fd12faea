//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::pages::{
    dashboard::DashboardPage, feedbacks::FeedbacksPage, login::LoginPage, results::ResultsPage, users::UsersPage,
};
use crate::state::auth::Session;
#[cfg(feature = "hydrate")]
use crate::util::storage::BrowserStorage;

/// App-wide clock advanced by a single periodic tick. Pages read it inside
/// effects to expire notices and fire delayed actions.
#[derive(Clone, Copy)]
pub struct Clock(RwSignal<u64>);

impl Clock {
    /// Current tick time in milliseconds; tracked.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="es">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session, config, and clock contexts and sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::load();
    let session = RwSignal::new(Session::restoring());
    let clock = Clock(RwSignal::new(0));

    provide_context(config);
    provide_context(session);
    provide_context(clock);

    #[cfg(feature = "hydrate")]
    {
        // After hydration so the first client render matches the server's.
        Effect::new(move || {
            let restored = Session::hydrate(&BrowserStorage);
            log::debug!("session restored: authenticated={}", restored.is_authenticated());
            session.set(restored);
        });

        let alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let alive_task = alive.clone();
        leptos::task::spawn_local(async move {
            while alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                clock.0.set(crate::util::format::now_ms());
                gloo_timers::future::TimeoutFuture::new(crate::config::TICK_INTERVAL_MS).await;
            }
        });
        on_cleanup(move || alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/toraxview.css"/>
        <Title text="ToraxVIEW"/>

        <Router>
            <Routes fallback=|| "Página no encontrada.".into_view()>
                <Route path=StaticSegment("") view=LoginPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=StaticSegment("resultados") view=ResultsPage/>
                <Route path=StaticSegment("usuarios") view=UsersPage/>
                <Route path=StaticSegment("feedbacks") view=FeedbacksPage/>
            </Routes>
        </Router>
    }
}
