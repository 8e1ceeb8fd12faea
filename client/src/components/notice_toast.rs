//! Transient notice banner.

use leptos::prelude::*;

use crate::app::Clock;
use crate::state::notice::NoticeQueue;

/// Drop expired notices on every clock tick. The signal is only written when
/// something actually expired.
pub fn install_notice_expiry(clock: Clock, notices: RwSignal<NoticeQueue>) {
    Effect::new(move || {
        let now = clock.get();
        let mut queue = notices.get_untracked();
        if queue.expire(now) > 0 {
            notices.set(queue);
        }
    });
}

/// Shows the newest notice of `notices` with a close button.
#[component]
pub fn NoticeToast(#[prop(into)] notices: Signal<NoticeQueue>, on_dismiss: Callback<u64>) -> impl IntoView {
    view! {
        {move || {
            notices
                .get()
                .current()
                .cloned()
                .map(|notice| {
                    let id = notice.id;
                    view! {
                        <div class=notice.kind.css_class() role="status">
                            <span class="toast__text">{notice.text}</span>
                            <button class="toast__close" on:click=move |_| on_dismiss.run(id)>
                                "×"
                            </button>
                        </div>
                    }
                })
        }}
    }
}
