use super::components::Spinner;
use super::state::use_auth;
use crate::navigation::{GuardDecision, Resolution, Router};
use crate::session::Session;
use leptos::prelude::*;
use leptos_router::{
    hooks::{use_location, use_navigate},
    NavigateOptions,
};

/// Renders `page` only when the route guard allows the current location.
/// While the session initializes a spinner is shown; a signed-out visit to a
/// guarded path records the intent and replaces the location with `/login`.
#[component]
pub fn RouteGate(#[prop(into)] page: ViewFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        let path = location.pathname.get();
        auth.session.with(|session| {
            auth.router
                .with_untracked(|router| router.guard().evaluate(session, &path))
        })
    });

    Effect::new(move |_| {
        if !matches!(decision.get(), GuardDecision::Redirect(_)) {
            return;
        }
        let path = location.pathname.get_untracked();
        let session = auth.session.get_untracked();
        let resolution = auth
            .router
            .try_update(|router| router.navigate(&session, &path));
        if let Some(Resolution::Redirect(intent)) = resolution {
            // UX-only guard; the bill service enforces its own access rules.
            navigate(
                &intent.target_path,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    view! {
        {move || match decision.get() {
            GuardDecision::Allow => page.run(),
            GuardDecision::Suspend | GuardDecision::Redirect(_) => {
                view! {
                    <div class="flex justify-center py-16">
                        <Spinner />
                    </div>
                }
                .into_any()
            }
        }}
    }
}

/// Flag to raise after a successful sign-in. Once the session reports the
/// identity, the recorded intent is consumed and the location is replaced
/// with its destination, or the landing path when none was recorded.
pub fn use_after_login() -> RwSignal<bool> {
    let auth = use_auth();
    let navigate = use_navigate();
    let awaiting = RwSignal::new(false);

    Effect::new(move |_| {
        if !awaiting.get() || !auth.session.with(Session::is_signed_in) {
            return;
        }
        awaiting.set(false);
        if let Some(destination) = auth.router.try_update(Router::after_login) {
            navigate(
                &destination,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    awaiting
}
