use super::components::AppShell;
use super::routes::AppRoutes;
use super::state::AuthProvider;
use leptos::prelude::*;
use leptos_router::components::Router;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <AuthProvider>
            <Router>
                <AppShell>
                    <AppRoutes />
                </AppShell>
            </Router>
        </AuthProvider>
    }
}
