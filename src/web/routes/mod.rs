mod add_bill;
mod bill_details;
mod bills;
mod home;
mod login;
mod my_bills;
mod not_found;
mod register;

use add_bill::AddBillPage;
use bill_details::BillDetailsPage;
use bills::BillsPage;
use home::HomePage;
use login::LoginPage;
use my_bills::MyBillsPage;
use not_found::NotFoundPage;
use register::RegisterPage;

use super::guards::RouteGate;
use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

/// Every view goes through the gate; only the guarded paths ever suspend or
/// redirect.
#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=|| view! { <RouteGate page=HomePage /> } />
            <Route path=path!("/bills") view=|| view! { <RouteGate page=BillsPage /> } />
            <Route path=path!("/bills/:id") view=|| view! { <RouteGate page=BillDetailsPage /> } />
            <Route path=path!("/add-bill") view=|| view! { <RouteGate page=AddBillPage /> } />
            <Route path=path!("/my-bills") view=|| view! { <RouteGate page=MyBillsPage /> } />
            <Route path=path!("/login") view=|| view! { <RouteGate page=LoginPage /> } />
            <Route path=path!("/register") view=|| view! { <RouteGate page=RegisterPage /> } />
        </Routes>
    }
}
