//! Shared layout wrapper with navigation, auth controls and the toast stack.
//! Navigation remains client-side; the bill service must enforce access control.

use super::ToastStack;
use crate::navigation::routes;
use crate::web::state::{use_auth, use_toasts};
use leptos::{prelude::*, task::spawn_local};
use leptos_router::components::A;

const LINK_CLASS: &str = "block py-2 px-3 text-gray-900 rounded hover:bg-gray-100 md:hover:bg-transparent md:p-0 md:hover:text-blue-700";

/// Wraps the routes with a header and main content container.
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let (menu_open, set_menu_open) = signal(false);
    let auth = use_auth();
    let toasts = use_toasts();
    let is_authenticated = auth.is_authenticated;

    let on_logout = move |_| {
        set_menu_open.set(false);
        let store = auth.store.get_value();
        spawn_local(async move {
            match store.logout().await {
                Ok(()) => toasts.success("Logged out."),
                Err(err) => toasts.error(err.message()),
            }
        });
    };

    view! {
        <div class="min-h-screen flex flex-col bg-gray-100">
            <header class="bg-white border-b border-gray-200">
                <nav class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4">
                    <A href=routes::HOME {..} class="text-xl font-bold text-blue-950">
                        "Billdesk"
                    </A>
                    <button
                        type="button"
                        class="inline-flex items-center p-2 w-10 h-10 justify-center text-sm text-gray-500 rounded-lg md:hidden hover:bg-gray-100"
                        aria-controls="navbar-default"
                        aria-expanded=move || menu_open.get().to_string()
                        on:click=move |_| set_menu_open.update(|open| *open = !*open)
                    >
                        <span class="sr-only">"Open main menu"</span>
                        "☰"
                    </button>
                    <div
                        id="navbar-default"
                        class="w-full md:block md:w-auto"
                        class:hidden=move || !menu_open.get()
                    >
                        <ul class="font-medium flex flex-col p-4 md:p-0 mt-4 md:flex-row md:items-center md:space-x-8 md:mt-0">
                            <li>
                                <A href=routes::HOME {..} class=LINK_CLASS on:click=move |_| set_menu_open.set(false)>
                                    "Home"
                                </A>
                            </li>
                            <li>
                                <A href=routes::BILLS {..} class=LINK_CLASS on:click=move |_| set_menu_open.set(false)>
                                    "Bills"
                                </A>
                            </li>
                            <Show
                                when=move || is_authenticated.get()
                                fallback=move || {
                                    view! {
                                        <li>
                                            <A href=routes::LOGIN {..} class=LINK_CLASS on:click=move |_| set_menu_open.set(false)>
                                                "Login"
                                            </A>
                                        </li>
                                        <li>
                                            <A href=routes::REGISTER {..} class=LINK_CLASS on:click=move |_| set_menu_open.set(false)>
                                                "Register"
                                            </A>
                                        </li>
                                    }
                                }
                            >
                                <li>
                                    <A href=routes::ADD_BILL {..} class=LINK_CLASS on:click=move |_| set_menu_open.set(false)>
                                        "Add Bill"
                                    </A>
                                </li>
                                <li>
                                    <A href=routes::MY_BILLS {..} class=LINK_CLASS on:click=move |_| set_menu_open.set(false)>
                                        "My Bills"
                                    </A>
                                </li>
                                <li class="flex items-center gap-2 py-2 px-3 md:p-0">
                                    {move || {
                                        auth.identity()
                                            .map(|identity| {
                                                let label = identity.label().to_string();
                                                let avatar = identity.avatar_url.clone();
                                                view! {
                                                    {avatar
                                                        .map(|src| {
                                                            view! {
                                                                <img src=src alt="" class="h-8 w-8 rounded-full object-cover" />
                                                            }
                                                        })}
                                                    <span class="text-sm text-gray-700">{label}</span>
                                                }
                                            })
                                    }}
                                </li>
                                <li>
                                    <button type="button" class=LINK_CLASS on:click=on_logout>
                                        "Logout"
                                    </button>
                                </li>
                            </Show>
                        </ul>
                    </div>
                </nav>
            </header>
            <main class="flex-1">
                <div class="container mx-auto p-4 mt-6">{children()}</div>
            </main>
            <footer class="border-t border-gray-200 bg-white py-4 text-center text-sm text-gray-600">
                "Utility Bill Management"
            </footer>
            <ToastStack />
        </div>
    }
}
