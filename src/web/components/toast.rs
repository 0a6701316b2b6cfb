use super::Alert;
use crate::web::state::use_toasts;
use leptos::prelude::*;

/// Stack of transient notifications, newest last.
#[component]
pub fn ToastStack() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="fixed top-4 right-4 z-50 flex w-80 flex-col gap-2">
            <For
                each=move || toasts.items.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class="shadow-md cursor-pointer" on:click=move |_| toasts.dismiss(id)>
                            <Alert kind=toast.kind message=toast.message />
                        </div>
                    }
                }
            />
        </div>
    }
}
