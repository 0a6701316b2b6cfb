use crate::navigation::routes;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[50vh] text-center">
            <h1 class="text-5xl font-bold text-blue-950">"404"</h1>
            <p class="mt-2 text-gray-700">"The page you are looking for does not exist."</p>
            <A href=routes::HOME {..} class="mt-6 rounded bg-blue-950 px-5 py-2 text-white hover:bg-blue-900">
                "Back to Home"
            </A>
        </div>
    }
}
