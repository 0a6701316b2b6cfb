use crate::bills::{format_amount, Bill, Category};
use crate::navigation::routes;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn BillCard(bill: Bill) -> impl IntoView {
    let href = routes::bill_details(&bill.id);

    view! {
        <div class="rounded-lg border border-gray-200 bg-white p-4 shadow-sm flex flex-col">
            <img src=bill.image alt=bill.title.clone() class="h-40 w-full object-cover mb-3 rounded" />
            <h3 class="text-lg font-semibold text-gray-950">{bill.title}</h3>
            <p class="text-sm text-gray-700">{bill.category.as_str()}</p>
            <p class="text-sm text-gray-700">{bill.location}</p>
            <p class="font-bold text-blue-950 mt-1">{format_amount(bill.amount)}</p>
            <p class="text-xs text-gray-600">"Date: " {bill.date}</p>
            <A
                href=href
                {..}
                class="mt-auto pt-3 text-sm font-medium text-blue-700 hover:underline"
            >
                "See Details"
            </A>
        </div>
    }
}

/// Category pills; `None` shows every category.
#[component]
pub fn CategoryFilter(selected: RwSignal<Option<Category>>) -> impl IntoView {
    let pill = move |label: &'static str, value: Option<Category>| {
        view! {
            <button
                type="button"
                class="rounded-full border px-4 py-1 text-sm"
                class:bg-blue-950=move || selected.get() == value
                class:text-white=move || selected.get() == value
                on:click=move |_| selected.set(value)
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="flex flex-wrap gap-2">
            {pill("All", None)}
            {Category::ALL
                .into_iter()
                .map(|category| pill(category.as_str(), Some(category)))
                .collect_view()}
        </div>
    }
}
