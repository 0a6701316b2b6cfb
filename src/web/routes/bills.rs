use crate::bills::{BillQuery, Category};
use crate::web::components::{Alert, AlertKind, BillCard, CategoryFilter, Spinner};
use crate::web::state::bill_client;
use leptos::prelude::*;

#[component]
pub fn BillsPage() -> impl IntoView {
    let category = RwSignal::new(None::<Category>);
    let bills = LocalResource::new(move || {
        let query = BillQuery::all(category.get());
        async move { bill_client()?.list_bills(query).await }
    });

    view! {
        <div class="space-y-6">
            <div class="flex flex-col gap-3 md:flex-row md:items-center md:justify-between">
                <h1 class="text-2xl font-bold text-blue-950">"All Bills"</h1>
                <CategoryFilter selected=category />
            </div>
            <Suspense fallback=move || view! { <Spinner /> }>
                {move || match bills.get() {
                    Some(Ok(bills)) if bills.is_empty() => {
                        view! { <p class="text-gray-700">"No bills found."</p> }.into_any()
                    }
                    Some(Ok(bills)) => {
                        view! {
                            <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                                {bills
                                    .into_iter()
                                    .map(|bill| view! { <BillCard bill=bill /> })
                                    .collect_view()}
                            </div>
                        }
                        .into_any()
                    }
                    Some(Err(err)) => {
                        view! { <Alert kind=AlertKind::Error message=err.to_string() /> }.into_any()
                    }
                    None => view! { <Spinner /> }.into_any(),
                }}
            </Suspense>
        </div>
    }
}
