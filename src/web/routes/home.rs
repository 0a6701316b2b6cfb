use crate::bills::{BillQuery, Category};
use crate::web::components::{Alert, AlertKind, BillCard, CategoryFilter, Spinner};
use crate::web::state::bill_client;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    let category = RwSignal::new(None::<Category>);
    let recent = LocalResource::new(move || {
        let query = BillQuery::recent(category.get());
        async move { bill_client()?.list_bills(query).await }
    });

    view! {
        <div class="space-y-8">
            <section class="rounded-lg bg-blue-950 px-6 py-12 text-center text-white">
                <h1 class="text-3xl font-bold">"Welcome to Utility Bill Management"</h1>
                <p class="mt-2 text-blue-100">
                    "Track, pay and manage your electricity, gas, water and internet bills."
                </p>
            </section>
            <section class="space-y-3">
                <h2 class="text-xl font-semibold text-gray-950">"Categories"</h2>
                <CategoryFilter selected=category />
            </section>
            <section class="space-y-3">
                <h2 class="text-xl font-semibold text-gray-950">"Recent Bills"</h2>
                <Suspense fallback=move || view! { <Spinner /> }>
                    {move || match recent.get() {
                        Some(Ok(bills)) if bills.is_empty() => {
                            view! { <p class="text-gray-700">"No recent bills found."</p> }.into_any()
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
            </section>
        </div>
    }
}
