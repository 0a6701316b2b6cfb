use crate::bills::{BillDraft, Category};
use crate::errors::AppError;
use crate::navigation::routes;
use crate::web::browser::today;
use crate::web::components::Button;
use crate::web::state::{bill_client, use_auth, use_toasts};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

const INPUT_CLASS: &str = "w-full rounded border border-gray-300 p-2 text-gray-950";

#[component]
pub fn AddBillPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let form = RwSignal::new(BillDraft::for_date(today()));

    let add_action = Action::new_local(move |draft: &BillDraft| {
        let draft = draft.clone();
        async move {
            let email = auth
                .email_untracked()
                .ok_or_else(|| AppError::Validation("You must be logged in to add bills.".to_string()))?;
            let bill = draft.validate(&email)?;
            bill_client()?.create_bill(&bill).await
        }
    });

    Effect::new(move |_| {
        if let Some(result) = add_action.value().get() {
            match result {
                Ok(()) => {
                    toasts.success("Bill added successfully!");
                    navigate(routes::BILLS, Default::default());
                }
                Err(AppError::Validation(message)) => toasts.error(message),
                Err(_) => toasts.error("Failed to add bill. Please try again."),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        add_action.dispatch(form.get_untracked());
    };

    view! {
        <div class="mx-auto max-w-2xl">
            <h2 class="mb-4 text-2xl font-bold text-blue-950">"Add New Bill"</h2>
            <form class="space-y-4 rounded bg-gray-50 p-4 shadow" on:submit=on_submit>
                <input
                    class=INPUT_CLASS
                    placeholder="Bill Title"
                    required
                    prop:value=move || form.with(|form| form.title.clone())
                    on:input=move |event| form.update(|form| form.title = event_target_value(&event))
                />
                <select
                    class=INPUT_CLASS
                    on:change=move |event| {
                        if let Some(category) = Category::parse(&event_target_value(&event)) {
                            form.update(|form| form.category = category);
                        }
                    }
                >
                    {Category::ALL
                        .into_iter()
                        .map(|category| {
                            view! {
                                <option
                                    value=category.as_str()
                                    selected=move || form.with(|form| form.category == category)
                                >
                                    {category.as_str()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <input
                    class=INPUT_CLASS
                    type="number"
                    step="any"
                    placeholder="Amount (৳)"
                    required
                    prop:value=move || form.with(|form| form.amount.clone())
                    on:input=move |event| form.update(|form| form.amount = event_target_value(&event))
                />
                <input
                    class=INPUT_CLASS
                    placeholder="Location (e.g. Mirpur-10, Dhaka)"
                    required
                    prop:value=move || form.with(|form| form.location.clone())
                    on:input=move |event| form.update(|form| form.location = event_target_value(&event))
                />
                <input
                    class=INPUT_CLASS
                    type="date"
                    required
                    prop:value=move || form.with(|form| form.date.clone())
                    on:input=move |event| form.update(|form| form.date = event_target_value(&event))
                />
                <input
                    class=INPUT_CLASS
                    placeholder="Image URL (optional)"
                    prop:value=move || form.with(|form| form.image.clone())
                    on:input=move |event| form.update(|form| form.image = event_target_value(&event))
                />
                <textarea
                    class=INPUT_CLASS
                    placeholder="Description"
                    rows="4"
                    required
                    prop:value=move || form.with(|form| form.description.clone())
                    on:input=move |event| {
                        form.update(|form| form.description = event_target_value(&event))
                    }
                ></textarea>
                <div class="flex items-center justify-between">
                    <div class="text-sm text-gray-600">
                        "Added by: "
                        {move || auth.identity().map(|identity| identity.email).unwrap_or_default()}
                    </div>
                    <Button button_type="submit" disabled=add_action.pending()>
                        {move || if add_action.pending().get() { "Adding..." } else { "Add Bill" }}
                    </Button>
                </div>
            </form>
        </div>
    }
}
