use crate::bills::{format_amount, Bill, PaymentDraft};
use crate::errors::AppError;
use crate::web::browser::today;
use crate::web::components::{Alert, AlertKind, Button, Spinner};
use crate::web::state::{bill_client, use_auth, use_toasts};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone)]
struct BillParams {
    id: Option<String>,
}

const INPUT_CLASS: &str = "w-full rounded border border-gray-300 p-2 text-gray-950";

#[component]
pub fn BillDetailsPage() -> impl IntoView {
    let params = use_params::<BillParams>();
    let bill = LocalResource::new(move || {
        let id = params
            .get()
            .ok()
            .and_then(|params| params.id)
            .unwrap_or_default();
        async move {
            if id.trim().is_empty() {
                return Err(AppError::Validation("Bill id is required.".to_string()));
            }
            bill_client()?.get_bill(&id).await
        }
    });

    view! {
        <Suspense fallback=move || view! { <Spinner /> }>
            {move || match bill.get() {
                Some(Ok(bill)) => view! { <BillDetail bill=bill /> }.into_any(),
                Some(Err(err)) if err.is_not_found() => {
                    view! { <p class="text-gray-700">"Bill not found."</p> }.into_any()
                }
                Some(Err(err)) => {
                    view! { <Alert kind=AlertKind::Error message=err.to_string() /> }.into_any()
                }
                None => view! { <Spinner /> }.into_any(),
            }}
        </Suspense>
    }
}

#[component]
fn BillDetail(bill: Bill) -> impl IntoView {
    let payable = bill.is_payable(today());
    let (show_modal, set_show_modal) = signal(false);
    let bill = StoredValue::new(bill);

    view! {
        <div class="space-y-6">
            <div class="rounded border bg-gray-50 p-4 shadow-sm">
                {bill.with_value(|bill| {
                    view! {
                        <img src=bill.image.clone() alt=bill.title.clone() class="mb-4 h-60 w-full rounded object-cover" />
                        <h2 class="text-2xl font-bold text-gray-950">{bill.title.clone()}</h2>
                        <p class="text-sm text-gray-800">{bill.category.as_str()}</p>
                        <p class="text-sm text-gray-800">{bill.location.clone()}</p>
                        <p class="my-2 text-gray-900">{bill.description.clone()}</p>
                        <p class="text-lg font-bold text-blue-950">{format_amount(bill.amount)}</p>
                        <p class="text-sm text-gray-700">"Date: " {bill.date.clone()}</p>
                    }
                })}
                <button
                    type="button"
                    class="mt-4 rounded px-5 py-2 font-medium text-white"
                    class:bg-green-950=payable
                    class:bg-gray-700=!payable
                    class:cursor-not-allowed=!payable
                    disabled=!payable
                    on:click=move |_| set_show_modal.set(true)
                >
                    {if payable { "Pay Bill" } else { "Pay Only Current Month Bills" }}
                </button>
            </div>
            <Show when=move || show_modal.get()>
                <PayBillModal bill=bill.get_value() on_close=move || set_show_modal.set(false) />
            </Show>
        </div>
    }
}

#[component]
fn PayBillModal(bill: Bill, on_close: impl Fn() + Copy + Send + Sync + 'static) -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let (username, set_username) = signal(String::new());
    let (address, set_address) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let summary = format!("{} ({})", format_amount(bill.amount), bill.date);
    let title = bill.title.clone();
    let category = bill.category.as_str();
    let bill = StoredValue::new(bill);

    let pay_action = Action::new_local(move |draft: &PaymentDraft| {
        let draft = draft.clone();
        async move {
            let email = auth
                .email_untracked()
                .ok_or_else(|| AppError::Validation("You must be logged in to pay bills.".to_string()))?;
            let payment = bill.with_value(|bill| draft.validate(bill, &email, today()))?;
            bill_client()?.pay_bill(&payment).await
        }
    });

    Effect::new(move |_| {
        if let Some(result) = pay_action.value().get() {
            match result {
                Ok(()) => {
                    toasts.success("Bill paid successfully!");
                    on_close();
                }
                Err(AppError::Validation(message)) => toasts.error(message),
                Err(_) => toasts.error("Failed to pay bill."),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        pay_action.dispatch(PaymentDraft {
            username: username.get_untracked(),
            address: address.get_untracked(),
            phone: phone.get_untracked(),
        });
    };

    view! {
        <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/50">
            <div class="w-full max-w-md rounded bg-white p-6 shadow-lg">
                <h3 class="mb-4 text-xl font-bold text-gray-950">"Pay Bill: " {title}</h3>
                <div class="mb-4 rounded border bg-gray-100 p-3 text-sm">
                    <p>"Category: " {category}</p>
                    <p>"Amount and due date: " {summary}</p>
                </div>
                <form class="space-y-3" on:submit=on_submit>
                    <label class="block text-sm font-medium text-gray-800">
                        "Username"
                        <input
                            type="text"
                            class=INPUT_CLASS
                            required
                            on:input=move |event| set_username.set(event_target_value(&event))
                        />
                    </label>
                    <label class="block text-sm font-medium text-gray-800">
                        "Address"
                        <input
                            type="text"
                            class=INPUT_CLASS
                            required
                            on:input=move |event| set_address.set(event_target_value(&event))
                        />
                    </label>
                    <label class="block text-sm font-medium text-gray-800">
                        "Phone"
                        <input
                            type="text"
                            class=INPUT_CLASS
                            required
                            on:input=move |event| set_phone.set(event_target_value(&event))
                        />
                    </label>
                    <div class="mt-3 flex justify-end gap-2">
                        <button
                            type="button"
                            class="rounded bg-gray-700 px-4 py-2 text-white hover:bg-gray-600"
                            on:click=move |_| on_close()
                        >
                            "Cancel"
                        </button>
                        <Button button_type="submit" disabled=pay_action.pending()>
                            {move || if pay_action.pending().get() { "Paying..." } else { "Pay Now" }}
                        </Button>
                    </div>
                </form>
            </div>
        </div>
    }
}
