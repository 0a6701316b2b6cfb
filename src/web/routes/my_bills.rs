use crate::bills::{
    format_amount, Payment, PaymentReport, PaymentSummary, PaymentUpdateDraft, REPORT_FILE_NAME,
    REPORT_MIME,
};
use crate::errors::AppError;
use crate::web::browser::{confirm, download};
use crate::web::components::{Alert, AlertKind, Button, Spinner};
use crate::web::state::{bill_client, use_auth, use_toasts};
use leptos::ev::SubmitEvent;
use leptos::{prelude::*, task::spawn_local};

const INPUT_CLASS: &str = "w-full rounded border border-gray-300 p-2 text-gray-950";

#[component]
pub fn MyBillsPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let editing = RwSignal::new(None::<Payment>);

    let payments = LocalResource::new(move || {
        let email = auth.identity().map(|identity| identity.email);
        async move {
            match email {
                Some(email) => bill_client()?.list_payments(&email).await,
                None => Ok(Vec::new()),
            }
        }
    });

    let on_delete = move |id: String| {
        if !confirm("Are you sure you want to delete this bill?") {
            return;
        }
        spawn_local(async move {
            let result = match bill_client() {
                Ok(client) => client.delete_payment(&id).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => {
                    toasts.success("Bill deleted successfully.");
                    payments.refetch();
                }
                Err(_) => toasts.error("Failed to delete bill."),
            }
        });
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold text-blue-950">"My Pay Bills"</h1>
            <Suspense fallback=move || view! { <Spinner /> }>
                {move || match payments.get() {
                    Some(Ok(list)) => {
                        let summary = PaymentSummary::from_payments(&list);
                        let report = StoredValue::new(PaymentReport::from_payments(&list));
                        let on_download = move |_| {
                            let saved = report
                                .with_value(PaymentReport::to_pdf)
                                .and_then(|bytes| download(&bytes, REPORT_FILE_NAME, REPORT_MIME));
                            if let Err(err) = saved {
                                tracing::warn!(error = %err, "report download failed");
                                toasts.error("Failed to download report.");
                            }
                        };
                        view! {
                            <div class="flex flex-wrap items-center gap-6 rounded bg-white p-4 shadow-sm">
                                <p>"Total Bills Paid: " <span class="font-bold">{summary.count}</span></p>
                                <p>"Total Amount: " <span class="font-bold">{format_amount(summary.total)}</span></p>
                                <button
                                    type="button"
                                    class="ml-auto rounded bg-blue-950 px-4 py-2 text-white hover:bg-blue-900"
                                    on:click=on_download
                                >
                                    "Download Report"
                                </button>
                            </div>
                            <div class="overflow-x-auto">
                                <table class="min-w-full border bg-white text-sm">
                                    <thead class="bg-blue-950 text-white">
                                        <tr>
                                            <th class="p-2 text-left">"Username"</th>
                                            <th class="p-2 text-left">"Email"</th>
                                            <th class="p-2 text-left">"Amount"</th>
                                            <th class="p-2 text-left">"Address"</th>
                                            <th class="p-2 text-left">"Phone"</th>
                                            <th class="p-2 text-left">"Date"</th>
                                            <th class="p-2 text-left">"Actions"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {list
                                            .into_iter()
                                            .map(|payment| {
                                                let id = payment.id.clone();
                                                let edit = payment.clone();
                                                view! {
                                                    <tr class="border-t">
                                                        <td class="p-2">{payment.username}</td>
                                                        <td class="p-2">{payment.email}</td>
                                                        <td class="p-2">{format_amount(payment.amount)}</td>
                                                        <td class="p-2">{payment.address}</td>
                                                        <td class="p-2">{payment.phone}</td>
                                                        <td class="p-2">{payment.date}</td>
                                                        <td class="space-x-2 p-2">
                                                            <button
                                                                type="button"
                                                                class="rounded bg-blue-950 px-3 py-1 text-white hover:bg-blue-900"
                                                                on:click=move |_| editing.set(Some(edit.clone()))
                                                            >
                                                                "Update"
                                                            </button>
                                                            <button
                                                                type="button"
                                                                class="rounded bg-red-800 px-3 py-1 text-white hover:bg-red-700"
                                                                on:click=move |_| on_delete(id.clone())
                                                            >
                                                                "Delete"
                                                            </button>
                                                        </td>
                                                    </tr>
                                                }
                                            })
                                            .collect_view()}
                                    </tbody>
                                </table>
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
            {move || {
                editing
                    .get()
                    .map(|payment| {
                        view! {
                            <UpdatePaymentModal
                                payment=payment
                                on_close=move || editing.set(None)
                                on_saved=move || payments.refetch()
                            />
                        }
                    })
            }}
        </div>
    }
}

#[component]
fn UpdatePaymentModal(
    payment: Payment,
    on_close: impl Fn() + Copy + Send + Sync + 'static,
    on_saved: impl Fn() + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let toasts = use_toasts();
    let form = RwSignal::new(PaymentUpdateDraft::from_payment(&payment));
    let id = StoredValue::new(payment.id);

    let update_action = Action::new_local(move |draft: &PaymentUpdateDraft| {
        let draft = draft.clone();
        async move {
            let update = draft.validate()?;
            bill_client()?
                .update_payment(&id.get_value(), &update)
                .await
        }
    });

    Effect::new(move |_| {
        if let Some(result) = update_action.value().get() {
            match result {
                Ok(()) => {
                    toasts.success("Bill updated successfully.");
                    on_close();
                    on_saved();
                }
                Err(AppError::Validation(message)) => toasts.error(message),
                Err(_) => toasts.error("Failed to update bill."),
            }
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        update_action.dispatch(form.get_untracked());
    };

    view! {
        <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/50">
            <div class="w-full max-w-md rounded bg-white p-6 shadow-lg">
                <h3 class="mb-4 text-xl font-bold text-gray-950">"Update Bill"</h3>
                <form class="space-y-3" on:submit=on_submit>
                    <input
                        class=INPUT_CLASS
                        type="number"
                        step="any"
                        placeholder="Amount"
                        required
                        prop:value=move || form.with(|form| form.amount.clone())
                        on:input=move |event| form.update(|form| form.amount = event_target_value(&event))
                    />
                    <input
                        class=INPUT_CLASS
                        placeholder="Address"
                        required
                        prop:value=move || form.with(|form| form.address.clone())
                        on:input=move |event| form.update(|form| form.address = event_target_value(&event))
                    />
                    <input
                        class=INPUT_CLASS
                        placeholder="Phone"
                        required
                        prop:value=move || form.with(|form| form.phone.clone())
                        on:input=move |event| form.update(|form| form.phone = event_target_value(&event))
                    />
                    <input
                        class=INPUT_CLASS
                        type="date"
                        required
                        prop:value=move || form.with(|form| form.date.clone())
                        on:input=move |event| form.update(|form| form.date = event_target_value(&event))
                    />
                    <div class="mt-3 flex justify-end gap-2">
                        <button
                            type="button"
                            class="rounded bg-gray-700 px-4 py-2 text-white hover:bg-gray-600"
                            on:click=move |_| on_close()
                        >
                            "Cancel"
                        </button>
                        <Button button_type="submit" disabled=update_action.pending()>
                            "Update"
                        </Button>
                    </div>
                </form>
            </div>
        </div>
    }
}
