use crate::navigation::routes;
use crate::session::AuthError;
use crate::web::components::Button;
use crate::web::guards::use_after_login;
use crate::web::state::{use_auth, use_toasts};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use secrecy::SecretString;

const INPUT_CLASS: &str = "w-full rounded border border-gray-300 p-2 text-gray-950";

#[derive(Clone)]
struct LoginInput {
    email: String,
    password: String,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let awaiting = use_after_login();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let login_action = Action::new_local(move |input: &LoginInput| {
        let input = input.clone();
        let store = auth.store.get_value();
        async move {
            let password = SecretString::from(input.password);
            store.login(input.email.trim(), &password).await
        }
    });

    let federated_action = Action::new_local(move |_: &()| {
        let store = auth.store.get_value();
        async move { store.login_with_federated_provider().await }
    });

    let on_result = move |result: Result<(), AuthError>, success: &str| match result {
        Ok(()) => {
            toasts.success(success);
            awaiting.set(true);
        }
        Err(err) => toasts.error(err.message()),
    };

    Effect::new(move |_| {
        if let Some(result) = login_action.value().get() {
            on_result(result, "Login Successful!");
        }
    });

    Effect::new(move |_| {
        if let Some(result) = federated_action.value().get() {
            on_result(result, "Logged in with Google!");
        }
    });

    let busy = Signal::derive(move || {
        login_action.pending().get() || federated_action.pending().get()
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        login_action.dispatch(LoginInput {
            email: email.get_untracked(),
            password: password.get_untracked(),
        });
    };

    view! {
        <div class="mx-auto max-w-md rounded bg-white p-6 shadow">
            <h2 class="mb-4 text-2xl font-bold text-blue-950">"Login"</h2>
            <form class="space-y-4" on:submit=on_submit>
                <label class="block text-sm font-medium text-gray-800">
                    "Email"
                    <input
                        type="email"
                        class=INPUT_CLASS
                        autocomplete="email"
                        required
                        prop:value=email
                        on:input=move |event| set_email.set(event_target_value(&event))
                    />
                </label>
                <label class="block text-sm font-medium text-gray-800">
                    "Password"
                    <input
                        type="password"
                        class=INPUT_CLASS
                        autocomplete="current-password"
                        required
                        prop:value=password
                        on:input=move |event| set_password.set(event_target_value(&event))
                    />
                </label>
                <Button button_type="submit" disabled=busy>
                    {move || if login_action.pending().get() { "Logging in..." } else { "Login" }}
                </Button>
            </form>
            <div class="my-4 text-center text-sm text-gray-500">"or"</div>
            <button
                type="button"
                class="w-full rounded border border-gray-300 px-4 py-2 font-medium text-gray-900 hover:bg-gray-100 disabled:opacity-50"
                disabled=move || busy.get()
                on:click=move |_| {
                    federated_action.dispatch(());
                }
            >
                "Continue with Google"
            </button>
            <p class="mt-4 text-center text-sm text-gray-700">
                "Don't have an account? "
                <A href=routes::REGISTER {..} class="text-blue-700 hover:underline">
                    "Register"
                </A>
            </p>
        </div>
    }
}
