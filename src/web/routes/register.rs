use crate::navigation::routes;
use crate::session::{AuthError, Registration};
use crate::web::components::Button;
use crate::web::guards::use_after_login;
use crate::web::state::{use_auth, use_toasts};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use secrecy::SecretString;

const INPUT_CLASS: &str = "w-full rounded border border-gray-300 p-2 text-gray-950";

#[derive(Clone)]
struct RegisterInput {
    name: String,
    email: String,
    password: String,
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let awaiting = use_after_login();
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let register_action = Action::new_local(move |input: &RegisterInput| {
        let input = input.clone();
        let store = auth.store.get_value();
        async move {
            let password = SecretString::from(input.password);
            store
                .register(input.email.trim(), &password, input.name.trim())
                .await
        }
    });

    Effect::new(move |_| {
        let Some(result) = register_action.value().get() else {
            return;
        };
        match result {
            Ok(registration) => {
                toasts.success("Registration successful!");
                notify_display_name(&registration, |message| toasts.info(message));
                awaiting.set(true);
            }
            Err(err) => toasts.error(err.message()),
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        register_action.dispatch(RegisterInput {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        });
    };

    view! {
        <div class="mx-auto max-w-md rounded bg-white p-6 shadow">
            <h2 class="mb-4 text-2xl font-bold text-blue-950">"Register"</h2>
            <form class="space-y-4" on:submit=on_submit>
                <label class="block text-sm font-medium text-gray-800">
                    "Name"
                    <input
                        type="text"
                        class=INPUT_CLASS
                        autocomplete="name"
                        required
                        prop:value=name
                        on:input=move |event| set_name.set(event_target_value(&event))
                    />
                </label>
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
                        autocomplete="new-password"
                        required
                        prop:value=password
                        on:input=move |event| set_password.set(event_target_value(&event))
                    />
                </label>
                <Button button_type="submit" disabled=register_action.pending()>
                    {move || {
                        if register_action.pending().get() { "Creating account..." } else { "Register" }
                    }}
                </Button>
            </form>
            <p class="mt-4 text-center text-sm text-gray-700">
                "Already have an account? "
                <A href=routes::LOGIN {..} class="text-blue-700 hover:underline">
                    "Login"
                </A>
            </p>
        </div>
    }
}

fn notify_display_name(registration: &Registration, notify: impl Fn(String)) {
    if let Some(err) = registration.display_name_error.as_ref().map(AuthError::message) {
        notify(format!("Account created, but the name was not saved: {err}"));
    }
}
