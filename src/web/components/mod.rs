//! Shared UI components exported for routes.

mod alert;
mod app_shell;
mod bill_card;
mod button;
mod spinner;
mod toast;

pub(crate) use alert::{Alert, AlertKind};
pub(crate) use app_shell::AppShell;
pub(crate) use bill_card::{BillCard, CategoryFilter};
pub(crate) use button::Button;
pub(crate) use spinner::Spinner;
pub(crate) use toast::ToastStack;
