//! Notification subsystem: toasts, the confirm dialog and the modal slot

mod confirm;
mod modal;
mod toast;

pub use confirm::{ConfirmChoice, ConfirmDialog};
pub use modal::{Modal, ModalSlot};
pub use toast::{DISPLAY_DURATION, FADE_DURATION, Toast, ToastKind, ToastQueue, ToastView};
