//! External delivery channels for store notifications.

pub mod email;
