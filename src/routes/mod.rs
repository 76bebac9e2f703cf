pub(crate) mod auth;
pub(crate) mod auth_email;
pub(crate) mod auth_forget;
pub(crate) mod auth_phone;
pub(crate) mod auth_username;
