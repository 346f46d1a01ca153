//! User accounts, passwords and cookie sessions.

mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod session;
mod user;

pub use forgot_password::get_forgot_password_page;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{SessionConfig, session_guard, session_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use redirect::{log_in_url_for, normalize_redirect_url};
pub use register_user::{get_register_page, register_user};
pub use session::{REMEMBERED_SESSION_LENGTH, SESSION_LENGTH, end_session, start_session};
pub use user::{
    User, UserID, create_user, create_user_table, get_user_by_email, get_user_by_id,
    update_password,
};

#[cfg(test)]
pub(crate) use session::SESSION_COOKIE;
