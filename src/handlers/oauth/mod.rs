pub mod callback_handler;
pub mod login_handler;
pub mod logout_handler;

pub use callback_handler::callback_handler;
pub use login_handler::login_handler;
pub use logout_handler::logout_handler;
