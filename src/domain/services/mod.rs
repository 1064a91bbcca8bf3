pub mod actions;
pub mod events;
mod question_view;
mod result_view;
mod session;

pub use question_view::*;
pub use result_view::*;
pub use session::*;
