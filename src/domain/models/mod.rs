mod action;
mod answer;
mod diagnosis;
mod event;
mod history;
mod loading;
mod question;
mod service;

pub use action::*;
pub use answer::*;
pub use diagnosis::*;
pub use event::*;
pub use history::*;
pub use loading::*;
pub use question::*;
pub use service::*;
