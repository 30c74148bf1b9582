pub mod app;
pub mod components;
pub mod composer_view;
pub mod events;
pub mod layout;
pub mod login_view;
pub mod report_view;
pub mod view;

pub use app::{run_app, Screen, SocialTuiApp};
pub use view::{Command, View};
