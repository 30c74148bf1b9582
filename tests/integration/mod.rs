mod composer_flow;
mod login_flow;
mod report_flow;
mod tui_app;
