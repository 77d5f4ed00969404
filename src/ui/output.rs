//! Build-log line formatting

use super::context::UiContext;
use console::style;

/// Opening banner for the buildpack run.
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{} {}", style("----->").magenta(), style(title).bold());
    }
}

/// Stage banner, one per pipeline stage.
pub fn section(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::step(message).ok();
    } else {
        println!("{} {}", style("----->").magenta(), message);
    }
}

/// Indented detail line under the current stage banner.
pub fn detail(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::info(message).ok();
    } else {
        println!("       {message}");
    }
}

/// Closing success line.
pub fn outro_success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        println!("{} {}", style("----->").magenta(), style(message).green());
    }
}
