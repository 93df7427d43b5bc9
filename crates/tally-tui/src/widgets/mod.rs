mod counter;
mod stats_page;
mod status_bar;

pub use counter::CounterWidget;
pub use stats_page::StatsPageWidget;
pub use status_bar::StatusBarWidget;
