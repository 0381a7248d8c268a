pub mod app;
pub mod clock;
pub mod shortcuts;
pub mod view;
