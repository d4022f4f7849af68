pub mod dialogue;
pub mod event;
pub mod guards;
pub mod machine;
pub mod reactor;
pub mod retry;
pub mod scheduler;
pub mod state;
pub mod telemetry;
pub mod time;
pub mod transition;
