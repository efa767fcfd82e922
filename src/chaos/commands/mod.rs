//! Concrete [`super::command::ChaosCommand`] implementations.

pub mod kill;
pub mod netem;
pub mod pause;
pub mod remove;
pub mod stop;

pub use kill::Kill;
pub use pause::Pause;
pub use remove::Remove;
pub use stop::Stop;
