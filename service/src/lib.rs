pub mod client;
pub mod manager;
pub mod watch;

#[cfg(test)]
mod testing;

pub mod prelude {
    #[rustfmt::skip]
    pub use super::{
        client::SlurmClient,
        manager::{JobManager, NodeManager, ResourceManager},
        watch::{WatchDefaults, DEFAULT_BUFFER, DEFAULT_POLL_INTERVAL},
    };
}
