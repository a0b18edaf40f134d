pub mod adapter;
pub mod client;
pub mod config;
pub mod records;

pub use adapter::ODataLeaderboardSource;
pub use client::{ODataClient, ODataError, QueryOptions};
pub use config::ODataConfig;
