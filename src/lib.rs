pub mod config;
pub mod formats;
pub mod observability;
pub mod remote;
pub mod storage;
pub mod value;
