//! tokenwatch: detects crypto token mentions in webhook transcripts and
//! serves market analyses for them.

pub mod analysis;
pub mod apis;
pub mod arguments;
pub mod cache;
pub mod clock;
pub mod config;
pub mod errors;
pub mod logger;
pub mod marketdata;
pub mod paths;
pub mod storage;
pub mod tokens;
pub mod webserver;
