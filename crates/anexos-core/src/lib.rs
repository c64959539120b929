pub mod config;
pub mod logging;

pub mod archive;
pub mod checksum;
pub mod downloader;
pub mod extract;
pub mod fetcher;
pub mod http;
pub mod label;
pub mod pipeline;
pub mod storage;
