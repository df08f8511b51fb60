pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod labels;
pub mod octranspo;
pub mod output;
pub mod pipeline;
pub mod rules;
pub mod stats;
