pub mod bookmark_tree;
pub mod builder;
pub mod candidate;
pub mod config;
pub mod contract;
pub mod highlight;
pub mod host;
pub mod logging;
pub mod matcher;
pub mod mode;
pub mod model;
pub mod render;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod transport;
