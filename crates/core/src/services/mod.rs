pub mod download;
pub mod extract;
pub mod filter;
pub mod index;
pub mod pipeline;
pub mod report;
pub mod transport;
