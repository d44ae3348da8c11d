pub mod agent;
pub mod connection;
pub mod connector;
pub mod session;
