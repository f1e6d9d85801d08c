mod acknowledgment;
mod config;
mod state;
mod store;
mod wire;
