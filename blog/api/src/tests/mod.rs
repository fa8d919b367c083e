mod config;
mod database;
mod global;
