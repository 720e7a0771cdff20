mod authn;
mod authz;
mod context;
mod db;
mod handlers;
mod response;

pub mod config;
pub mod factory;
pub mod restful;
