pub mod artefact;
pub mod calendar;
pub mod operator;
pub mod realtime;
pub mod route;
pub mod service;
pub mod stop;
