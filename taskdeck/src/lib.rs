//! `taskdeck`: local-first task manager library.

pub mod api;
pub mod app;
pub mod config;
pub mod form;
pub mod notify;
pub mod persist;
pub mod storage;
pub mod tasks;
pub mod view;
