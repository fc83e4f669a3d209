pub mod configuration;
pub mod controller;
pub mod data_capture;
pub mod error_handling;
pub mod logging;
pub mod notification;
pub mod post_processing;
pub mod session_management;
pub mod storage;
pub mod twitch_api;
