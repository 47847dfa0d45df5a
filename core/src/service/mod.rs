pub mod dto;
pub mod entry_service;
pub mod stats_engine;
