/// session logging: terminal + append-only log file, tool events
pub mod logger;
