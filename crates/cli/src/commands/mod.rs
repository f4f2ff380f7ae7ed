pub mod agent;
pub mod ask;
pub mod calc;
pub mod config_cmd;
pub mod doc;
pub mod doctor;
pub mod evals;
pub mod logs;
pub mod onboard;
pub mod query;
pub mod retrieve;
