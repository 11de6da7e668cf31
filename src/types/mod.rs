pub mod aggregates;
pub mod day_window;
pub mod describe;
pub mod exchange_rate;
pub mod frames;
pub mod traffic_record;
