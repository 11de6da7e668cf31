pub mod rate_frame;
pub mod traffic_frame;
