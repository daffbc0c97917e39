//! Application ports.

mod tracker_listener_port;

pub use tracker_listener_port::{RecordingListener, TrackerListener};
