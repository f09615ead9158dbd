//! `oritrack-middleware` – Event routing and external boundaries.
//!
//! Routes asynchronous data between the sensor pipeline, the control
//! surface, and external clients without caring about the data's meaning.
//!
//! # Modules
//!
//! - [`bus`] – Topic-based publish/subscribe event bus built on Tokio
//!   broadcast channels.
//! - [`sink`] – [`DeliverySink`][sink::DeliverySink]: the boundary trait a
//!   delivery backend implements to receive orientation deltas.

pub mod bus;
pub mod sink;

pub use bus::{EventBus, Topic, TopicReceiver};
pub use sink::DeliverySink;
