//! Outbound ports - Interfaces that the application requires from external systems

mod key_value_port;
mod processor_port;

pub use key_value_port::{KeyValueStorePort, PersistenceError};
pub use processor_port::{OperationProcessor, ProcessorError};
