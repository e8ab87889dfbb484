mod system_handler;

pub use system_handler::{__path_get_instance, __path_health, get_instance, health};
