//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements          | Connects to                       |
//! |---------------|---------------------|-----------------------------------|
//! | `hardware`    | InputPort           | joysticks, switches, potentiometer |
//! |               | ActuatorPort        | motor controllers, solenoids, relay |
//! | `sim`         | ModePort            | scripted driver station           |
//! |               | device traits       | in-memory devices for `hardware`  |
//! | `log_sink`    | EventSink           | `log` facade                      |
//! | `config_file` | ConfigPort          | TOML file                         |

pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod sim;
