pub mod keyboard;
pub mod keymap;
pub mod pointer;

pub use keyboard::wire_global_keydown;
pub use pointer::{wire_calipers, wire_lead_selection};
