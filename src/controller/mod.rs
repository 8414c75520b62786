// CONTROLLER: input mapping and the per-frame update loop
pub mod input;
pub mod frame_loop;

pub use input::{KeyBindings, NavCommand};
pub use frame_loop::{FrameClock, FrameDriver, FrameReport};
