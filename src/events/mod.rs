pub mod pointer;
pub mod resize;

pub use pointer::PointerBinding;
pub use resize::ResizeBinding;
