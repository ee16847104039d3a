mod dispatch;
pub mod escape;
pub mod translate;

pub use dispatch::dispatch;
