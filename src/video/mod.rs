pub mod capture_worker;
pub mod extractor;
pub mod ffmpeg_manager;
pub mod preview;
pub mod processor;
pub mod thumbnail;

pub use capture_worker::*;
pub use extractor::*;
pub use ffmpeg_manager::execute_ffmpeg;
pub use preview::*;
pub use processor::*;
pub use thumbnail::*;
