pub mod codec;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod field;
pub mod geometry;
pub mod graph;
pub mod mapping;
pub mod narration;
pub mod proximity;
pub mod pyramid;
pub mod range;
pub mod scan;
pub mod sonifier;
pub mod synth;

pub static DEPTH_WGSL: &str = include_str!("../shaders/depth.wgsl");
pub static MINMAX_WGSL: &str = include_str!("../shaders/minmax.wgsl");

pub use codec::*;
pub use config::SonifyConfig;
pub use error::{Result, SonifyError};
pub use field::DepthField;
pub use geometry::*;
pub use graph::{AudioGraphController, AudioOutput, GraphTuning, Lane};
pub use mapping::*;
pub use narration::{NarrationEvent, NarrationState};
pub use pyramid::{DepthImage, ReduceOp};
pub use range::DepthRange;
pub use scan::{ScanState, ScanTick, ScanlineAutomator};
pub use sonifier::{MeasureRequest, PlaybackState, ScanTimer, Sonifier};
