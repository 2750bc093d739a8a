// Shared audio/depth tuning constants used by the core and the web frontend.

// Depth decode weights, one per RGBA byte. "r" is the most significant digit.
pub const DEPTH_WEIGHT_R: f32 = 0.003921568627451;
pub const DEPTH_WEIGHT_G: f32 = 1.531862745098039e-5;
pub const DEPTH_WEIGHT_B: f32 = 5.983838848039216e-8;
pub const DEPTH_WEIGHT_A: f32 = 2.337437050015319e-10;

// Normalized depth at or below this counts as background
pub const BACKGROUND_EPSILON: f32 = 1e-6;

// Frequency mode
pub const BASE_FREQUENCY_HZ: f32 = 80.0; // background tone
pub const FREQUENCY_SPAN_HZ: f32 = 500.0; // added at the nearest surface

// Beep mode (beats per minute)
pub const BEEP_BPM_BASE: f32 = 60.0;
pub const BEEP_BPM_SPAN: f32 = 640.0;
pub const BEEP_BACKGROUND_RATE: f32 = 1.0; // beeps/sec over empty space

// Tone shaping filter
pub const FILTER_FREQUENCY_HZ: f32 = 580.0;
pub const FILTER_Q: f32 = 0.001;

// Limiter (dynamics compressor pinned to 0 dB)
pub const LIMITER_THRESHOLD_DB: f32 = 0.0;
pub const LIMITER_KNEE_DB: f32 = 0.0;
pub const LIMITER_RATIO: f32 = 20.0;
pub const LIMITER_ATTACK_SEC: f32 = 0.005;
pub const LIMITER_RELEASE_SEC: f32 = 0.050;

// Proximity gain
pub const GAIN_FALLOFF: f32 = 0.9; // gain reaches 1 - falloff at the reference distance
pub const GAIN_SMOOTHING_SEC: f64 = 0.01;

// Beep buffer: a short 330 Hz burst at the head of a 2 s loop
pub const BEEP_TONE_HZ: f32 = 330.0;
pub const BEEP_BUFFER_SEC: f32 = 2.0;
pub const BEEP_BURST_SEC: f32 = 0.02;

// Sweep-start cue
pub const CUE_TONE_HZ: f32 = 880.0;
pub const CUE_DURATION_SEC: f32 = 0.12;
pub const CUE_DECAY_PER_SEC: f32 = 40.0;

// Scanline sweep
pub const SWEEP_DURATION_MS: f64 = 2000.0;
pub const SCAN_STEPS: u32 = 20; // 21 lines, top to bottom in 5% steps

// Resize handling
pub const RESIZE_DEBOUNCE_MS: f64 = 200.0;
