// Shared tuning constants for the background field and its lifecycle.

// Ripple ring
pub const MAX_RIPPLES: usize = 10;
pub const RIPPLE_INACTIVE: [f32; 2] = [-1.0, -1.0]; // shader skips slots with x < 0

// Surface sizing
pub const MAX_PIXEL_RATIO: f64 = 2.0; // caps fill cost on dense displays

// Animation clock
pub const TIME_VELOCITY: f32 = 0.3; // time-uniform units per real second
pub const TIME_OFFSET_RANGE: f32 = 1000.0; // random start offset drawn from [0, range)

// Field construction (mirrored by shaders/pixel_blast.wgsl)
pub const CELL_PIXEL_MULTIPLIER: f32 = 8.0; // noise cell = 8 pixel cells
pub const NOISE_OCTAVES: usize = 5;
pub const NOISE_LACUNARITY: f32 = 1.25;
pub const NOISE_TIME_SCALE: f32 = 0.05;
pub const FEED_BIAS: f32 = -0.65;
pub const DENSITY_WEIGHT: f32 = 0.3;
pub const RIPPLE_TIME_DECAY: f32 = 1.0;
pub const RIPPLE_DISTANCE_DECAY: f32 = 10.0;

// Shape selectors (mirrored by SHAPE_* in shaders/pixel_blast.wgsl)
pub const SHAPE_SOLID: u32 = 0;
pub const SHAPE_CIRCLE: u32 = 1;
pub const SHAPE_TRIANGLE: u32 = 2;
pub const SHAPE_DIAMOND: u32 = 3;

// Defaults
pub const DEFAULT_PIXEL_SIZE: f32 = 4.0;
pub const DEFAULT_SCALE: f32 = 2.2;
pub const DEFAULT_DENSITY: f32 = 0.8;
pub const DEFAULT_JITTER: f32 = 0.25;
pub const DEFAULT_RIPPLE_SPEED: f32 = 0.26;
pub const DEFAULT_RIPPLE_THICKNESS: f32 = 0.13;
pub const DEFAULT_RIPPLE_INTENSITY: f32 = 0.75;
pub const DEFAULT_EDGE_FADE: f32 = 0.2;
pub const DEFAULT_COLOR_HEX: &str = "#D4856A"; // terracotta
