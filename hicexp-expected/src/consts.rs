/// Minimum summed count a smoothing window must hold (about 5% shot noise).
pub const SHOT_NOISE_FLOOR: f64 = 400.0;

pub const UNIT_BP: &str = "BP";
pub const UNIT_FRAG: &str = "FRAG";
