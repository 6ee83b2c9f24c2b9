/// Grams are clipped to this many STFT frames before they reach a network.
pub const NUM_FRAMES: usize = 427;
