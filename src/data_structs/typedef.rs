/// Base-pair coordinate within a construct.
pub type PosType = usize;
/// Index of a bin in a predicted track.
pub type BinType = usize;
/// One scalar of a predicted track.
pub type SignalType = f64;

/// Default construct length accepted by the predictor (1 MiB).
pub const DEFAULT_TARGET_LENGTH: PosType = 1 << 20;
/// Default track resolution in base pairs per bin.
pub const DEFAULT_BIN_SIZE: PosType = 8;
