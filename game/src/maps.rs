//! Built-in arenas.

/// 24x20 arena: three open rows on top, a pillar grid inside the outer wall,
/// two spawners and a scattering of destructible walls.
pub const CLASSIC: [&str; 20] = [
    "                        ",
    "                        ",
    "                        ",
    "CCCCCCCCCCCCCCCCCCCCCCCC",
    "C  P                   C",
    "CMCMCMCMC C CMC C C C  C",
    "CM   M       M    MMM  C",
    "CMC CMC C C CMC C CMC  C",
    "C                  M   C",
    "C C C C C C CMC C C C  C",
    "C  MM    E  MMM        C",
    "C CMC C C C C C C C C  C",
    "C  M               MM  C",
    "C C C CMCMC C C C CMC  C",
    "C      MMM     E   M   C",
    "C CMCMC C C C C C C C  C",
    "C            M         C",
    "CMC C C C C CMC C C CMMC",
    "CMM         MMM      MMC",
    "CCCCCCCCCCCCCCCCCCCCCCCC",
];
