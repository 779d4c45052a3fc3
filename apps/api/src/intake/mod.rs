// Resume intake: raw upload bytes → text, plus contact heuristics over that text.

pub mod candidate;
pub mod pdf;
