mod belt;

pub use belt::*;
