mod pipeline;
mod rental;

pub use self::rental::*;
