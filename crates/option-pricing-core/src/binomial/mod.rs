pub mod crr;

pub use crr::{crr_price, price_binomial, BinomialInput, BinomialOutput, CrrLattice};
