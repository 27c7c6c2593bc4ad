pub mod closed_form;

pub use closed_form::{bs_price, price_black_scholes, BlackScholesInput, BlackScholesOutput};
