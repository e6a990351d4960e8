// Derivative pricing

pub mod ndf;

pub use ndf::{crypto_forward_curve, make_ndf_quote, ForwardPoint, NdfQuote};
