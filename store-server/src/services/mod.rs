//! Business Services
//!
//! Handler 之外的编排逻辑。目前只有下单路径 —
//! 它跨越目录、定价、优惠码、库存四个关注点，不适合塞进 handler。

pub mod checkout;

pub use checkout::{
    CheckoutItem, CheckoutRequest, CheckoutResponse, CheckoutService, PaymentInstructions,
    QuoteRequest, QuoteResponse,
};
