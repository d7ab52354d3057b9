//! Database Models
//!
//! Model / Create / Update 三元组，RecordId 统一序列化为 "table:id" 字符串。

pub mod serde_helpers;

pub mod cake;
pub mod custom_order;
pub mod message;
pub mod order;
pub mod promo_code;
pub mod store_info;
pub mod team_member;

pub use cake::{Cake, CakeCreate, CakeId, CakeLayer, CakeSize, CakeUpdate};
pub use custom_order::{
    CustomOrderCreate, CustomOrderId, CustomOrderRequest, CustomOrderStatus, CustomOrderUpdate,
};
pub use message::{ConversationSummary, Message, MessageId, MessageSender};
pub use order::{Order, OrderId, OrderItem, OrderStatus, OrderUpdate, PaymentStatus};
pub use promo_code::{PromoCode, PromoCodeCreate, PromoCodeId, PromoCodeUpdate, PromoType};
pub use store_info::{StoreInfo, StoreInfoId, StoreInfoUpdate};
pub use team_member::{StaffRole, TeamMember, TeamMemberCreate, TeamMemberId, TeamMemberUpdate};
