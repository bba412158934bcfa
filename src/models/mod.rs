pub mod account;
pub mod contact;
pub mod travel;

pub use account::{
    InviteCode, LoginRequest, LoginResponse, PublicUser, RegisterRequest, RegisterResponse,
    UpdateProfileRequest, User, UserStatusFilter,
};
pub use contact::{ContactMessage, ContactRequest};
pub use travel::{Flight, FlightRequest, Stay, StayRequest};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}
