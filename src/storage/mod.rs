//! Relational store seam
//!
//! Handlers talk to [`Repository`]; [`InMemoryRepository`] keeps every table
//! in process memory behind one lock.

pub mod memory;

pub use memory::InMemoryRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::AppResult;
use crate::models::{
    ContactMessage, Flight, FlightRequest, InviteCode, Stay, StayRequest, User, UserStatusFilter,
};

#[async_trait]
pub trait Repository: Send + Sync {
    /// Inserts a user. With an invite code the code must exist and be unused;
    /// it is consumed and the user is approved in the same step.
    async fn register_user(&self, user: User, invite_code: Option<&str>) -> AppResult<User>;
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn list_users(&self, filter: Option<UserStatusFilter>) -> AppResult<Vec<User>>;
    async fn approve_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn update_profile_icon(&self, id: Uuid, icon: Option<String>)
    -> AppResult<Option<User>>;
    /// Removes the user together with their flights and stays.
    async fn delete_user(&self, id: Uuid) -> AppResult<bool>;

    async fn insert_flight(&self, flight: Flight) -> AppResult<Flight>;
    async fn list_flights(&self, user_id: Uuid) -> AppResult<Vec<Flight>>;
    async fn get_flight(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Flight>>;
    async fn replace_flight(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: FlightRequest,
    ) -> AppResult<Option<Flight>>;
    async fn delete_flight(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    async fn insert_stay(&self, stay: Stay) -> AppResult<Stay>;
    async fn list_stays(&self, user_id: Uuid) -> AppResult<Vec<Stay>>;
    async fn get_stay(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Stay>>;
    async fn replace_stay(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: StayRequest,
    ) -> AppResult<Option<Stay>>;
    async fn delete_stay(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;

    async fn insert_invite(&self, invite: InviteCode) -> AppResult<InviteCode>;
    async fn list_invites(&self) -> AppResult<Vec<InviteCode>>;
    /// Deletes an unused invite code.
    async fn revoke_invite(&self, code: &str) -> AppResult<()>;

    async fn insert_message(&self, message: ContactMessage) -> AppResult<ContactMessage>;
    async fn list_messages(&self) -> AppResult<Vec<ContactMessage>>;
}
