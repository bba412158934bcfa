use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Repository;
use crate::core::{AppError, AppResult};
use crate::models::{
    ContactMessage, Flight, FlightRequest, InviteCode, Stay, StayRequest, User, UserStatusFilter,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    flights: HashMap<Uuid, Flight>,
    stays: HashMap<Uuid, Stay>,
    invites: HashMap<String, InviteCode>,
    messages: Vec<ContactMessage>,
}

/// Every table lives under a single lock, so multi-table writes
/// (registration with an invite, cascading user deletes) are atomic.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn register_user(&self, mut user: User, invite_code: Option<&str>) -> AppResult<User> {
        let mut tables = self.tables.write().await;

        let taken = tables
            .users
            .values()
            .any(|existing| existing.username.eq_ignore_ascii_case(&user.username));
        if taken {
            return Err(AppError::conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }

        if let Some(code) = invite_code {
            let now = Utc::now();
            let invite = tables
                .invites
                .get_mut(code)
                .filter(|invite| !invite.is_used())
                .ok_or_else(|| AppError::validation("invalid or already used invite code"))?;
            invite.used_by = Some(user.id);
            invite.used_at = Some(now);

            user.approved = true;
            user.approved_at = Some(now);
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn list_users(&self, filter: Option<UserStatusFilter>) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|user| filter.is_none_or(|f| f.matches(user)))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn approve_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            if !user.approved {
                user.approved = true;
                user.approved_at = Some(Utc::now());
            }
            user.clone()
        }))
    }

    async fn update_profile_icon(
        &self,
        id: Uuid,
        icon: Option<String>,
    ) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.profile_icon = icon;
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.flights.retain(|_, flight| flight.user_id != id);
        tables.stays.retain(|_, stay| stay.user_id != id);
        Ok(true)
    }

    async fn insert_flight(&self, flight: Flight) -> AppResult<Flight> {
        let mut tables = self.tables.write().await;
        tables.flights.insert(flight.id, flight.clone());
        Ok(flight)
    }

    async fn list_flights(&self, user_id: Uuid) -> AppResult<Vec<Flight>> {
        let tables = self.tables.read().await;
        let mut flights: Vec<Flight> = tables
            .flights
            .values()
            .filter(|flight| flight.user_id == user_id)
            .cloned()
            .collect();
        flights.sort_by(|a, b| {
            b.departure_date
                .cmp(&a.departure_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(flights)
    }

    async fn get_flight(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Flight>> {
        let tables = self.tables.read().await;
        Ok(tables
            .flights
            .get(&id)
            .filter(|flight| flight.user_id == user_id)
            .cloned())
    }

    async fn replace_flight(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: FlightRequest,
    ) -> AppResult<Option<Flight>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables
            .flights
            .get_mut(&id)
            .filter(|flight| flight.user_id == user_id)
        else {
            return Ok(None);
        };

        let created_at = existing.created_at;
        *existing = Flight::from_request(id, user_id, request);
        existing.created_at = created_at;
        Ok(Some(existing.clone()))
    }

    async fn delete_flight(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .flights
            .get(&id)
            .is_some_and(|flight| flight.user_id == user_id);
        if owned {
            tables.flights.remove(&id);
        }
        Ok(owned)
    }

    async fn insert_stay(&self, stay: Stay) -> AppResult<Stay> {
        let mut tables = self.tables.write().await;
        tables.stays.insert(stay.id, stay.clone());
        Ok(stay)
    }

    async fn list_stays(&self, user_id: Uuid) -> AppResult<Vec<Stay>> {
        let tables = self.tables.read().await;
        let mut stays: Vec<Stay> = tables
            .stays
            .values()
            .filter(|stay| stay.user_id == user_id)
            .cloned()
            .collect();
        stays.sort_by(|a, b| {
            b.check_in
                .cmp(&a.check_in)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(stays)
    }

    async fn get_stay(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Stay>> {
        let tables = self.tables.read().await;
        Ok(tables
            .stays
            .get(&id)
            .filter(|stay| stay.user_id == user_id)
            .cloned())
    }

    async fn replace_stay(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: StayRequest,
    ) -> AppResult<Option<Stay>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables
            .stays
            .get_mut(&id)
            .filter(|stay| stay.user_id == user_id)
        else {
            return Ok(None);
        };

        let created_at = existing.created_at;
        *existing = Stay::from_request(id, user_id, request);
        existing.created_at = created_at;
        Ok(Some(existing.clone()))
    }

    async fn delete_stay(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .stays
            .get(&id)
            .is_some_and(|stay| stay.user_id == user_id);
        if owned {
            tables.stays.remove(&id);
        }
        Ok(owned)
    }

    async fn insert_invite(&self, invite: InviteCode) -> AppResult<InviteCode> {
        let mut tables = self.tables.write().await;
        if tables.invites.contains_key(&invite.code) {
            return Err(AppError::conflict(format!(
                "invite code '{}' already exists",
                invite.code
            )));
        }
        tables.invites.insert(invite.code.clone(), invite.clone());
        Ok(invite)
    }

    async fn list_invites(&self) -> AppResult<Vec<InviteCode>> {
        let tables = self.tables.read().await;
        let mut invites: Vec<InviteCode> = tables.invites.values().cloned().collect();
        invites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invites)
    }

    async fn revoke_invite(&self, code: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let invite = tables
            .invites
            .get(code)
            .ok_or_else(|| AppError::not_found(format!("invite code '{code}' not found")))?;
        if invite.is_used() {
            return Err(AppError::conflict(format!(
                "invite code '{code}' has already been used"
            )));
        }
        tables.invites.remove(code);
        Ok(())
    }

    async fn insert_message(&self, message: ContactMessage) -> AppResult<ContactMessage> {
        let mut tables = self.tables.write().await;
        tables.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self) -> AppResult<Vec<ContactMessage>> {
        let tables = self.tables.read().await;
        let mut messages = tables.messages.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }
}
