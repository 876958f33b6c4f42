//! # سرویس کاربران
//!
//! پروفایل کاربر جاری و عملیات مدیریتی ادمین روی کاربران.

use tracing::{info, instrument};
use validator::Validate;

use crate::{
    database::{Repository, UserRepository},
    error::{AppError, OptionExt, Result},
    models::{Id, PaginatedResult, Pagination, UpdateProfileRequest, UserResponse},
};

use super::CurrentUser;

#[derive(Debug, Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    #[must_use]
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    /// پروفایل کاربر جاری
    pub async fn me(&self, caller: &CurrentUser) -> Result<UserResponse> {
        self.repo
            .find_by_id(caller.id.as_str())
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::user_not_found(caller.id.as_str()))
    }

    /// بروزرسانی پروفایل کاربر جاری
    #[instrument(skip(self, request), fields(user_id = %caller.id))]
    pub async fn update_me(
        &self,
        caller: &CurrentUser,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse> {
        request.validate()?;

        if request.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let user = self
            .repo
            .update_profile(caller.id.as_str(), &request)
            .await?
            .ok_or_else(|| AppError::user_not_found(caller.id.as_str()))?;

        info!("Profile updated");
        Ok(user.into())
    }

    /// گرفتن یک کاربر؛ فقط ادمین یا خود کاربر
    pub async fn get_user(&self, caller: &CurrentUser, id: &Id) -> Result<UserResponse> {
        if !caller.is_admin() && caller.id != *id {
            return Err(AppError::Forbidden(
                "You can only view your own profile".to_string(),
            ));
        }

        let user = self
            .repo
            .find_by_id(id.as_str())
            .await?
            .ok_or_not_found("User not found")?;

        Ok(user.into())
    }

    /// لیست صفحه‌بندی شده کاربران (ادمین)
    pub async fn list_users(&self, pagination: &Pagination) -> Result<PaginatedResult<UserResponse>> {
        let (users, total) = self.repo.list_paginated(pagination).await?;
        let users = users.into_iter().map(UserResponse::from).collect();

        Ok(PaginatedResult::new(users, pagination, total))
    }

    /// حذف کاربر (ادمین)
    #[instrument(skip(self), fields(admin_id = %caller.id))]
    pub async fn delete_user(&self, caller: &CurrentUser, id: &Id) -> Result<()> {
        if !self.repo.delete(id.as_str()).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
