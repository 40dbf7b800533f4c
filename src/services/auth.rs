// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{ChangePasswordPayload, Claims, RegisterUserPayload, UpdateProfilePayload, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_days: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_days: i64) -> Self {
        Self { user_repo, jwt_secret, token_ttl_days }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<String, AppError> {
        // 1. Hashing fora do runtime assíncrono (bcrypt é caro)
        let hashed_password = hash_password(&payload.password, bcrypt::DEFAULT_COST).await?;

        // 2. Cria o usuário; o papel é sempre 'customer'
        let new_user = self
            .user_repo
            .create_user(
                payload.email.trim(),
                &hashed_password,
                payload.first_name.trim(),
                payload.last_name.trim(),
                payload.phone.as_deref(),
            )
            .await?;

        tracing::info!(user_id = %new_user.id, "👤 Novo usuário registrado");

        // 3. Gera o token
        issue_token(&self.jwt_secret, &new_user, self.token_ttl_days)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::UserInactive);
        }

        issue_token(&self.jwt_secret, &user, self.token_ttl_days)
    }

    pub async fn update_profile(&self, user_id: Uuid, changes: &UpdateProfilePayload) -> Result<User, AppError> {
        changes.validate()?;

        self.user_repo
            .update_profile(
                user_id,
                changes.first_name.as_deref().map(str::trim),
                changes.last_name.as_deref().map(str::trim),
                changes.phone.as_deref(),
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn change_password(&self, user: &User, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        payload.validate()?;

        if !verify_password(&payload.current_password, &user.password_hash).await? {
            return Err(AppError::CurrentPasswordMismatch);
        }

        let hashed_password = hash_password(&payload.new_password, bcrypt::DEFAULT_COST).await?;
        if !self.user_repo.update_password(user.id, &hashed_password).await? {
            return Err(AppError::UserNotFound);
        }

        tracing::info!(user_id = %user.id, "🔑 Senha alterada");
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.is_active {
            return Err(AppError::UserInactive);
        }
        Ok(user)
    }
}

async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();

    // Executa a verificação em um thread separado
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

fn issue_token(secret: &str, user: &User, ttl_days: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(ttl_days);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;
    Ok(token_data.claims)
}
