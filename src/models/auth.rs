// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::validation::validate_not_blank, models::catalog::Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum UserRole {
    Customer,
    Editor,
    Admin,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRole {
    /// Admins e editores podem cadastrar produtos.
    pub fn can_manage_catalog(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Editor)
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admin edita qualquer produto; editor só os que ele mesmo criou.
    pub fn can_edit_product(&self, product: &Product) -> bool {
        self.is_admin() || (self.role.can_manage_catalog() && product.created_by == self.id)
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "cliente@loja.com")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[validate(custom(function = "validate_not_blank"))]
    #[serde(alias = "first_name")]
    #[schema(example = "Ana")]
    pub first_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    #[serde(alias = "last_name")]
    #[schema(example = "Souza")]
    pub last_name: String,
    #[validate(length(max = 20, message = "O telefone deve ter no máximo 20 caracteres."))]
    pub phone: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Edição do próprio perfil: só os campos presentes mudam
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "O nome deve ter no máximo 100 caracteres.")
    )]
    #[serde(alias = "first_name")]
    pub first_name: Option<String>,
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "O sobrenome deve ter no máximo 100 caracteres.")
    )]
    #[serde(alias = "last_name")]
    pub last_name: Option<String>,
    #[validate(length(max = 20, message = "O telefone deve ter no máximo 20 caracteres."))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Informe a senha atual."))]
    pub current_password: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID do usuário)
    pub role: UserRole, // Papel no momento da emissão
    pub exp: usize,     // Expiration time (quando o token expira)
    pub iat: usize,     // Issued At (quando o token foi criado)
}
