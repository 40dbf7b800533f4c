// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Maior valor que cabe em `NUMERIC(10, 2)`: 99.999.999,99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

// ---
// Validações customizadas compartilhadas pelos payloads
// ---

/// Preço de catálogo: não negativo, no máximo duas casas e dentro de `MAX_AMOUNT`.
pub fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    if *val > MAX_AMOUNT {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MAX_AMOUNT.to_string());
        err.message = Some("O valor excede o máximo permitido (99999999.99).".into());
        return Err(err);
    }
    if val.normalize().scale() > 2 {
        let mut err = ValidationError::new("scale");
        err.message = Some("O valor deve ter no máximo duas casas decimais.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("O campo não pode ficar em branco.".into());
        return Err(err);
    }
    Ok(())
}
