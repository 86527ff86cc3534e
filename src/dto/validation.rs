//! Validation helpers for DTOs.

use validator::ValidationError;

/// Characters a lobby code is generated from; visually ambiguous glyphs
/// (I, O, 0, 1) are excluded so codes survive being read out loud.
pub const LOBBY_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Fixed lobby code length.
pub const LOBBY_CODE_LENGTH: usize = 6;

/// Validates that a lobby code is exactly 6 alphanumeric characters.
///
/// Codes are matched case-insensitively on the wire, so lowercase input is
/// accepted here and uppercased before hitting the store.
pub fn validate_lobby_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != LOBBY_CODE_LENGTH {
        let mut err = ValidationError::new("lobby_code_length");
        err.message =
            Some(format!("lobby code must be exactly {LOBBY_CODE_LENGTH} characters").into());
        return Err(err);
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("lobby_code_format");
        err.message = Some("lobby code must contain only letters and digits".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a player display name: non-blank, at most 32 characters.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("player name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > 32 {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some("player name must be at most 32 characters".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a client-generated player id: non-blank, at most 64 characters.
pub fn validate_player_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("player_id_blank");
        err.message = Some("player id must not be blank".into());
        return Err(err);
    }

    if id.chars().count() > 64 {
        let mut err = ValidationError::new("player_id_length");
        err.message = Some("player id must be at most 64 characters".into());
        return Err(err);
    }

    Ok(())
}
