use rand::Rng;

use crate::RoomCode;

const ADJECTIVES: &[&str] = &[
    "Swift", "Brave", "Clever", "Mighty", "Silent", "Golden", "Wild", "Noble",
    "Fierce", "Gentle", "Quick", "Wise", "Bold", "Proud", "Cunning", "Sly",
];

const NOUNS: &[&str] = &[
    "Falcon", "Bear", "Tiger", "Wolf", "Eagle", "Dragon", "Lion", "Panther",
    "Hawk", "Fox", "Raven", "Cobra", "Shark", "Phoenix", "Lynx", "Viper",
];

const ROOM_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const ROOM_CODE_LENGTH: usize = 6;

pub fn generate_player_name() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    format!("{} {}", adjective, noun)
}

pub fn generate_room_code() -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect();
    RoomCode::new(code)
}

/// Codes are typed by hand, so surrounding whitespace and lowercase input are accepted.
pub fn normalize_room_code(input: &str) -> Option<RoomCode> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(RoomCode::new(trimmed.to_ascii_uppercase()))
}

/// Falls back to a generated name when the player left the field blank.
pub fn display_name_or_generated(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        generate_player_name()
    } else {
        trimmed.to_string()
    }
}
