//! Typed requests
//!
//! Each action name maps to one `Request` variant carrying a validated
//! payload. Numbers arrive as JSON numbers (possibly floats) and are sign-
//! and range-checked before integer conversion.

use serde_json::{Map, Number, Value};

use crate::domain::{NewAlbum, NewPurchase, NewUser, Price};
use crate::error::{AppError, AppResult};

use super::Envelope;

/// Recognized action names
pub mod action {
    pub const GET_ALBUMS: &str = "getAlbums";
    pub const GET_ALBUM_BY_ARTIST: &str = "getAlbumByArtist";
    pub const GET_ALBUM_BY_ID: &str = "getAlbumByID";
    pub const ADD_ALBUM: &str = "addAlbum";
    pub const GET_USERS: &str = "getUsers";
    pub const GET_USER_BY_ID: &str = "getUserByID";
    pub const ADD_USER: &str = "addUser";
    pub const GET_PURCHASES: &str = "getPurchases";
    pub const GET_PURCHASES_BY_USER_ID: &str = "getPurchasesByUserID";
    pub const ADD_PURCHASE: &str = "addPurchase";
    pub const GET_USER_PURCHASE_SUMMARY: &str = "getUserPurchaseSummary";
    pub const GET_ALL_USERS_PURCHASE_SUMMARY: &str = "getAllUsersPurchaseSummary";
}

/// A validated request
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GetAlbums,
    GetAlbumsByArtist { artist: String },
    GetAlbumById { id: i64 },
    AddAlbum(NewAlbum),
    GetUsers,
    GetUserById { id: i64 },
    AddUser(NewUser),
    GetPurchases,
    GetPurchasesByUserId { user_id: i64 },
    AddPurchase(NewPurchase),
    GetUserPurchaseSummary { user_id: i64 },
    GetAllUsersPurchaseSummary,
}

impl Request {
    /// Validate `data` against the shape `action` expects.
    ///
    /// # Errors
    /// - `AppError::UnknownAction` for an unrecognized action name
    /// - `AppError::InvalidRequest` with a field-specific message
    pub fn parse(action_name: &str, data: &Value) -> AppResult<Self> {
        let request = match action_name {
            action::GET_ALBUMS => Request::GetAlbums,
            action::GET_ALBUM_BY_ARTIST => Request::GetAlbumsByArtist {
                artist: parse_artist(data)?,
            },
            action::GET_ALBUM_BY_ID => Request::GetAlbumById {
                id: parse_id(data, "album ID")?,
            },
            action::ADD_ALBUM => Request::AddAlbum(parse_new_album(data)?),
            action::GET_USERS => Request::GetUsers,
            action::GET_USER_BY_ID => Request::GetUserById {
                id: parse_id(data, "user ID")?,
            },
            action::ADD_USER => Request::AddUser(parse_new_user(data)?),
            action::GET_PURCHASES => Request::GetPurchases,
            action::GET_PURCHASES_BY_USER_ID => Request::GetPurchasesByUserId {
                user_id: parse_id(data, "user ID")?,
            },
            action::ADD_PURCHASE => Request::AddPurchase(parse_new_purchase(data)?),
            action::GET_USER_PURCHASE_SUMMARY => Request::GetUserPurchaseSummary {
                user_id: parse_id(data, "user ID")?,
            },
            action::GET_ALL_USERS_PURCHASE_SUMMARY => Request::GetAllUsersPurchaseSummary,
            other => return Err(AppError::UnknownAction(other.to_string())),
        };

        Ok(request)
    }

    /// The action name this request was parsed from
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetAlbums => action::GET_ALBUMS,
            Request::GetAlbumsByArtist { .. } => action::GET_ALBUM_BY_ARTIST,
            Request::GetAlbumById { .. } => action::GET_ALBUM_BY_ID,
            Request::AddAlbum(_) => action::ADD_ALBUM,
            Request::GetUsers => action::GET_USERS,
            Request::GetUserById { .. } => action::GET_USER_BY_ID,
            Request::AddUser(_) => action::ADD_USER,
            Request::GetPurchases => action::GET_PURCHASES,
            Request::GetPurchasesByUserId { .. } => action::GET_PURCHASES_BY_USER_ID,
            Request::AddPurchase(_) => action::ADD_PURCHASE,
            Request::GetUserPurchaseSummary { .. } => action::GET_USER_PURCHASE_SUMMARY,
            Request::GetAllUsersPurchaseSummary => action::GET_ALL_USERS_PURCHASE_SUMMARY,
        }
    }
}

impl TryFrom<&Envelope> for Request {
    type Error = AppError;

    fn try_from(envelope: &Envelope) -> Result<Self, Self::Error> {
        Request::parse(&envelope.action, &envelope.data)
    }
}

// =========================================================================
// Payload parsers
// =========================================================================

fn parse_artist(data: &Value) -> AppResult<String> {
    match data {
        Value::String(artist) if artist.is_empty() => {
            Err(AppError::invalid("artist name cannot be empty"))
        }
        Value::String(artist) => Ok(artist.clone()),
        _ => Err(AppError::invalid("invalid artist name: must be a string")),
    }
}

fn parse_id(data: &Value, label: &str) -> AppResult<i64> {
    let Value::Number(number) = data else {
        return Err(AppError::invalid(format!("invalid {label}: must be a number")));
    };

    if !is_positive(number) {
        return Err(AppError::invalid(format!("{label} must be greater than 0")));
    }

    whole_number(number).map_err(|e| e.into_error(label))
}

fn parse_new_album(data: &Value) -> AppResult<NewAlbum> {
    let fields = object(data, "invalid album data: must be an object")?;

    let title = non_empty_string(fields, "title", "invalid or missing title")?;
    let artist = non_empty_string(fields, "artist", "invalid or missing artist")?;

    let price = match fields.get("price") {
        Some(Value::Number(number)) => {
            Price::from_json_number(number).map_err(|e| AppError::invalid(e.to_string()))?
        }
        _ => return Err(AppError::invalid("price must be greater than 0")),
    };

    let stock = match fields.get("stock") {
        Some(Value::Number(number)) if !is_negative(number) => {
            let stock = whole_number(number).map_err(|e| e.into_error("stock"))?;
            i32::try_from(stock).map_err(|_| NumberError::OutOfRange.into_error("stock"))?
        }
        _ => return Err(AppError::invalid("stock must be 0 or greater")),
    };

    Ok(NewAlbum {
        title,
        artist,
        price,
        stock,
    })
}

fn parse_new_user(data: &Value) -> AppResult<NewUser> {
    let fields = object(data, "invalid user data: must be an object")?;

    let username = non_empty_string(fields, "username", "invalid or missing username")?;
    let email = non_empty_string(fields, "email", "invalid or missing email")?;

    Ok(NewUser { username, email })
}

fn parse_new_purchase(data: &Value) -> AppResult<NewPurchase> {
    let fields = object(data, "invalid purchase data: must be an object")?;

    let user_id = positive_field(
        fields,
        "user_id",
        "invalid or missing user_id: must be greater than 0",
    )?;
    let album_id = positive_field(
        fields,
        "album_id",
        "invalid or missing album_id: must be greater than 0",
    )?;
    let quantity = positive_field(fields, "quantity", "invalid quantity: must be greater than 0")?;
    let quantity =
        i32::try_from(quantity).map_err(|_| NumberError::OutOfRange.into_error("quantity"))?;

    Ok(NewPurchase {
        user_id,
        album_id,
        quantity,
    })
}

// =========================================================================
// Field helpers
// =========================================================================

fn object<'a>(data: &'a Value, message: &str) -> AppResult<&'a Map<String, Value>> {
    data.as_object().ok_or_else(|| AppError::invalid(message))
}

fn non_empty_string(fields: &Map<String, Value>, key: &str, message: &str) -> AppResult<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::invalid(message))
}

fn positive_field(fields: &Map<String, Value>, key: &str, message: &str) -> AppResult<i64> {
    match fields.get(key) {
        Some(Value::Number(number)) if is_positive(number) => {
            whole_number(number).map_err(|e| e.into_error(key))
        }
        _ => Err(AppError::invalid(message)),
    }
}

/// Why a JSON number could not become an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberError {
    NotWhole,
    OutOfRange,
}

impl NumberError {
    fn into_error(self, label: &str) -> AppError {
        match self {
            NumberError::NotWhole => AppError::invalid(format!("{label} must be a whole number")),
            NumberError::OutOfRange => AppError::invalid(format!("{label} is out of range")),
        }
    }
}

fn is_positive(number: &Number) -> bool {
    number.as_f64().is_some_and(|n| n > 0.0)
}

fn is_negative(number: &Number) -> bool {
    number.as_f64().is_some_and(|n| n < 0.0)
}

/// Convert a JSON number to `i64`, accepting integral floats such as `3.0`.
fn whole_number(number: &Number) -> Result<i64, NumberError> {
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    if number.is_u64() {
        return Err(NumberError::OutOfRange);
    }

    let n = number.as_f64().ok_or(NumberError::OutOfRange)?;
    if n.fract() != 0.0 {
        return Err(NumberError::NotWhole);
    }

    // -2^63 and 2^63 are exact as f64; i64 covers [-2^63, 2^63).
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if (-LIMIT..LIMIT).contains(&n) {
        Ok(n as i64)
    } else {
        Err(NumberError::OutOfRange)
    }
}
