//! Request schemas and the validated commands built from them.
//!
//! Every body is a [`Tainted`] JSON value. [`JsonBody`] checks it against a
//! schema that rejects unknown fields, then each command's constructor runs
//! the field sanitizers. Commands are `#[non_exhaustive]`, so outside this
//! crate they can only come from those constructors.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Violation;
use crate::model::{AttendanceStatus, ComplaintStatus, HostelId, Role, UserId};
use crate::sanitizer::{EmailSanitizer, JsonBody, PasswordSanitizer, Sanitizer, TextSanitizer};
use crate::secret::Secret;
use crate::tainted::Tainted;

const NAME_MAX: usize = 100;
const ROOM_NUMBER_MAX: usize = 32;
const TITLE_MAX: usize = 200;
const TEXT_MAX: usize = 4000;

fn missing() -> Violation {
    Violation::invalid("Missing fields")
}

fn parse_body<B: serde::de::DeserializeOwned>(body: Tainted<Value>) -> Result<B, Violation> {
    Ok(JsonBody::<B>::new().sanitize(body)?.into_inner())
}

fn required<T>(field: Option<T>, message: &'static str) -> Result<T, Violation> {
    field.ok_or_else(|| Violation::invalid(message))
}

fn name(raw: String) -> Result<String, Violation> {
    Ok(TextSanitizer::single_line(NAME_MAX)
        .sanitize(Tainted::new(raw))?
        .into_inner())
}

fn email(raw: String) -> Result<String, Violation> {
    Ok(EmailSanitizer.sanitize(Tainted::new(raw))?.into_inner())
}

fn password(raw: Secret<String>) -> Result<Secret<String>, Violation> {
    let verified = PasswordSanitizer.sanitize(Tainted::new(raw.expose_secret().clone()))?;
    Ok(Secret::new(verified.into_inner()))
}

fn positive(capacity: Option<u32>) -> Result<u32, Violation> {
    match capacity {
        Some(0) | None => Err(missing()),
        Some(c) => Ok(c),
    }
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp (its UTC date).
pub fn parse_date(raw: &str) -> Result<NaiveDate, Violation> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc).date_naive()))
        .map_err(|_| Violation::invalid("Invalid date"))
}

/// Parses a path or query identifier. Malformed ids name no record.
pub fn parse_id<I: std::str::FromStr>(raw: Tainted<&str>, entity: &str) -> Result<I, Violation> {
    raw.into_inner()
        .parse()
        .map_err(|_| Violation::not_found(entity))
}

/// A room label sent either as text or as a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Label {
    Text(String),
    Number(u64),
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        match label {
            Label::Text(s) => s,
            Label::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NewUserBody {
    name: Option<String>,
    email: Option<String>,
    password: Option<Secret<String>>,
    role: Option<Role>,
    #[serde(rename = "hostelId")]
    hostel_id: Option<HostelId>,
}

/// Public self-registration.
#[derive(Debug)]
#[non_exhaustive]
pub struct Register {
    /// Display name
    pub name: String,
    /// Normalised email
    pub email: String,
    /// Plaintext password, redacted in logs
    pub password: Secret<String>,
    /// Role asked for; anything but resident is refused by the service
    pub requested_role: Option<Role>,
}

impl Register {
    /// Validates registration fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        requested_role: Option<Role>,
    ) -> Result<Self, Violation> {
        Ok(Self {
            name: self::name(name.into())?,
            email: self::email(email.into())?,
            password: self::password(Secret::new(password.into()))?,
            requested_role,
        })
    }

    /// Parses and validates a registration body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Body {
            name: Option<String>,
            email: Option<String>,
            password: Option<Secret<String>>,
            role: Option<Role>,
        }

        let body: Body = parse_body(body)?;
        let message = "Missing required fields";
        Ok(Self {
            name: name(required(body.name, message)?)?,
            email: email(required(body.email, message)?)?,
            password: password(required(body.password, message)?)?,
            requested_role: body.role,
        })
    }
}

/// Email and password login.
#[derive(Debug)]
#[non_exhaustive]
pub struct Login {
    /// Normalised email
    pub email: String,
    /// Plaintext password, redacted in logs
    pub password: Secret<String>,
}

impl Login {
    /// Validates login fields.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, Violation> {
        Ok(Self {
            email: self::email(email.into())?,
            password: self::password(Secret::new(password.into()))?,
        })
    }

    /// Parses and validates a login body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Body {
            email: Option<String>,
            password: Option<Secret<String>>,
        }

        let body: Body = parse_body(body)?;
        let message = "Missing email or password";
        Ok(Self {
            email: email(required(body.email, message)?)?,
            password: password(required(body.password, message)?)?,
        })
    }
}

/// An account created by an admin, of any role.
#[derive(Debug)]
#[non_exhaustive]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Normalised email
    pub email: String,
    /// Initial password
    pub password: Secret<String>,
    /// Role of the new account
    pub role: Role,
    /// Initial hostel, if any
    pub hostel_id: Option<HostelId>,
}

impl NewUser {
    /// Validates account fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        hostel_id: Option<HostelId>,
    ) -> Result<Self, Violation> {
        Ok(Self {
            name: self::name(name.into())?,
            email: self::email(email.into())?,
            password: self::password(Secret::new(password.into()))?,
            role,
            hostel_id,
        })
    }

    /// Parses and validates an account body. `role` defaults to resident.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        let body: NewUserBody = parse_body(body)?;
        let message = "Missing required fields";
        Ok(Self {
            name: name(required(body.name, message)?)?,
            email: email(required(body.email, message)?)?,
            password: password(required(body.password, message)?)?,
            role: body.role.unwrap_or_default(),
            hostel_id: body.hostel_id,
        })
    }
}

/// A partial update of a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct UserUpdate {
    /// New display name
    pub name: Option<String>,
    /// New role
    pub role: Option<Role>,
    /// New hostel
    pub hostel_id: Option<HostelId>,
    /// Room to place the user in
    pub room_id: Option<crate::model::RoomId>,
}

impl UserUpdate {
    /// An update that only moves the user into `room`.
    pub fn room(room: crate::model::RoomId) -> Self {
        Self {
            room_id: Some(room),
            ..Self::default()
        }
    }

    /// Builds an update; at least one field must be set.
    pub fn new(
        name: Option<String>,
        role: Option<Role>,
        hostel_id: Option<HostelId>,
        room_id: Option<crate::model::RoomId>,
    ) -> Result<Self, Violation> {
        let update = Self {
            name: name.map(self::name).transpose()?,
            role,
            hostel_id,
            room_id,
        };
        if update.is_empty() {
            return Err(missing());
        }
        Ok(update)
    }

    /// Parses and validates an update body.
    ///
    /// Accepts the fields directly or wrapped as `{"updates": {...}}`.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields, rename_all = "camelCase")]
        struct Body {
            name: Option<String>,
            role: Option<Role>,
            hostel_id: Option<HostelId>,
            room_id: Option<crate::model::RoomId>,
        }

        let body = body.map(|v| match v {
            Value::Object(mut map) if map.len() == 1 && map.contains_key("updates") => {
                map.remove("updates").unwrap_or(Value::Null)
            }
            other => other,
        });
        let body: Body = parse_body(body)?;
        Self::new(body.name, body.role, body.hostel_id, body.room_id)
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.hostel_id.is_none() && self.room_id.is_none()
    }

    /// Returns `true` if the update sets nothing but `room_id`.
    pub fn touches_only_room(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.hostel_id.is_none()
    }
}

/// A new hostel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct NewHostel {
    /// Display name
    pub name: String,
    /// Number of beds, at least 1
    pub capacity: u32,
}

impl NewHostel {
    /// Validates hostel fields.
    pub fn new(name: impl Into<String>, capacity: u32) -> Result<Self, Violation> {
        Ok(Self {
            name: self::name(name.into())?,
            capacity: positive(Some(capacity))?,
        })
    }

    /// Parses and validates a hostel body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Body {
            name: Option<String>,
            capacity: Option<u32>,
        }

        let body: Body = parse_body(body)?;
        Self::new(body.name.ok_or_else(missing)?, positive(body.capacity)?)
    }
}

/// Warden assignment for a hostel named in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct AssignWarden {
    /// The warden to assign
    pub warden_id: UserId,
}

impl AssignWarden {
    /// Assigns `warden_id`.
    pub fn new(warden_id: UserId) -> Self {
        Self { warden_id }
    }

    /// Parses an assignment body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields, rename_all = "camelCase")]
        struct Body {
            warden_id: Option<UserId>,
        }

        let body: Body = parse_body(body)?;
        Ok(Self::new(body.warden_id.ok_or_else(missing)?))
    }
}

/// A new room.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct NewRoom {
    /// Owning hostel
    pub hostel_id: HostelId,
    /// Room label
    pub number: String,
    /// Maximum occupants, at least 1
    pub capacity: u32,
}

impl NewRoom {
    /// Validates room fields.
    pub fn new(hostel_id: HostelId, number: impl Into<String>, capacity: u32) -> Result<Self, Violation> {
        let number = TextSanitizer::single_line(ROOM_NUMBER_MAX)
            .sanitize(Tainted::new(number.into()))?
            .into_inner();
        Ok(Self {
            hostel_id,
            number,
            capacity: positive(Some(capacity))?,
        })
    }

    /// Parses and validates a room body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields, rename_all = "camelCase")]
        struct Body {
            hostel_id: Option<HostelId>,
            number: Option<Label>,
            capacity: Option<u32>,
        }

        let body: Body = parse_body(body)?;
        let hostel_id = body.hostel_id.ok_or_else(missing)?;
        let number: String = body.number.ok_or_else(missing)?.into();
        Self::new(hostel_id, number, positive(body.capacity)?)
    }
}

/// Room allocation for a room named in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Allocate {
    /// The resident to place
    pub resident_id: UserId,
}

impl Allocate {
    /// Allocates `resident_id`.
    pub fn new(resident_id: UserId) -> Self {
        Self { resident_id }
    }

    /// Parses an allocation body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields, rename_all = "camelCase")]
        struct Body {
            resident_id: Option<UserId>,
        }

        let body: Body = parse_body(body)?;
        Ok(Self::new(body.resident_id.ok_or_else(missing)?))
    }
}

/// A complaint filed by a resident.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct NewComplaint {
    /// Short summary
    pub title: String,
    /// Full description, may span lines
    pub description: String,
}

impl NewComplaint {
    /// Validates complaint fields.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Result<Self, Violation> {
        Ok(Self {
            title: TextSanitizer::single_line(TITLE_MAX)
                .sanitize(Tainted::new(title.into()))?
                .into_inner(),
            description: TextSanitizer::multi_line(TEXT_MAX)
                .sanitize(Tainted::new(description.into()))?
                .into_inner(),
        })
    }

    /// Parses and validates a complaint body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Body {
            title: Option<String>,
            description: Option<String>,
        }

        let body: Body = parse_body(body)?;
        Self::new(
            body.title.ok_or_else(missing)?,
            body.description.ok_or_else(missing)?,
        )
    }
}

/// A staff update of a complaint named in the path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ComplaintUpdate {
    /// Target status
    pub status: ComplaintStatus,
    /// Staff response; replaces the previous one when set
    pub response: Option<String>,
}

impl ComplaintUpdate {
    /// Validates the update.
    pub fn new(status: ComplaintStatus, response: Option<String>) -> Result<Self, Violation> {
        let response = response
            .map(|r| {
                TextSanitizer::multi_line(TEXT_MAX)
                    .sanitize(Tainted::new(r))
                    .map(|v| v.into_inner())
            })
            .transpose()?;
        Ok(Self { status, response })
    }

    /// Parses and validates an update body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Body {
            status: Option<ComplaintStatus>,
            response: Option<String>,
        }

        let body: Body = parse_body(body)?;
        Self::new(body.status.ok_or_else(missing)?, body.response)
    }
}

/// An attendance mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct MarkAttendance {
    /// The resident being marked
    pub resident_id: UserId,
    /// Calendar day
    pub date: NaiveDate,
    /// Status for that day
    pub status: AttendanceStatus,
}

impl MarkAttendance {
    /// Builds a mark.
    pub fn new(resident_id: UserId, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            resident_id,
            date,
            status,
        }
    }

    /// Parses and validates a mark body.
    pub fn from_json(body: Tainted<Value>) -> Result<Self, Violation> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields, rename_all = "camelCase")]
        struct Body {
            resident_id: Option<UserId>,
            date: Option<String>,
            status: Option<AttendanceStatus>,
        }

        let body: Body = parse_body(body)?;
        let date = parse_date(&body.date.ok_or_else(missing)?)?;
        Ok(Self::new(
            body.resident_id.ok_or_else(missing)?,
            date,
            body.status.ok_or_else(missing)?,
        ))
    }
}

/// Optional narrowing of an attendance listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct AttendanceQuery {
    /// Only this resident
    pub resident_id: Option<UserId>,
    /// First day, inclusive
    pub start: Option<NaiveDate>,
    /// Last day, inclusive
    pub end: Option<NaiveDate>,
}

impl AttendanceQuery {
    /// Builds a query.
    pub fn new(resident_id: Option<UserId>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            resident_id,
            start,
            end,
        }
    }

    /// Reads `residentId`, `startDate` and `endDate` from query parameters.
    pub fn from_query(query: &BTreeMap<String, String>) -> Result<Self, Violation> {
        let resident_id = query
            .get("residentId")
            .map(|r| {
                r.trim()
                    .parse::<UserId>()
                    .map_err(|_| Violation::invalid("Invalid residentId"))
            })
            .transpose()?;
        let start = query.get("startDate").map(|d| parse_date(d)).transpose()?;
        let end = query.get("endDate").map(|d| parse_date(d)).transpose()?;
        Ok(Self::new(resident_id, start, end))
    }
}
