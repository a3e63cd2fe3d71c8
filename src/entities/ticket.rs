//! Ticket entity - a support request tracked through its `estado`.
//!
//! Column names follow the JSON contract (`tipoSoporte`, `fechaCreacion`,
//! `fechaActualizacion`) so the table reads the same as the API payloads.

use chrono::{Duration, SubsecRound, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Ticket database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer name
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub cliente: String,
    /// Service address
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub direccion: String,
    /// Contact phone number
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub telefono: String,
    /// Free-text description of the problem
    #[sea_orm(column_type = "Text")]
    pub descripcion: String,
    /// Kind of support requested (e.g. "Hardware", "Software")
    #[sea_orm(column_name = "tipoSoporte", column_type = "String(StringLen::N(50))")]
    pub tipo_soporte: String,
    /// Current status
    #[sea_orm(default_value = "pendiente")]
    pub estado: Estado,
    /// Set once when the ticket is created
    #[sea_orm(column_name = "fechaCreacion")]
    pub fecha_creacion: DateTimeUtc,
    /// Refreshed on every write to the row
    #[sea_orm(column_name = "fechaActualizacion")]
    pub fecha_actualizacion: DateTimeUtc,
}

/// Ticket status. Every value can transition to every other.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Estado {
    /// Initial state of every ticket
    #[sea_orm(string_value = "pendiente")]
    Pendiente,
    /// Support was delivered
    #[sea_orm(string_value = "resuelto")]
    Resuelto,
    /// Request was withdrawn
    #[sea_orm(string_value = "cancelado")]
    Cancelado,
}

impl Estado {
    /// Lowercase wire name, identical to the persisted value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Resuelto => "resuelto",
            Self::Cancelado => "cancelado",
        }
    }
}

/// Error returned when a string is not one of the three status names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEstado(pub String);

impl fmt::Display for UnknownEstado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown estado `{}`", self.0)
    }
}

impl std::error::Error for UnknownEstado {}

impl FromStr for Estado {
    type Err = UnknownEstado;

    /// Exact, case-sensitive match on the lowercase names.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pendiente),
            "resuelto" => Ok(Self::Resuelto),
            "cancelado" => Ok(Self::Cancelado),
            other => Err(UnknownEstado(other.to_string())),
        }
    }
}

/// `Ticket` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Current time truncated to the microsecond precision the store keeps.
#[must_use]
pub fn now() -> DateTimeUtc {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for the next write of a row last touched at `previous`.
///
/// Always strictly later than `previous`, even when the clock has not moved
/// (or has moved backwards) since the last write.
#[must_use]
pub fn next_update_stamp(previous: DateTimeUtc) -> DateTimeUtc {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}
