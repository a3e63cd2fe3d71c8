//! Ticket business logic - the five ticket operations plus dashboard counts.
//!
//! Every function takes the store handle explicitly and performs a single
//! scoped round-trip (or a lookup followed by a write) against it. Validation
//! always runs before the store is touched, so a rejected request never reads
//! or writes a row.

use crate::{
    entities::{Estado, Ticket, ticket},
    errors::{Error, Result},
};
use sea_orm::{DbErr, PaginatorTrait, QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Message for a create/update payload with a missing or empty field.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Todos los campos son obligatorios";

/// Message for a status patch outside the three known values.
pub const INVALID_ESTADO_MESSAGE: &str = "Estado no válido";

/// Confirmation returned after a successful delete.
pub const DELETED_MESSAGE: &str = "Ticket eliminado correctamente";

/// Longest accepted `cliente`, in characters.
pub const MAX_CLIENTE_CHARS: usize = 100;
/// Longest accepted `direccion`, in characters.
pub const MAX_DIRECCION_CHARS: usize = 200;
/// Longest accepted `telefono`, in characters.
pub const MAX_TELEFONO_CHARS: usize = 20;
/// Longest accepted `tipoSoporte`, in characters. `descripcion` has no limit.
pub const MAX_TIPO_SOPORTE_CHARS: usize = 50;

/// Caller-supplied ticket fields, as received.
///
/// Every field is optional here so that a missing field is reported as a
/// validation failure rather than a deserialization failure. Unknown keys
/// (including any `estado`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketInput {
    /// Customer name
    pub cliente: Option<String>,
    /// Service address
    pub direccion: Option<String>,
    /// Contact phone number
    pub telefono: Option<String>,
    /// Problem description
    pub descripcion: Option<String>,
    /// Kind of support requested
    pub tipo_soporte: Option<String>,
}

/// The five mutable fields after validation: present, non-empty, within the
/// column limits, and stored exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFields {
    /// Customer name
    pub cliente: String,
    /// Service address
    pub direccion: String,
    /// Contact phone number
    pub telefono: String,
    /// Problem description
    pub descripcion: String,
    /// Kind of support requested
    pub tipo_soporte: String,
}

impl TicketInput {
    /// Checks that all five fields are present, non-empty, and fit their columns.
    ///
    /// Presence is checked for every field before any length, so a payload
    /// with a missing field always reports [`REQUIRED_FIELDS_MESSAGE`].
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if any field is missing or empty, or is
    /// longer than its column allows.
    pub fn validate(self) -> Result<TicketFields> {
        let fields = TicketFields {
            cliente: required(self.cliente)?,
            direccion: required(self.direccion)?,
            telefono: required(self.telefono)?,
            descripcion: required(self.descripcion)?,
            tipo_soporte: required(self.tipo_soporte)?,
        };

        within_limit("cliente", &fields.cliente, MAX_CLIENTE_CHARS)?;
        within_limit("direccion", &fields.direccion, MAX_DIRECCION_CHARS)?;
        within_limit("telefono", &fields.telefono, MAX_TELEFONO_CHARS)?;
        within_limit("tipoSoporte", &fields.tipo_soporte, MAX_TIPO_SOPORTE_CHARS)?;

        Ok(fields)
    }
}

fn required(value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::validation(REQUIRED_FIELDS_MESSAGE)),
    }
}

fn within_limit(field: &str, value: &str, max_chars: usize) -> Result<()> {
    if value.chars().count() > max_chars {
        return Err(Error::validation(format!(
            "El campo {field} no puede superar {max_chars} caracteres"
        )));
    }
    Ok(())
}

/// Parses a caller-supplied status.
///
/// # Errors
/// Returns [`Error::Validation`] if `raw` is absent or is not exactly one of
/// `pendiente`, `resuelto`, `cancelado`.
pub fn parse_estado(raw: Option<&str>) -> Result<Estado> {
    raw.and_then(|value| value.parse().ok())
        .ok_or_else(|| Error::validation(INVALID_ESTADO_MESSAGE))
}

/// Ticket counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStats {
    /// All tickets
    pub total: u64,
    /// Tickets in `pendiente`
    pub pendientes: u64,
    /// Tickets in `resuelto`
    pub resueltos: u64,
    /// Tickets in `cancelado`
    pub cancelados: u64,
}

/// Retrieves every ticket, newest first.
///
/// Tickets created in the same instant are ordered by descending id so the
/// listing is stable.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_tickets(db: &DatabaseConnection) -> Result<Vec<ticket::Model>> {
    Ticket::find()
        .order_by_desc(ticket::Column::FechaCreacion)
        .order_by_desc(ticket::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a ticket by its id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_ticket_by_id(
    db: &DatabaseConnection,
    ticket_id: i64,
) -> Result<Option<ticket::Model>> {
    Ticket::find_by_id(ticket_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new ticket in the `pendiente` state.
///
/// Both timestamps are set to the same instant. The returned model is the
/// persisted row, including its generated id.
///
/// # Errors
/// Returns an error if:
/// - Any of the five fields is missing, empty, or too long
/// - The database insert fails
pub async fn create_ticket(db: &DatabaseConnection, input: TicketInput) -> Result<ticket::Model> {
    let fields = input.validate()?;
    let now = ticket::now();

    let new_ticket = ticket::ActiveModel {
        cliente: Set(fields.cliente),
        direccion: Set(fields.direccion),
        telefono: Set(fields.telefono),
        descripcion: Set(fields.descripcion),
        tipo_soporte: Set(fields.tipo_soporte),
        estado: Set(Estado::Pendiente),
        fecha_creacion: Set(now),
        fecha_actualizacion: Set(now),
        ..Default::default()
    };

    let created = new_ticket.insert(db).await?;
    info!(ticket_id = created.id, "Ticket created");
    Ok(created)
}

/// Overwrites the five mutable fields of an existing ticket.
///
/// `estado` and `fechaCreacion` are left as they are; `fechaActualizacion`
/// moves forward.
///
/// # Errors
/// Returns an error if:
/// - Any of the five fields is missing, empty, or too long
/// - No ticket has the given id
/// - The database update fails
pub async fn update_ticket(
    db: &DatabaseConnection,
    ticket_id: i64,
    input: TicketInput,
) -> Result<ticket::Model> {
    let fields = input.validate()?;

    let existing = find_existing(db, ticket_id).await?;
    let stamp = ticket::next_update_stamp(existing.fecha_actualizacion);
    let mut active: ticket::ActiveModel = existing.into();

    active.cliente = Set(fields.cliente);
    active.direccion = Set(fields.direccion);
    active.telefono = Set(fields.telefono);
    active.descripcion = Set(fields.descripcion);
    active.tipo_soporte = Set(fields.tipo_soporte);
    active.fecha_actualizacion = Set(stamp);

    let updated = save_existing(db, ticket_id, active).await?;
    info!(ticket_id, "Ticket updated");
    Ok(updated)
}

/// Sets the status of an existing ticket.
///
/// Any status may move to any other, including to itself; the update
/// timestamp moves forward either way.
///
/// # Errors
/// Returns an error if:
/// - `estado` is absent or not a known status
/// - No ticket has the given id
/// - The database update fails
pub async fn update_ticket_estado(
    db: &DatabaseConnection,
    ticket_id: i64,
    estado: Option<&str>,
) -> Result<ticket::Model> {
    let estado = parse_estado(estado)?;

    let existing = find_existing(db, ticket_id).await?;
    let previous = existing.estado;
    let stamp = ticket::next_update_stamp(existing.fecha_actualizacion);
    let mut active: ticket::ActiveModel = existing.into();

    active.estado = Set(estado);
    active.fecha_actualizacion = Set(stamp);

    let updated = save_existing(db, ticket_id, active).await?;
    info!(
        ticket_id,
        from = previous.as_str(),
        to = estado.as_str(),
        "Ticket estado changed"
    );
    Ok(updated)
}

/// Permanently removes a ticket.
///
/// # Errors
/// Returns an error if no ticket has the given id or the delete fails.
pub async fn delete_ticket(db: &DatabaseConnection, ticket_id: i64) -> Result<()> {
    let result = Ticket::delete_by_id(ticket_id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(Error::TicketNotFound { id: ticket_id });
    }

    info!(ticket_id, "Ticket deleted");
    Ok(())
}

/// Counts tickets per status.
///
/// # Errors
/// Returns an error if any count query fails.
pub async fn ticket_stats(db: &DatabaseConnection) -> Result<TicketStats> {
    let pendientes = count_with_estado(db, Estado::Pendiente).await?;
    let resueltos = count_with_estado(db, Estado::Resuelto).await?;
    let cancelados = count_with_estado(db, Estado::Cancelado).await?;

    Ok(TicketStats {
        total: pendientes + resueltos + cancelados,
        pendientes,
        resueltos,
        cancelados,
    })
}

async fn count_with_estado(db: &DatabaseConnection, estado: Estado) -> Result<u64> {
    Ticket::find()
        .filter(ticket::Column::Estado.eq(estado))
        .count(db)
        .await
        .map_err(Into::into)
}

async fn find_existing(db: &DatabaseConnection, ticket_id: i64) -> Result<ticket::Model> {
    get_ticket_by_id(db, ticket_id)
        .await?
        .ok_or(Error::TicketNotFound { id: ticket_id })
}

// A row deleted between the lookup and the write surfaces as not found.
async fn save_existing(
    db: &DatabaseConnection,
    ticket_id: i64,
    active: ticket::ActiveModel,
) -> Result<ticket::Model> {
    active.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => Error::TicketNotFound { id: ticket_id },
        other => Error::Database(other),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_ticket_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Missing field
        let mut input = ticket_input("Ana");
        input.telefono = None;
        let result = create_ticket(&db, input).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        // Empty field
        let mut input = ticket_input("Ana");
        input.descripcion = Some(String::new());
        let result = create_ticket(&db, input).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        // Nothing at all
        let result = create_ticket(&db, TicketInput::default()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_ticket_rejected_input_persists_nothing() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = ticket_input("Ana");
        input.cliente = Some(String::new());
        assert!(create_ticket(&db, input).await.is_err());

        assert!(list_tickets(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_ticket_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_ticket(&db, ana_input()).await?;

        assert!(created.id > 0);
        assert_eq!(created.cliente, "Ana");
        assert_eq!(created.direccion, "Calle 1");
        assert_eq!(created.telefono, "555");
        assert_eq!(created.descripcion, "No enciende");
        assert_eq!(created.tipo_soporte, "Hardware");
        assert_eq!(created.estado, Estado::Pendiente);
        assert_eq!(created.fecha_creacion, created.fecha_actualizacion);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_ticket_stores_fields_as_sent() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = ana_input();
        input.cliente = Some("  Ana  ".to_string());
        input.tipo_soporte = Some(" ".to_string());
        let created = create_ticket(&db, input).await?;

        assert_eq!(created.cliente, "  Ana  ");
        assert_eq!(created.tipo_soporte, " ");
        Ok(())
    }

    #[tokio::test]
    async fn test_field_length_limits() -> Result<()> {
        let db = setup_test_db().await?;

        let limits: [(fn(&mut TicketInput, String), usize); 4] = [
            (|input, value| input.cliente = Some(value), MAX_CLIENTE_CHARS),
            (|input, value| input.direccion = Some(value), MAX_DIRECCION_CHARS),
            (|input, value| input.telefono = Some(value), MAX_TELEFONO_CHARS),
            (|input, value| input.tipo_soporte = Some(value), MAX_TIPO_SOPORTE_CHARS),
        ];

        for (set_field, max_chars) in limits {
            // Multi-byte characters count once each
            let mut at_limit = ana_input();
            set_field(&mut at_limit, "ñ".repeat(max_chars));
            create_ticket(&db, at_limit).await?;

            let mut over_limit = ana_input();
            set_field(&mut over_limit, "ñ".repeat(max_chars + 1));
            let result = create_ticket(&db, over_limit).await;
            assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));
        }

        assert_eq!(list_tickets(&db).await?.len(), limits.len());

        // descripcion is free text
        let mut long_text = ana_input();
        long_text.descripcion = Some("x".repeat(5_000));
        let created = create_ticket(&db, long_text).await?;
        assert_eq!(created.descripcion.len(), 5_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ticket_rejects_over_limit_field() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_ticket(&db, "Ana").await?;

        let mut input = ana_input();
        input.telefono = Some("5".repeat(MAX_TELEFONO_CHARS + 1));
        let result = update_ticket(&db, created.id, input).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let retrieved = get_ticket_by_id(&db, created.id).await?.unwrap();
        assert_eq!(retrieved, created);
        Ok(())
    }

    #[test]
    fn test_missing_field_reported_before_length() {
        let mut input = ticket_input(&"x".repeat(MAX_CLIENTE_CHARS + 1));
        input.telefono = None;

        match input.validate().unwrap_err() {
            Error::Validation { message } => assert_eq!(message, REQUIRED_FIELDS_MESSAGE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_created_ticket_round_trips_through_list() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_ticket(&db, ana_input()).await?;
        let listed = list_tickets(&db).await?;

        assert_eq!(listed, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_tickets_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_test_ticket(&db, "Primero").await?;
        let second = create_test_ticket(&db, "Segundo").await?;
        let third = create_test_ticket(&db, "Tercero").await?;

        let listed = list_tickets(&db).await?;
        let ids: Vec<i64> = listed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        for pair in listed.windows(2) {
            assert!(pair[0].fecha_creacion >= pair[1].fecha_creacion);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_list_tickets_orders_by_creation_not_by_id() -> Result<()> {
        let db = setup_test_db().await?;

        let older = create_test_ticket(&db, "Viejo").await?;
        let newer = create_test_ticket(&db, "Nuevo").await?;

        // Push the first ticket's creation time past the second one.
        let mut active: ticket::ActiveModel = older.clone().into();
        let later = newer.fecha_creacion + chrono::Duration::seconds(5);
        active.fecha_creacion = Set(later);
        active.fecha_actualizacion = Set(later);
        active.update(&db).await?;

        let ids: Vec<i64> = list_tickets(&db).await?.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ticket_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_ticket(&db, "Ana").await?;
        update_ticket_estado(&db, created.id, Some("resuelto")).await?;

        let updated = update_ticket(
            &db,
            created.id,
            TicketInput {
                cliente: Some("Beatriz".to_string()),
                direccion: Some("Avenida 2".to_string()),
                telefono: Some("777".to_string()),
                descripcion: Some("Pantalla rota".to_string()),
                tipo_soporte: Some("Software".to_string()),
            },
        )
        .await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.cliente, "Beatriz");
        assert_eq!(updated.direccion, "Avenida 2");
        assert_eq!(updated.telefono, "777");
        assert_eq!(updated.descripcion, "Pantalla rota");
        assert_eq!(updated.tipo_soporte, "Software");
        // estado is not touched by a full update
        assert_eq!(updated.estado, Estado::Resuelto);
        assert_eq!(updated.fecha_creacion, created.fecha_creacion);
        assert!(updated.fecha_actualizacion > created.fecha_actualizacion);

        let retrieved = get_ticket_by_id(&db, created.id).await?.unwrap();
        assert_eq!(retrieved, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ticket_validation_runs_before_lookup() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = ticket_input("Ana");
        input.direccion = None;
        let result = update_ticket(&db, 1, input).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ticket_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_ticket(&db, 999, ana_input()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TicketNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ticket_estado_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_ticket(&db, "Ana").await?;

        let resolved = update_ticket_estado(&db, created.id, Some("resuelto")).await?;
        assert_eq!(resolved.estado, Estado::Resuelto);
        assert_eq!(resolved.cliente, created.cliente);
        assert_eq!(resolved.fecha_creacion, created.fecha_creacion);
        assert!(resolved.fecha_actualizacion > created.fecha_actualizacion);

        Ok(())
    }

    #[tokio::test]
    async fn test_every_estado_transition_is_allowed() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_ticket(&db, "Ana").await?;

        let path = [
            "cancelado",
            "resuelto",
            "pendiente",
            "cancelado",
            "pendiente",
            "resuelto",
            "resuelto",
            "pendiente",
            "pendiente",
        ];

        let mut last_stamp = created.fecha_actualizacion;
        for target in path {
            let updated = update_ticket_estado(&db, created.id, Some(target)).await?;
            assert_eq!(updated.estado.as_str(), target);
            assert!(updated.fecha_actualizacion > last_stamp);
            last_stamp = updated.fecha_actualizacion;
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ticket_estado_rejects_unknown_value() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_ticket(&db, "Ana").await?;

        for bad in [None, Some(""), Some("cerrado"), Some("Resuelto"), Some("PENDIENTE")] {
            let result = update_ticket_estado(&db, created.id, bad).await;
            assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));
        }

        // Record unchanged
        let retrieved = get_ticket_by_id(&db, created.id).await?.unwrap();
        assert_eq!(retrieved, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ticket_estado_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_ticket_estado(&db, 42, Some("cancelado")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TicketNotFound { id: 42 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_ticket_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let keep = create_test_ticket(&db, "Queda").await?;
        let gone = create_test_ticket(&db, "Se va").await?;

        delete_ticket(&db, gone.id).await?;

        assert!(get_ticket_by_id(&db, gone.id).await?.is_none());
        assert_eq!(list_tickets(&db).await?, vec![keep]);

        // Second delete reports not found
        let result = delete_ticket(&db, gone.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TicketNotFound { id: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_ticket(&db, "Uno").await?;
        let second = create_test_ticket(&db, "Dos").await?;
        delete_ticket(&db, second.id).await?;

        let third = create_test_ticket(&db, "Tres").await?;
        assert!(third.id > second.id);
        assert_ne!(third.id, first.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_timestamps_never_regress() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_ticket(&db, "Ana").await?;
        update_ticket(&db, created.id, ana_input()).await?;
        update_ticket_estado(&db, created.id, Some("cancelado")).await?;
        create_test_ticket(&db, "Otro").await?;

        for t in list_tickets(&db).await? {
            assert!(t.fecha_actualizacion >= t.fecha_creacion);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_ticket_stats() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(ticket_stats(&db).await?, TicketStats::default());

        let a = create_test_ticket(&db, "A").await?;
        let b = create_test_ticket(&db, "B").await?;
        create_test_ticket(&db, "C").await?;
        let d = create_test_ticket(&db, "D").await?;
        update_ticket_estado(&db, a.id, Some("resuelto")).await?;
        update_ticket_estado(&db, b.id, Some("resuelto")).await?;
        update_ticket_estado(&db, d.id, Some("cancelado")).await?;

        let stats = ticket_stats(&db).await?;
        assert_eq!(
            stats,
            TicketStats {
                total: 4,
                pendientes: 1,
                resueltos: 2,
                cancelados: 1,
            }
        );

        Ok(())
    }

    #[test]
    fn test_parse_estado() {
        assert_eq!(parse_estado(Some("resuelto")).unwrap(), Estado::Resuelto);
        assert!(parse_estado(None).is_err());
        assert!(parse_estado(Some("abierto")).is_err());
    }

    #[test]
    fn test_ticket_input_ignores_estado_key() {
        let input: TicketInput = serde_json::from_str(
            r#"{"cliente":"Ana","direccion":"Calle 1","telefono":"555",
                "descripcion":"No enciende","tipoSoporte":"Hardware","estado":"resuelto"}"#,
        )
        .unwrap();
        let fields = input.validate().unwrap();
        assert_eq!(fields.tipo_soporte, "Hardware");
    }
}
