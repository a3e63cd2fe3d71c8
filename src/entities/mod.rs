//! Entity module - SeaORM entity definitions for the database.
//! The ticket store is a single table; `Model` holds a row and `Entity`
//! drives queries against it.

pub mod ticket;

pub use ticket::{
    ActiveModel as TicketActiveModel, Column as TicketColumn, Entity as Ticket, Estado,
    Model as TicketModel,
};
