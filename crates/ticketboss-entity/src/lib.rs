//! # ticketboss-entity
//!
//! Domain entity models for TicketBoss. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod event;
pub mod reservation;
