//! # Timetabler
//!
//! Academic lecture scheduling and conflict-resolution engine.
//!
//! This crate places course lecture sessions onto a shared calendar of rooms,
//! instructors and student cohorts, detects scheduling conflicts, and
//! auto-generates a full-term timetable for a course from its module list.
//! The surrounding application (course management, enrollment, gradebook)
//! supplies course/module/enrollment records through the repository layer and
//! consumes the engine's scheduling decisions. The engine exposes a REST API
//! via Axum for that application.
//!
//! ## Features
//!
//! - **Calendar Model**: semester start dates, 1-based week numbers, teaching
//!   vs. examination week classification
//! - **Conflict Detection**: instructor, room and student-cohort double
//!   booking plus exam-period / past-date / weekend placement checks
//! - **Auto-Scheduling**: two-phase preferred-then-exhaustive slot search
//!   producing a full-term proposal with explicit unresolved entries
//! - **Alternative Slots**: same-day open-slot suggestions when a placement
//!   conflicts
//! - **HTTP API**: RESTful endpoints for the frontend application
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: identifier newtypes and Data Transfer Objects (DTOs)
//! - [`models`]: pure domain types (calendar, slot catalog, lectures)
//! - [`db`]: repository pattern and persistence layer
//! - [`services`]: conflict detection, auto-scheduling and CRUD gating
//! - [`routes`]: route-specific data types
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
